//! Fintrack - A personal finance tracking service
//!
//! This library provides the core functionality for the Fintrack service:
//! user accounts, income/expense transactions, category budgets and
//! spending statistics served over a JSON API.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//!
//! # Architecture
//! - `api`: HTTP services, JWT and middleware
//! - `services`: Business logic (auth, transactions, budgets)
//! - `storage`: Sea-ORM storage backend and domain models
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging initialization

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
