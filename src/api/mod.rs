//! HTTP layer: JWT, middleware and route handlers

pub mod jwt;
pub mod middleware;
pub mod services;
