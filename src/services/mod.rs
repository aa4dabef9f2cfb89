//! Service layer for business logic
//!
//! HTTP handlers call into these services; they never touch storage directly.

mod auth_service;
mod budget_service;
mod transaction_service;

pub use auth_service::*;
pub use budget_service::*;
pub use transaction_service::*;
