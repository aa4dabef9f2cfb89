pub mod finance;
pub mod health;

pub use finance::api_routes;
pub use health::{AppStartTime, HealthService, health_routes};
