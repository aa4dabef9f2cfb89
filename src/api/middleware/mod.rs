pub mod auth;
pub mod request_id;

pub use auth::{AuthenticatedUser, UserAuth};
pub use request_id::{RequestId, RequestIdMiddleware};
