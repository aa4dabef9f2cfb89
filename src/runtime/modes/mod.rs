//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - `config generate` (writes a sample configuration file)

pub mod config_gen;

#[cfg(feature = "server")]
pub mod server;

pub use config_gen::generate_config;

#[cfg(feature = "server")]
pub use server::{configure_app, run_server};
