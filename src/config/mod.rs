pub mod args;
mod r#impl;
mod structs;

pub use args::{Cli, Command, ConfigAction};
pub use r#impl::{DEFAULT_CONFIG_PATH, get_config, init_config, set_config, try_get_config};
pub use structs::*;
