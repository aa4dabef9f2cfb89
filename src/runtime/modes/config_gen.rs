//! `config generate` command

use std::path::Path;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::{FintrackError, Result};

/// Write a sample configuration file to `path`
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn generate_config(path: &str, force: bool) -> Result<()> {
    if Path::new(path).exists() && !force {
        return Err(FintrackError::file_operation(format!(
            "{} already exists, pass --force to overwrite",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(path).map_err(|e| {
        FintrackError::file_operation(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}
