//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod duplicates;
pub mod process;

use std::path::Path;

use tracing::debug;

use contax_core::ContaxConfig;

/// Load the configuration for a command.
///
/// An explicit `--config` path must exist. Without one the per-user file is
/// used when present, and the defaults otherwise.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ContaxConfig> {
    if let Some(path) = config_path {
        return Ok(ContaxConfig::from_file(Path::new(path))?);
    }

    let user_path = config::default_config_path();
    if user_path.exists() {
        debug!("Using configuration from {}", user_path.display());
        return Ok(ContaxConfig::from_file(&user_path)?);
    }

    Ok(ContaxConfig::default())
}
