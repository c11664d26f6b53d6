//! Subcommands and the helpers they share.

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod input;
pub mod output;

use std::path::Path;

use tracing::debug;

use commission_core::CommissionConfig;

/// Load configuration from `-c`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CommissionConfig> {
    let config = match config_path {
        Some(path) => CommissionConfig::load(Some(Path::new(path)))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using configuration from {}", default_path.display());
                CommissionConfig::load(Some(&default_path))?
            } else {
                CommissionConfig::load(None)?
            }
        }
    };
    Ok(config)
}
