mod config;
pub mod database;

pub use config::{
    Config, EnRouteConfig, LocationConfig, PaymentConfig, PricingConfig, ProgressMode,
    RoutingConfig, SimulationConfig, VerificationConfig,
};
pub use database::{Database, StorageScope};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `MASSAGE2GO_DATA_DIR` wins when set. Otherwise `~/.config/massage2go`,
/// or `~/.config/massage2go-dev` when `MASSAGE2GO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("MASSAGE2GO_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MASSAGE2GO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("massage2go-dev")
            } else {
                base_dir.join("massage2go")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
