mod ack_store;
mod config;

pub use ack_store::AckStore;
pub use config::{BackendConfig, Config, NotificationsConfig, PollConfig};

use std::path::PathBuf;

/// Returns `~/.config/restcycle[-dev]/` based on RESTCYCLE_ENV.
///
/// Set RESTCYCLE_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RESTCYCLE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("restcycle-dev")
    } else {
        base_dir.join("restcycle")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
