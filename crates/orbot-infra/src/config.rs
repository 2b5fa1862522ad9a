//! Configuration loading and data-directory resolution.
//!
//! Reads `config.toml` from the data directory (`~/.orbot/` by default) and
//! deserializes it into [`OrbotConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use orbot_types::config::OrbotConfig;

/// Resolve the data directory.
///
/// `$ORBOT_DATA_DIR` wins; otherwise `~/.orbot`, or `./.orbot` when no home
/// directory is known.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ORBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".orbot"))
        .unwrap_or_else(|| PathBuf::from(".orbot"))
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`OrbotConfig::default()`].
/// - Unreadable or unparseable file: logs a warning, returns the default.
pub async fn load_config(data_dir: &Path) -> OrbotConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml at {}, using defaults", config_path.display());
            return OrbotConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return OrbotConfig::default();
        }
    };

    match toml::from_str::<OrbotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            OrbotConfig::default()
        }
    }
}
