//! Runtime configuration types for Orbot.
//!
//! `OrbotConfig` represents the `config.toml` in the data directory. All
//! fields have defaults so an empty or missing file yields a usable
//! configuration. Secrets (RCON password, webhook secret) never live here;
//! they arrive via flags or environment variables.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Orbot claim bot.
///
/// Loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbotConfig {
    /// Claims allowed per user before the ceiling applies.
    #[serde(default = "default_max_claims")]
    pub max_claims: i64,

    /// `host:port` of the game server's RCON listener.
    #[serde(default = "default_rcon_addr")]
    pub rcon_addr: String,

    /// Role id whose holders bypass the claim ceiling. `None` means nobody.
    #[serde(default)]
    pub bypass_role: Option<String>,

    /// Host the webhook server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the webhook server binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Counter file name inside the data directory.
    #[serde(default = "default_counter_file")]
    pub counter_file: String,
}

fn default_max_claims() -> i64 {
    3
}

fn default_rcon_addr() -> String {
    "127.0.0.1:25575".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_counter_file() -> String {
    "counters.json".to_string()
}

impl Default for OrbotConfig {
    fn default() -> Self {
        Self {
            max_claims: default_max_claims(),
            rcon_addr: default_rcon_addr(),
            bypass_role: None,
            host: default_host(),
            port: default_port(),
            counter_file: default_counter_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = OrbotConfig::default();
        assert_eq!(config.max_claims, 3);
        assert_eq!(config.rcon_addr, "127.0.0.1:25575");
        assert!(config.bypass_role.is_none());
        assert_eq!(config.port, 3000);
        assert_eq!(config.counter_file, "counters.json");
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: OrbotConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_claims, 3);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
max_claims = 5
rcon_addr = "mc.example.net:25575"
bypass_role = "814502354679562261"
port = 8080
"#;
        let config: OrbotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_claims, 5);
        assert_eq!(config.rcon_addr, "mc.example.net:25575");
        assert_eq!(config.bypass_role.as_deref(), Some("814502354679562261"));
        assert_eq!(config.port, 8080);
        // Unspecified fields still fall back to defaults.
        assert_eq!(config.counter_file, "counters.json");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = OrbotConfig {
            max_claims: 1,
            bypass_role: Some("role-1".to_string()),
            ..OrbotConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: OrbotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.max_claims, 1);
        assert_eq!(parsed.bypass_role.as_deref(), Some("role-1"));
    }
}
