//! Ringfront Configuration
//!
//! Configuration structures for the ringfront HTTP facade: where the
//! cluster lives, which keyspace and table to serve, and how to expose
//! the API.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main ringfront configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingfrontConfig {
    /// Store cluster configuration
    pub store: StoreConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store cluster configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Contact points used to reach the cluster initially (host:port)
    pub contact_points: Vec<String>,

    /// Keyspace holding the user table
    #[serde(default = "default_keyspace")]
    pub keyspace: String,

    /// User table name
    #[serde(default = "default_table")]
    pub table: String,

    /// Replication factor used when creating the keyspace
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Enable HTTP API
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// HTTP API bind address
    #[serde(default = "default_api_address")]
    pub bind_address: String,

    /// Allow cross-origin requests from any origin
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_keyspace() -> String {
    "user_directory".to_string()
}

fn default_table() -> String {
    "users".to_string()
}

fn default_replication_factor() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_api_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: default_api_address(),
            cors_enabled: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl RingfrontConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> crate::Result<Self> {
        let config: RingfrontConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.store.contact_points.is_empty() {
            return Err(crate::Error::Config(
                "store.contact_points cannot be empty".into(),
            ));
        }

        // Keyspace/table names end up in statement text, so they must be
        // bare identifiers. Values never do; they are always bound.
        if !is_identifier(&self.store.keyspace) {
            return Err(crate::Error::Config(format!(
                "store.keyspace is not a valid identifier: {}",
                self.store.keyspace
            )));
        }

        if !is_identifier(&self.store.table) {
            return Err(crate::Error::Config(format!(
                "store.table is not a valid identifier: {}",
                self.store.table
            )));
        }

        if self.store.replication_factor == 0 {
            return Err(crate::Error::Config(
                "store.replication_factor must be at least 1".into(),
            ));
        }

        if self.api.bind_address.is_empty() {
            return Err(crate::Error::Config("api.bind_address cannot be empty".into()));
        }

        Ok(())
    }

    /// Get connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.store.connect_timeout_secs)
    }
}

/// Check that a name is a bare identifier: `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[store]
contact_points = ["10.0.0.1:9042", "10.0.0.2:9042"]
keyspace = "user_directory"
table = "users"
replication_factor = 3

[api]
bind_address = "0.0.0.0:5000"
"#;

        let config = RingfrontConfig::from_str(toml).unwrap();
        assert_eq!(config.store.contact_points.len(), 2);
        assert_eq!(config.store.keyspace, "user_directory");
        assert_eq!(config.store.replication_factor, 3);
        assert!(config.api.cors_enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_defaults() {
        let config = RingfrontConfig::from_str(
            r#"
[store]
contact_points = ["localhost:9042"]
"#,
        )
        .unwrap();
        assert_eq!(config.store.keyspace, "user_directory");
        assert_eq!(config.store.table, "users");
        assert_eq!(config.store.replication_factor, 1);
        assert_eq!(config.api.bind_address, "0.0.0.0:5000");
    }

    #[test]
    fn test_rejects_empty_contact_points() {
        let result = RingfrontConfig::from_str(
            r#"
[store]
contact_points = []
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        let result = RingfrontConfig::from_str(
            r#"
[store]
contact_points = ["localhost:9042"]
keyspace = "bad-name; DROP"
"#,
        );
        assert!(result.is_err());

        let result = RingfrontConfig::from_str(
            r#"
[store]
contact_points = ["localhost:9042"]
table = "1users"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ringfront.toml");
        std::fs::write(&path, "[store]\ncontact_points = [\"localhost:9042\"]\n").unwrap();

        let config = RingfrontConfig::from_file(&path).unwrap();
        assert_eq!(config.store.table, "users");

        assert!(RingfrontConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("users"));
        assert!(is_identifier("_ks1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("a.b"));
    }
}
