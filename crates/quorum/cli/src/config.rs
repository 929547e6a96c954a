//! CLI configuration
//!
//! Layered as defaults, then an optional file, then `QUORUM_*` environment
//! variables. Nested keys use a double underscore, for example
//! `QUORUM_SESSION__DEFAULT_TTL_SECS=300`.

use quorum_engine::{EngineConfig, EventConfig, SessionConfig};
use serde::{Deserialize, Serialize};

/// quorumctl configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub events: EventConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of plain text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl CliConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CliConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("QUORUM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// The engine's share of the configuration
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            session: self.session.clone(),
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.session.default_ttl_secs, 900);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = CliConfig::load(Some("/nonexistent/path/quorum")).unwrap();
        assert_eq!(config.session.max_ttl_secs, 86_400);
        assert_eq!(config.engine().events.channel_capacity, 256);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("quorumctl-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quorum.json");
        std::fs::write(
            &path,
            r#"{"session": {"default_ttl_secs": 120}, "logging": {"json": true}}"#,
        )
        .unwrap();

        let config = CliConfig::load(path.to_str()).unwrap();
        assert_eq!(config.session.default_ttl_secs, 120);
        assert_eq!(config.session.max_ttl_secs, 86_400);
        assert!(config.logging.json);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
