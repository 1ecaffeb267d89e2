//! Configuration structures.
//!
//! Configuration is built from defaults and overlaid from environment
//! variables. File loading belongs to the embedding process.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Error, Result};

/// Environment variable overriding [`ObservabilityConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "MCP_REGISTRAR_LOG_LEVEL";
/// Environment variable switching logs to JSON when set to `json`.
pub const ENV_LOG_FORMAT: &str = "MCP_REGISTRAR_LOG_FORMAT";
/// Environment variable overriding [`RegistrationConfig::elicit_timeout`].
pub const ENV_ELICIT_TIMEOUT: &str = "MCP_REGISTRAR_ELICIT_TIMEOUT";

/// Global adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Registration behavior.
    #[serde(default)]
    pub registration: RegistrationConfig,
}

impl Config {
    /// Defaults overlaid with the `MCP_REGISTRAR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.observability.log_level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.observability.json_logs = format.eq_ignore_ascii_case("json");
        }
        if let Some(raw) = lookup(ENV_ELICIT_TIMEOUT) {
            config.registration.elicit_timeout = humantime::parse_duration(&raw).map_err(|e| {
                Error::validation(format!("Invalid {}: {}", ENV_ELICIT_TIMEOUT, e))
            })?;
        }

        Ok(config)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Registration behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Accept a second tool with an already registered name. The later
    /// registration replaces the earlier one in the registrar's view.
    pub allow_duplicate_names: bool,

    /// Timeout applied to elicitation requests that do not carry their own.
    #[serde(with = "humantime_serde")]
    pub elicit_timeout: Duration,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            allow_duplicate_names: false,
            elicit_timeout: Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
        assert!(!config.registration.allow_duplicate_names);
        assert_eq!(config.registration.elicit_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FORMAT, "JSON"),
            (ENV_ELICIT_TIMEOUT, "90s"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.json_logs);
        assert_eq!(config.registration.elicit_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = Config::from_lookup(|k| {
            (k == ENV_ELICIT_TIMEOUT).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_deserialize_humantime() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "registration": {
                "allow_duplicate_names": true,
                "elicit_timeout": "2m"
            }
        }))
        .unwrap();
        assert!(config.registration.allow_duplicate_names);
        assert_eq!(config.registration.elicit_timeout, Duration::from_secs(120));
        assert_eq!(config.observability.log_level, "info");
    }
}
