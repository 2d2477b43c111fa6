//! Gateway configuration
//!
//! Loaded from TOML, then overlaid with `CASCADE_*` environment variables, then
//! validated. Every section has defaults so an empty file is a valid config.

use crate::errors::{CascadeError, Result};
use crate::prefix::validate_prefix;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "CASCADE_";

/// Bounds applied by the invocation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Bound on resolving the guild and the caller, in milliseconds
    pub resolve_timeout_ms: u64,
    /// Bound on waiting for a guild's settings lock, in milliseconds
    pub lock_timeout_ms: u64,
}

impl GateConfig {
    /// Resolution bound as a duration.
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Lock bound as a duration.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: 5_000,
            lock_timeout_ms: 5_000,
        }
    }
}

/// Defaults for newly created guild settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Prefix given to guilds on first reference
    pub default_prefix: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            default_prefix: ";".to_string(),
        }
    }
}

/// Listing output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Items per page
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Gate bounds
    pub gate: GateConfig,
    /// Settings defaults
    pub settings: SettingsConfig,
    /// Pagination
    pub pagination: PaginationConfig,
}

impl CascadeConfig {
    /// Load from a TOML file, apply environment overrides and validate.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CascadeError::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without touching the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CascadeError::config(format!("failed to parse config: {e}")))
    }

    /// Overlay `CASCADE_*` variables from the process environment.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_env_from(std::env::vars())
    }

    /// Overlay `CASCADE_*` variables from an explicit list.
    pub fn merge_env_from<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "GATE_RESOLVE_TIMEOUT_MS" => {
                    self.gate.resolve_timeout_ms = parse_env(&key, &value)?;
                }
                "GATE_LOCK_TIMEOUT_MS" => {
                    self.gate.lock_timeout_ms = parse_env(&key, &value)?;
                }
                "SETTINGS_DEFAULT_PREFIX" => {
                    self.settings.default_prefix = value;
                }
                "PAGINATION_PAGE_SIZE" => {
                    self.pagination.page_size = parse_env(&key, &value)?;
                }
                _ => debug!(variable = %key, "ignoring unknown configuration variable"),
            }
        }
        Ok(())
    }

    /// Check every bound and default.
    pub fn validate(&self) -> Result<()> {
        if self.gate.resolve_timeout_ms == 0 {
            return Err(CascadeError::config("gate.resolve_timeout_ms cannot be zero"));
        }
        if self.gate.lock_timeout_ms == 0 {
            return Err(CascadeError::config("gate.lock_timeout_ms cannot be zero"));
        }
        if self.pagination.page_size == 0 {
            return Err(CascadeError::config("pagination.page_size cannot be zero"));
        }
        validate_prefix(&self.settings.default_prefix)
            .map_err(|e| CascadeError::config(format!("settings.default_prefix: {e}")))?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CascadeError::config(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CascadeConfig::from_toml_str("").unwrap();
        assert_eq!(config, CascadeConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = CascadeConfig::from_toml_str(
            r#"
            [gate]
            resolve_timeout_ms = 250

            [pagination]
            page_size = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.gate.resolve_timeout(), Duration::from_millis(250));
        assert_eq!(config.gate.lock_timeout_ms, 5_000);
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.settings.default_prefix, ";");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CascadeConfig::default();
        config
            .merge_env_from([
                ("CASCADE_PAGINATION_PAGE_SIZE".to_string(), "5".to_string()),
                ("CASCADE_SETTINGS_DEFAULT_PREFIX".to_string(), "!".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ])
            .unwrap();
        assert_eq!(config.pagination.page_size, 5);
        assert_eq!(config.settings.default_prefix, "!");
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = CascadeConfig::default();
        let result = config.merge_env_from([(
            "CASCADE_GATE_LOCK_TIMEOUT_MS".to_string(),
            "soon".to_string(),
        )]);
        assert_matches!(result, Err(CascadeError::Config { .. }));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = CascadeConfig::default();
        config.pagination.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = CascadeConfig::default();
        config.settings.default_prefix = " x".to_string();
        assert_matches!(config.validate(), Err(CascadeError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\ndefault_prefix = \"?\"").unwrap();
        let config = CascadeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.settings.default_prefix, "?");
    }
}
