//! Configuration types
//!
//! Path traversal behavior that callers may want to tune. Configuration is
//! loaded from defaults, environment variables, or a TOML document.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable holding comma-separated default filter properties.
pub const ENV_FILTER_PROPERTIES: &str = "MODELPATH_FILTER_PROPERTIES";

/// Environment variable toggling auto-vivification ("true" or "false").
pub const ENV_AUTO_VIVIFY: &str = "MODELPATH_AUTO_VIVIFY";

/// Properties a list filter without an explicit property is matched against.
pub const DEFAULT_FILTER_PROPERTIES: [&str; 2] = ["sysName", "name"];

// ============================================================================
// PATH CONFIGURATION
// ============================================================================

/// Behavior switches for path visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Properties tried in order when a filter such as `links[AD]` names no
    /// property. The first one is also the key pre-populated on elements
    /// created by a put.
    pub default_filter_properties: Vec<String>,

    /// Whether put creates missing intermediate maps and lists.
    pub auto_vivify: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            default_filter_properties: DEFAULT_FILTER_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            auto_vivify: true,
        }
    }
}

impl PathConfig {
    /// Create PathConfig from environment variables.
    ///
    /// Environment variables:
    /// - `MODELPATH_FILTER_PROPERTIES`: Comma-separated filter properties (default: sysName,name)
    /// - `MODELPATH_AUTO_VIVIFY`: "true" or "false" (default: true)
    ///
    /// The returned config has passed [`PathConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, using the same variable
    /// names as [`PathConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_FILTER_PROPERTIES) {
            let properties: Vec<String> = raw
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if !properties.is_empty() {
                config.default_filter_properties = properties;
            }
        }

        if let Some(raw) = lookup(ENV_AUTO_VIVIFY) {
            config.auto_vivify = match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_AUTO_VIVIFY.to_string(),
                        value: raw,
                        reason: "must be true or false".to_string(),
                    })
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Malformed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config can drive a traversal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_filter_properties.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "default_filter_properties".to_string(),
                value: "[]".to_string(),
                reason: "at least one property is required".to_string(),
            });
        }
        if let Some(blank) = self
            .default_filter_properties
            .iter()
            .find(|p| p.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "default_filter_properties".to_string(),
                value: format!("{:?}", blank),
                reason: "property names must not be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Property written on elements a put creates for a default-property filter.
    pub fn primary_filter_property(&self) -> &str {
        self.default_filter_properties
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_FILTER_PROPERTIES[0])
    }
}
