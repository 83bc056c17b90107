use serde::Deserialize;
use std::path::Path;

use super::datetime::ATOM_FORMAT;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default)]
    pub hydration: HydrationConfig,
    #[serde(default)]
    pub serialization: SerializationConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HydrationConfig {
    /// Fail when the input carries keys no descriptor maps
    #[serde(default = "default_true")]
    pub reject_unknown_fields: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SerializationConfig {
    /// chrono format string for date/time properties
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

/// Default configuration embedded in the library
const DEFAULT_CONFIG: &str = r#"
[hydration]
reject_unknown_fields = true

[serialization]
datetime_format = "%Y-%m-%dT%H:%M:%S%:z"
"#;

fn default_true() -> bool {
    true
}

fn default_datetime_format() -> String {
    ATOM_FORMAT.to_string()
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            reject_unknown_fields: true,
        }
    }
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self {
            datetime_format: default_datetime_format(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hydration: HydrationConfig::default(),
            serialization: SerializationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; absent sections and keys take their defaults
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Configuration shipped with the library
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }
}

/// Load configuration from a TOML file
///
/// Falls back to the embedded default when the file does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    if path.exists() {
        tracing::info!("Loading entity engine config from: {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        return EngineConfig::from_toml(&contents);
    }

    tracing::warn!("Entity engine config not found at: {}", path.display());
    tracing::info!("Using default embedded configuration");
    EngineConfig::embedded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = EngineConfig::embedded();
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.hydration.reject_unknown_fields);
        assert_eq!(config.serialization.datetime_format, "%Y-%m-%dT%H:%M:%S%:z");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EngineConfig::from_toml("[hydration]\nreject_unknown_fields = false\n").unwrap();
        assert!(!config.hydration.reject_unknown_fields);
        assert_eq!(config.serialization.datetime_format, ATOM_FORMAT);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = load_config(Path::new("definitely/not/here/entities.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml("[hydration\n").is_err());
    }
}
