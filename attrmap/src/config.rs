use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::normalize::ZeroValuePolicy;

/// Configuration stored in a `mapper.toml` file.
///
/// ```toml
/// [mapper]
/// option_text_prefix = "option_text_"
/// multi_value_separator = ","
/// zero_values = "drop"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    #[serde(default)]
    pub mapper: MapperSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperSettings {
    /// Prefix of the companion field holding option display texts.
    #[serde(default = "default_option_text_prefix")]
    pub option_text_prefix: String,
    /// Delimiter used by multiselect attributes stored as a single string.
    #[serde(default = "default_multi_value_separator")]
    pub multi_value_separator: char,
    #[serde(default)]
    pub zero_values: ZeroValuePolicy,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            option_text_prefix: default_option_text_prefix(),
            multi_value_separator: default_multi_value_separator(),
            zero_values: ZeroValuePolicy::default(),
        }
    }
}

fn default_option_text_prefix() -> String {
    "option_text_".to_string()
}

fn default_multi_value_separator() -> char {
    ','
}

impl MapperConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: MapperConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn with_zero_values(mut self, policy: ZeroValuePolicy) -> Self {
        self.mapper.zero_values = policy;
        self
    }

    pub fn with_option_text_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mapper.option_text_prefix = prefix.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mapper.option_text_prefix.is_empty() {
            return Err(ConfigError::invalid(
                "mapper.option_text_prefix",
                "prefix must not be empty, option texts would overwrite attribute values",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = MapperConfig::from_toml_str("").unwrap();
        assert_eq!(config, MapperConfig::default());
        assert_eq!(config.mapper.option_text_prefix, "option_text_");
        assert_eq!(config.mapper.multi_value_separator, ',');
        assert_eq!(config.mapper.zero_values, ZeroValuePolicy::Drop);
    }

    #[test]
    fn parses_all_settings() {
        let config = MapperConfig::from_toml_str(
            r#"
            [mapper]
            option_text_prefix = "label_"
            multi_value_separator = "|"
            zero_values = "keep"
            "#,
        )
        .unwrap();

        assert_eq!(config.mapper.option_text_prefix, "label_");
        assert_eq!(config.mapper.multi_value_separator, '|');
        assert_eq!(config.mapper.zero_values, ZeroValuePolicy::Keep);
    }

    #[test]
    fn rejects_empty_prefix_and_unknown_policy() {
        let err = MapperConfig::from_toml_str("[mapper]\noption_text_prefix = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "mapper.option_text_prefix"));

        let err = MapperConfig::from_toml_str("[mapper]\nzero_values = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mapper]\nzero_values = \"keep\"").unwrap();

        let config = MapperConfig::load(file.path()).unwrap();
        assert_eq!(config.mapper.zero_values, ZeroValuePolicy::Keep);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = MapperConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }
}
