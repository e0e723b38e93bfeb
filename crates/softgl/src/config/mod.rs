//! Configuration files
//!
//! Any `serde` type can be loaded from or saved to TOML or RON; the format is
//! chosen from the file extension.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, picking the format from `path`'s extension
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Serialize configuration, picking the format from `path`'s extension
    fn to_string_with_format(&self, path: &str) -> Result<String, ConfigError> {
        if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = self.to_string_with_format(path)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("config file I/O: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not valid for the chosen format
    #[error("config parse failed: {0}")]
    Parse(String),

    /// The value could not be written in the chosen format
    #[error("config serialization failed: {0}")]
    Serialize(String),

    /// Extension other than `.toml` or `.ron`
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of its allowed range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        size: u32,
        name: String,
    }

    impl Config for Sample {}

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            Sample::from_str_with_format("", "a.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Sample::default().to_string_with_format("a.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        assert!(matches!(
            Sample::from_str_with_format("size = \"x\"", "a.toml"),
            Err(ConfigError::Parse(_))
        ));
    }
}
