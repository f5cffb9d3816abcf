//! User configuration (`config.yaml`).
//!
//! The configuration records the include directories searched for
//! abstractions and how object names are compared on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PdError, Result};

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "PDPATCH_CONFIG";

pub const CONFIG_FILENAME: &str = "config.yaml";

/// Keys accepted by [`Config::remove`].
pub const CONFIG_KEYS: &[&str] = &["include", "case_insensitive"];

/// Settings loaded from `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories searched for abstractions and externals.
    pub include: Vec<PathBuf>,

    /// Force case-insensitive (Windows) or case-sensitive (Unix) name
    /// matching. Defaults to the host convention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

impl Config {
    /// Where the configuration lives: `$PDPATCH_CONFIG`, or `config.yaml`
    /// in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("pdpatch").join(CONFIG_FILENAME))
    }

    /// Load a configuration file. A missing file gives the default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| PdError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        log::debug!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| PdError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PdError::Io {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create config directory: {}", e),
                })?;
            }
        }

        let yaml = serde_yaml::to_string(self).map_err(|e| PdError::Config {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })?;

        fs::write(path, yaml).map_err(|e| PdError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write config: {}", e),
        })
    }

    /// Append include directories, skipping ones already present.
    ///
    /// Returns how many were added.
    pub fn add_includes<I>(&mut self, dirs: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let before = self.include.len();
        for dir in dirs {
            if !self.include.contains(&dir) {
                self.include.push(dir);
            }
        }
        self.include.len() - before
    }

    /// Reset `key` to its default. Returns whether it held a value.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        match key {
            "include" => {
                let had = !self.include.is_empty();
                self.include.clear();
                Ok(had)
            }
            "case_insensitive" => Ok(self.case_insensitive.take().is_some()),
            _ => Err(PdError::Config {
                message: format!("Unknown config key '{}'", key),
                help: Some(format!("Valid keys: {}", CONFIG_KEYS.join(", "))),
            }),
        }
    }

    /// Whether object names should be compared without case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive.unwrap_or(cfg!(windows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
include:
  - /usr/lib/pd/extra
  - /home/me/pd
case_insensitive: true
"#;
        let config = Config::parse(yaml).unwrap();

        assert_eq!(
            config.include,
            vec![PathBuf::from("/usr/lib/pd/extra"), PathBuf::from("/home/me/pd")]
        );
        assert_eq!(config.case_insensitive, Some(true));
        assert!(config.is_case_insensitive());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = Config::parse("include: [unclosed").unwrap_err();

        assert!(matches!(err, PdError::Config { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();

        let config = Config::load(&dir.path().join("nope.yaml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/pdpatch/config.yaml");

        let mut config = Config::default();
        config.add_includes([PathBuf::from("/usr/lib/pd/extra")]);
        config.case_insensitive = Some(false);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_add_includes_skips_duplicates() {
        let mut config = Config::default();

        let added = config.add_includes([PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/a")]);
        assert_eq!(added, 2);

        let added = config.add_includes([PathBuf::from("/b"), PathBuf::from("/c")]);
        assert_eq!(added, 1);
        assert_eq!(
            config.include,
            vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn test_remove_keys() {
        let mut config = Config {
            include: vec![PathBuf::from("/a")],
            case_insensitive: Some(true),
        };

        assert!(config.remove("include").unwrap());
        assert!(!config.remove("include").unwrap());
        assert!(config.remove("case_insensitive").unwrap());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_remove_unknown_key() {
        let mut config = Config::default();

        assert!(matches!(config.remove("pd"), Err(PdError::Config { .. })));
    }
}
