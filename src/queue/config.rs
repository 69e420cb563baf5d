//! TOML configuration for queue construction
//!
//! ```toml
//! max-size = 1000
//! count-items = true
//! ```

use crate::core::error_handling::log_error_with_context;
use crate::queue::error::{QueueError, QueueResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Construction parameters for a [`CoordinatedQueue`](crate::queue::CoordinatedQueue)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct QueueConfig {
    /// Maximum number of buffered items, 0 means unbounded
    pub max_size: usize,
    /// Keep a running total of enqueued items for progress reporting
    pub count_items: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_size: 0,
            count_items: true,
        }
    }
}

impl QueueConfig {
    pub fn from_toml_str(contents: &str) -> QueueResult<Self> {
        toml::from_str(contents).map_err(|e| QueueError::Configuration {
            message: e.to_string(),
        })
    }

    /// Load a configuration file; the file must exist
    pub async fn load(path: &Path) -> QueueResult<Self> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| QueueError::Configuration {
                    message: format!("cannot read {}: {}", path.display(), e),
                })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            QueueError::Configuration { message } => QueueError::Configuration {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Default location: `<config dir>/coordq/coordq.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("coordq").join("coordq.toml"))
    }

    /// Load the default configuration file, or defaults if there is none
    pub async fn load_default() -> QueueResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading queue configuration from {}", path.display());
                Self::load(&path).await.inspect_err(|e| {
                    log_error_with_context(e, "Loading queue configuration");
                })
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = QueueConfig::default();
        assert_eq!(config.max_size, 0);
        assert!(config.count_items);
    }

    #[test]
    fn test_parse_full_config() {
        let config = QueueConfig::from_toml_str("max-size = 64\ncount-items = false\n").unwrap();
        assert_eq!(
            config,
            QueueConfig {
                max_size: 64,
                count_items: false,
            }
        );
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = QueueConfig::from_toml_str("max-size = 10").unwrap();
        assert_eq!(config.max_size, 10);
        assert!(config.count_items);

        assert_eq!(
            QueueConfig::from_toml_str("").unwrap(),
            QueueConfig::default()
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        match QueueConfig::from_toml_str("maxsize = 10") {
            Err(QueueError::Configuration { message }) => {
                assert!(message.contains("maxsize"), "message was: {}", message);
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_size_rejected() {
        assert!(matches!(
            QueueConfig::from_toml_str("max-size = -1"),
            Err(QueueError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max-size = 3").unwrap();

        let config = QueueConfig::load(file.path()).await.unwrap();
        assert_eq!(config.max_size, 3);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        match QueueConfig::load(&missing).await {
            Err(QueueError::Configuration { message }) => {
                assert!(message.contains("absent.toml"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path_layout() {
        if let Some(path) = QueueConfig::default_path() {
            assert!(path.ends_with("coordq/coordq.toml"));
        }
    }
}
