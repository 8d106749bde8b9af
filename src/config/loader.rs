//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{DirectorySeed, EngineConfig};

/// Loads engine configuration from a directory.
///
/// # Directory Structure
///
/// ```text
/// config/advance/
/// ├── settings.yaml   # Global settings, notifications, transition policy
/// └── directory.yaml  # Seed companies and employees (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use advance_engine::config::ConfigLoader;
///
/// let config = ConfigLoader::load("./config/advance")?;
/// println!("Admin inbox: {}", config.notifications.admin_inbox);
/// # Ok::<(), advance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `settings.yaml` from the specified directory.
    ///
    /// Fails with `ConfigNotFound` if the file is missing and with
    /// `ConfigParseError` if it is not valid YAML for [`EngineConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<EngineConfig> {
        Self::load_yaml(&path.as_ref().join("settings.yaml"))
    }

    /// Loads `directory.yaml` from the specified directory.
    pub fn load_directory<P: AsRef<Path>>(path: P) -> EngineResult<DirectorySeed> {
        Self::load_yaml(&path.as_ref().join("directory.yaml"))
    }

    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: String) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path,
            message: e.to_string(),
        })
    }
}
