//! Configuration loading from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::settings::{parse_settings, RootConfig};

/// Name of the root settings file inside a config directory.
pub const SETTINGS_FILE: &str = "set.config";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A module descriptor is not valid JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file exists but could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendering a config tree as JSON failed.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    /// True for the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Read a whole file into a string, mapping a missing file to `NotFound`.
pub fn read_file(path: &Path) -> Result<String> {
    // A directory at this path counts as missing.
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Path of the settings file for a config directory.
pub fn settings_path(root_dir: &Path) -> PathBuf {
    root_dir.join(SETTINGS_FILE)
}

/// Load and parse the settings file of a config directory.
pub fn load_settings(root_dir: &Path) -> Result<RootConfig> {
    let path = settings_path(root_dir);
    let content = read_file(&path)?;
    let settings = parse_settings(&content);

    tracing::debug!(
        path = %path.display(),
        sections = settings.len(),
        "Settings file parsed"
    );
    Ok(settings)
}
