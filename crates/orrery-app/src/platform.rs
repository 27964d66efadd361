//! OS directory resolution.
//!
//! The config directory holds `config.ron`; the log directory receives the
//! JSON log in debug builds.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_NAME: &str = "orrery";

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the orrery keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// `<os config>/orrery/{config,logs}`, without touching the disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&base))
    }

    /// Same layout rooted under `root`.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Replace the config directory, e.g. from `--config`.
    pub fn with_config_override(mut self, config_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = config_dir {
            self.config_dir = dir;
        }
        self
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| PlatformError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
