//! Where the server keeps its files.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_NAME: &str = "frozenlib";

/// Config and log directories, following OS conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl ServerDirs {
    /// Resolve the platform directories without creating them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_root(&base))
    }

    /// Directories rooted under `root`. Used for `--config` and in tests.
    pub fn with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Create both directories on disk.
    pub fn create(&self) -> Result<(), ConfigError> {
        for dir in [&self.config_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(ConfigError::write(dir))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root_layout() {
        let root = Path::new("/tmp/frozen-test-root");
        let dirs = ServerDirs::with_root(root);
        assert_eq!(dirs.config_dir, root.join("frozenlib").join("config"));
        assert_eq!(dirs.log_dir, root.join("frozenlib").join("logs"));
    }

    #[test]
    fn test_create_makes_directories() {
        let temp = tempfile::tempdir().unwrap();
        let dirs = ServerDirs::with_root(temp.path());
        dirs.create().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }
}
