//! Errors raised while locating, reading or writing `config.ron`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Covers directory creation as well as the file write itself.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid RON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("config could not be encoded as RON: {0}")]
    Serialize(#[source] ron::Error),

    /// The platform exposes no per-user configuration directory.
    #[error("no configuration directory on this platform; pass --config")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConfigError::Read { path, source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConfigError::Write { path, source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>) -> impl FnOnce(ron::error::SpannedError) -> Self {
        let path = path.into();
        move |source| ConfigError::Parse { path, source }
    }
}
