//! Configuration for the FrozenLib world server.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the command
//! line, and are re-read on demand for hot reload. Unknown fields are ignored
//! and missing ones fall back to defaults, so older files keep loading.

mod cli;
mod config;
mod error;
mod paths;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, PlacedFeature, ServerConfig, WindConfig, WorldConfig,
};
pub use error::ConfigError;
pub use paths::ServerDirs;
