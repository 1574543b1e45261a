//! Structured logging for the FrozenLib server.
//!
//! Console output with uptime stamps and module paths, plus optional JSON file
//! logging for post-mortem analysis. `RUST_LOG` wins over the configured level.

use std::path::Path;

use frozen_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON log inside the log directory.
pub const LOG_FILE_NAME: &str = "frozenlib.log";

/// Build the filter string from the config, falling back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Install the global tracing subscriber.
///
/// When `log_dir` is given and the config asks for file logging, a JSON layer
/// writing to [`LOG_FILE_NAME`] is added. Calling this twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let to_file = config.is_some_and(|config| config.debug.log_to_file);
    if to_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        let _ = subscriber.with(file_layer).try_init();
        return;
    }

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_filter_directive_prefers_config() {
        let mut config = Config::default();
        config.debug.log_level = "warn,frozen_worldgen=trace".to_string();
        assert_eq!(filter_directive(Some(&config)), "warn,frozen_worldgen=trace");
    }

    #[test]
    fn test_blank_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
        assert_eq!(filter_directive(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,frozen_noise=trace",
            "warn,frozen_wind=debug,frozen_worldgen=trace",
            "error",
        ];
        for filter_str in &valid_filters {
            let result = EnvFilter::try_new(filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {filter_str}");
        }
    }

    #[test]
    fn test_file_logging_creates_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.debug.log_to_file = true;
        init_logging(Some(temp_dir.path()), Some(&config));
        tracing::info!("file logging test");
        assert!(temp_dir.path().join(LOG_FILE_NAME).is_file());
    }
}
