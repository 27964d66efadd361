//! Logging setup for the orrery.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. The level comes from `RUST_LOG` when set, otherwise
//! from the config's `debug.log_level`.

use std::path::{Path, PathBuf};

use orrery_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "orrery.log";

/// Build the filter directive string for `config`.
///
/// A bare level such as `"debug"` keeps the GPU stack at `warn`; a string
/// with per-target directives is used as is.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if level.is_empty() => DEFAULT_FILTER.to_string(),
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("{level},wgpu=warn,naga=warn"),
        None => DEFAULT_FILTER.to_string(),
    }
}

/// Path of the JSON log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Install the global tracing subscriber.
///
/// `log` records from library crates are forwarded into `tracing`. The JSON
/// file layer is only added when `debug_build` is set and `log_dir` can be
/// created; otherwise logging falls back to the console alone.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_file_path(log_dir))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::info!("Writing JSON log to {}", log_file_path(log_dir).display());
        return;
    }

    subscriber.init();
    tracing::debug!("Console logging only");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_without_config() {
        let filter = filter_directive(None);
        assert_eq!(filter, DEFAULT_FILTER);
        assert!(EnvFilter::try_new(&filter).is_ok());
    }

    #[test]
    fn test_bare_level_keeps_gpu_quiet() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        assert_eq!(filter_directive(Some(&config)), "debug,wgpu=warn,naga=warn");
    }

    #[test]
    fn test_directive_string_passes_through() {
        let mut config = Config::default();
        config.debug.log_level = "warn,orrery_render=trace".to_string();
        let filter = filter_directive(Some(&config));
        assert_eq!(filter, "warn,orrery_render=trace");
        assert!(EnvFilter::try_new(&filter).is_ok());
    }

    #[test]
    fn test_empty_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_log_file_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = log_file_path(temp_dir.path());
        assert_eq!(path.file_name().unwrap(), LOG_FILE_NAME);
        assert_eq!(path.parent().unwrap(), temp_dir.path());
    }
}
