//! Logging system initialization
//!
//! This module provides functions to initialize the tracing/logging system
//! based on application configuration.

use tracing_appender::rolling;

use crate::config::LoggingConfig;

/// Initialize logging system based on configuration
///
/// **Note**: This should be called only once during application startup,
/// after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
///
/// # Panics
/// * If creating the log appender fails
/// * If setting the global subscriber fails (e.g., already initialized)
pub fn init_logging(config: &LoggingConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let writer = build_writer(config);

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.clone()));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(writes_to_console(config));

    if config.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    guard
}

fn writes_to_console(config: &LoggingConfig) -> bool {
    config.file.as_ref().is_none_or(|f| f.is_empty())
}

fn build_writer(config: &LoggingConfig) -> Box<dyn std::io::Write + Send + Sync> {
    let Some(log_file) = config.file.as_ref().filter(|f| !f.is_empty()) else {
        return Box::new(std::io::stdout());
    };

    if config.enable_rotation {
        // 按天滚动
        let path = std::path::Path::new(log_file);
        let dir = path.parent().unwrap_or(std::path::Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("portfolio.log");
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups as usize)
            .build(dir)
            .expect("Failed to create rolling log appender");
        Box::new(appender)
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .expect("Failed to open log file");
        Box::new(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_output_when_no_file() {
        let config = LoggingConfig::default();
        assert!(writes_to_console(&config));

        let config = LoggingConfig {
            file: Some(String::new()),
            ..LoggingConfig::default()
        };
        assert!(writes_to_console(&config));
    }

    #[test]
    fn test_file_output_disables_console() {
        let config = LoggingConfig {
            file: Some("logs/portfolio.log".to_string()),
            ..LoggingConfig::default()
        };
        assert!(!writes_to_console(&config));
    }
}
