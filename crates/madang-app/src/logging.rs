//! Logging and tracing setup
//!
//! Pretty console output for development, JSON files (rolled daily) for
//! production and bug reports. `RUST_LOG` overrides the configured filter.

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Named logging presets, selectable from the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogProfile {
    #[default]
    Development,
    Production,
    Testing,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where log files should be written
    pub log_dir: PathBuf,

    /// Whether to write JSON log files
    pub enable_json_logs: bool,

    /// Whether to enable pretty console output
    pub enable_console_logs: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to log span open/close (gateway operations are instrumented)
    pub enable_spans: bool,

    /// Default log level filter
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: true,
            enable_console_logs: true,
            include_location: cfg!(debug_assertions),
            enable_spans: cfg!(debug_assertions),
            default_filter: "info,madang_app=debug,madang_services=debug,madang_forms=debug,madang_core=debug,madang_drivers=debug,madang_driver_sqlite=debug".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Minimal console output, JSON logs for bug reports
    pub fn production() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: true,
            enable_console_logs: false,
            include_location: false,
            enable_spans: false,
            default_filter: "warn,madang_app=info,madang_services=info,madang_driver_sqlite=info".to_string(),
        }
    }

    /// Pretty console output, verbose logging
    pub fn development() -> Self {
        Self::default()
    }

    /// Console only, no files
    pub fn testing() -> Self {
        Self {
            log_dir: std::env::temp_dir().join("madang-tests"),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: true,
            enable_spans: true,
            default_filter: "debug".to_string(),
        }
    }

    pub fn for_profile(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Self::development(),
            LogProfile::Production => Self::production(),
            LogProfile::Testing => Self::testing(),
        }
    }
}

/// Keeps the file writer flushing; drop it only at shutdown
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(config: LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();
    let mut file_guard = None;

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events.clone())
            .with_ansi(true)
            .pretty()
            .with_filter(env_filter.clone())
            .boxed();

        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory: {}", config.log_dir.display())
        })?;

        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "madang.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();

        layers.push(json_layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Logging was already initialized")?;

    tracing::info!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "Logging system initialized"
    );

    Ok(LoggingGuard { _file: file_guard })
}

/// Get the log directory path
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("madang")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_map_to_presets() {
        let production = LoggingConfig::for_profile(LogProfile::Production);
        assert!(!production.enable_console_logs);
        assert!(production.enable_json_logs);

        let testing = LoggingConfig::for_profile(LogProfile::Testing);
        assert!(!testing.enable_json_logs);
        assert_eq!(testing.default_filter, "debug");
    }

    #[test]
    fn log_directory_is_namespaced() {
        assert!(log_directory().ends_with("madang/logs"));
    }
}
