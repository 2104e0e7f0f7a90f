//! Logging setup: a daily rolling file plus optional stderr output.

use std::path::PathBuf;

use color_eyre::Report;
use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for file output
    pub file_level: Level,
    /// Log level for console output
    pub console_level: Level,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
    /// Whether a console draws into this terminal (disables console logging)
    pub is_terminal_ui: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_level: Level::DEBUG,
            console_level: Level::WARN,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
            is_terminal_ui: false,
        }
    }
}

impl LoggingConfig {
    /// Get the OS-appropriate default log directory
    #[must_use]
    pub fn default_log_dir() -> PathBuf {
        // ~/.cache/fauxterm, ~/Library/Caches/fauxterm or %LOCALAPPDATA%\fauxterm\cache
        ProjectDirs::from("", "", "fauxterm")
            .map_or_else(|| PathBuf::from("fauxterm-logs"), |dirs| dirs.cache_dir().to_path_buf())
    }

    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let level_var = |name: &str| std::env::var(name).ok()?.parse::<Level>().ok();

        if let Some(level) = level_var("FAUXTERM_LOG_LEVEL") {
            config.file_level = level;
            config.console_level = level;
        }
        if let Some(level) = level_var("FAUXTERM_FILE_LOG_LEVEL") {
            config.file_level = level;
        }
        if let Some(level) = level_var("FAUXTERM_CONSOLE_LOG_LEVEL") {
            config.console_level = level;
        }

        if let Ok(log_dir) = std::env::var("FAUXTERM_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(log_dir));
        }
        if std::env::var("FAUXTERM_NO_FILE_LOGS").is_ok() {
            config.log_dir = None;
        }
        if std::env::var("FAUXTERM_JSON_LOGS").is_ok() {
            config.json_format = true;
        }

        config
    }

    /// Environment configuration for programs that draw into the terminal:
    /// log lines would corrupt the screen, so only the file log is kept.
    #[must_use]
    pub fn for_terminal_ui() -> Self {
        Self { is_terminal_ui: true, ..Self::from_env() }
    }
}

/// Initialize the logging system with the given configuration.
///
/// The returned guard flushes the file log when dropped; keep it alive for
/// the whole program.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Report> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "fauxterm.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_filter = EnvFilter::builder()
            .with_default_directive(config.file_level.into())
            .from_env_lossy();

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter)
                .boxed()
        };

        layers.push(file_layer);
    }

    if !config.is_terminal_ui {
        let console_filter = EnvFilter::builder()
            .with_default_directive(config.console_level.into())
            .from_env_lossy();

        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed();

        layers.push(console_layer);
    }

    tracing_subscriber::registry().with(layers).init();

    Ok(guard)
}
