//! Console and rolling-file logging.
//!
//! Events go through `tracing`. [`init_logging`] installs a global
//! subscriber with an [`EnvFilter`] built from the configured level, a
//! console layer on stderr and, when a log file is configured, a file layer
//! written through a non-blocking `tracing-appender` worker.
//!
//! Console lines look like:
//!
//! ```text
//! 2020-07-15 09:43:26.578  INFO webstrap_server: Starting service on 0.0.0.0:8080
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use webstrap_config::LogSettings;

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Parses a level name, case-insensitively.
    ///
    /// `FATAL` and `PANIC` map to [`LogLevel::Error`]. Unknown names give
    /// [`LogLevel::Info`].
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "TRACE" => Self::Trace,
            "DEBUG" => Self::Debug,
            "WARN" | "WARNING" => Self::Warn,
            "ERROR" | "FATAL" | "PANIC" => Self::Error,
            _ => Self::Info,
        }
    }

    /// Directive understood by [`EnvFilter`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Multi-line human-readable output.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::InvalidConfig(format!(
                "unknown log format `{other}`"
            ))),
        }
    }
}

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogRotation {
    /// A new file every minute.
    Minutely,
    /// A new file every hour.
    Hourly,
    /// A new file every day.
    #[default]
    Daily,
    /// A single file.
    Never,
}

impl FromStr for LogRotation {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minutely" => Ok(Self::Minutely),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "never" => Ok(Self::Never),
            other => Err(TelemetryError::InvalidConfig(format!(
                "unknown log rotation `{other}`"
            ))),
        }
    }
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Self::MINUTELY,
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

/// Rolling log file settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogConfig {
    /// Log file path. Rotated files are named after its stem and extension.
    pub path: PathBuf,
    /// Rollover period.
    pub rotation: LogRotation,
    /// Rotated files to keep; `0` keeps all of them.
    pub max_files: usize,
}

impl FileLogConfig {
    /// Daily rotation, keeping a week of files.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rotation: LogRotation::Daily,
            max_files: 7,
        }
    }

    fn appender(&self) -> TelemetryResult<RollingFileAppender> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                TelemetryError::InvalidConfig(format!(
                    "log file path has no file name: {}",
                    self.path.display()
                ))
            })?;

        std::fs::create_dir_all(&dir)?;

        let mut builder = RollingFileAppender::builder()
            .rotation(self.rotation.into())
            .filename_prefix(prefix);
        if let Some(ext) = self.path.extension().and_then(|e| e.to_str()) {
            builder = builder.filename_suffix(ext);
        }
        if self.max_files > 0 {
            builder = builder.max_log_files(self.max_files);
        }

        builder
            .build(&dir)
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level.
    pub level: LogLevel,
    /// Console format.
    pub format: LogFormat,
    /// Optional log file.
    pub file: Option<FileLogConfig>,
    /// Whether to include the event target (module path).
    pub include_target: bool,
    /// Whether to colour console output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            file: None,
            include_target: true,
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Debug level, pretty console output, no file.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            ansi: true,
            ..Self::default()
        }
    }

    /// Builds the logging configuration from the `log-*` keys.
    ///
    /// Unknown levels fall back to `info`; unknown formats and rotations
    /// are errors.
    pub fn from_settings(settings: &LogSettings) -> TelemetryResult<Self> {
        let file = match settings.log_file_path.as_deref() {
            Some(path) if !path.is_empty() => Some(FileLogConfig {
                path: PathBuf::from(path),
                rotation: settings.log_file_rotation.parse()?,
                max_files: settings.log_file_max_backups,
            }),
            _ => None,
        };

        Ok(Self {
            level: LogLevel::parse_lenient(&settings.log_level),
            format: settings.log_format.parse()?,
            file,
            ..Self::default()
        })
    }
}

/// Renders timestamps as `YYYY-MM-DD HH:MM:SS.mmm` in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcMillis;

impl FormatTime for UtcMillis {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Keeps the file writer alive. Buffered lines are flushed when dropped.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    file: Option<WorkerGuard>,
    file_path: Option<PathBuf>,
}

impl LogGuard {
    /// The configured log file, if file logging is active.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns true if a file writer is running.
    #[must_use]
    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] if a global subscriber is
/// already installed or the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<LogGuard> {
    let filter = create_env_filter(config.level.as_str())?;

    let console = match config.format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_timer(UtcMillis)
            .with_target(config.include_target)
            .with_ansi(config.ansi)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_timer(UtcMillis)
            .with_target(config.include_target)
            .with_ansi(config.ansi)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_timer(UtcMillis)
            .with_target(config.include_target)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let mut guard = LogGuard::default();
    let file_layer = match &config.file {
        Some(file) => {
            let (writer, worker) = tracing_appender::non_blocking(file.appender()?);
            guard.file = Some(worker);
            guard.file_path = Some(file.path.clone());
            Some(
                tracing_subscriber::fmt::layer()
                    .with_timer(UtcMillis)
                    .with_target(config.include_target)
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    Ok(guard)
}

/// Creates an env filter from a string.
///
/// # Arguments
///
/// * `filter` - Filter string (e.g., "info", "webstrap_server=debug,hyper=warn")
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Standard log field names.
pub mod fields {
    /// Service name field name.
    pub const SERVICE_NAME: &str = "service.name";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// HTTP status code field name.
    pub const HTTP_STATUS: &str = "http.status_code";

    /// Duration field name (in milliseconds).
    pub const DURATION_MS: &str = "duration_ms";

    /// Remote address field name.
    pub const REMOTE_ADDR: &str = "remote_addr";

    /// Error field name.
    pub const ERROR: &str = "error";
}

/// Logs a request completion event.
#[macro_export]
macro_rules! log_request_complete {
    ($method:expr, $path:expr, $status:expr, $duration_ms:expr) => {
        $crate::__tracing::info!(
            http.method = %$method,
            http.path = %$path,
            http.status_code = $status,
            duration_ms = $duration_ms,
            "Request completed"
        );
    };
}

/// Logs a request error event.
#[macro_export]
macro_rules! log_request_error {
    ($method:expr, $path:expr, $error:expr) => {
        $crate::__tracing::error!(
            http.method = %$method,
            http.path = %$path,
            error = %$error,
            "Request failed"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::parse_lenient("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::parse_lenient("info"), LogLevel::Info);
        assert_eq!(LogLevel::parse_lenient("Warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse_lenient("ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::parse_lenient("trace"), LogLevel::Trace);
    }

    #[test]
    fn test_fatal_and_panic_map_to_error() {
        assert_eq!(LogLevel::parse_lenient("FATAL"), LogLevel::Error);
        assert_eq!(LogLevel::parse_lenient("panic"), LogLevel::Error);
    }

    #[test]
    fn test_unknown_level_is_info() {
        assert_eq!(LogLevel::parse_lenient("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::parse_lenient(""), LogLevel::Info);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_format_and_rotation_names() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());

        assert_eq!("hourly".parse::<LogRotation>().unwrap(), LogRotation::Hourly);
        assert_eq!("Never".parse::<LogRotation>().unwrap(), LogRotation::Never);
        assert!("weekly".parse::<LogRotation>().is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings = LogSettings {
            log_file_path: Some("/var/log/orders.log".to_string()),
            log_level: "FATAL".to_string(),
            log_file_max_backups: 3,
            log_file_rotation: "hourly".to_string(),
            log_format: "json".to_string(),
        };
        let config = LogConfig::from_settings(&settings).unwrap();

        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Json);
        let file = config.file.unwrap();
        assert_eq!(file.path, PathBuf::from("/var/log/orders.log"));
        assert_eq!(file.rotation, LogRotation::Hourly);
        assert_eq!(file.max_files, 3);
    }

    #[test]
    fn test_from_default_settings_has_no_file() {
        let config = LogConfig::from_settings(&LogSettings::default()).unwrap();
        assert_eq!(config, LogConfig::default());

        let empty_path = LogSettings {
            log_file_path: Some(String::new()),
            ..LogSettings::default()
        };
        assert!(LogConfig::from_settings(&empty_path).unwrap().file.is_none());
    }

    #[test]
    fn test_from_settings_rejects_bad_rotation() {
        let settings = LogSettings {
            log_file_path: Some("app.log".to_string()),
            log_file_rotation: "weekly".to_string(),
            ..LogSettings::default()
        };
        assert!(LogConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("webstrap_server=debug,hyper=warn").is_ok());
        assert!(create_env_filter("webstrap=notalevel").is_err());
    }

    #[test]
    fn test_appender_rejects_path_without_name() {
        let file = FileLogConfig::new("/");
        assert!(file.appender().is_err());
    }

    #[test]
    fn test_timestamp_layout() {
        let mut out = String::new();
        UtcMillis.format_time(&mut Writer::new(&mut out)).unwrap();
        // 2020-07-15 09:43:26.578
        assert_eq!(out.len(), 23);
        assert_eq!(&out[4..5], "-");
        assert_eq!(&out[10..11], " ");
        assert_eq!(&out[19..20], ".");
    }
}
