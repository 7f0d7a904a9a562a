//! Logging for webstrap services.
//!
//! ```rust,ignore
//! use webstrap_telemetry::{init_logging, LogConfig};
//!
//! let _guard = init_logging(&LogConfig::default())?;
//! tracing::info!("Starting service");
//! ```
//!
//! Keep the returned [`LogGuard`] alive for as long as file logging should
//! run; buffered lines are flushed when it is dropped.

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{
    create_env_filter, fields, init_logging, FileLogConfig, LogConfig, LogFormat, LogGuard,
    LogLevel, LogRotation, UtcMillis,
};

#[doc(hidden)]
pub use tracing as __tracing;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
