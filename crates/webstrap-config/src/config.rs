//! Typed view of the well-known keys.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Highest port a service may listen on.
pub const MAX_PORT: u32 = 65_535;

/// Log level names accepted in `log-level`, compared case-insensitively.
pub const LOG_LEVELS: [&str; 7] = ["trace", "debug", "info", "warn", "error", "fatal", "panic"];

/// Accepted `log-file-rotation` values.
pub const LOG_ROTATIONS: [&str; 4] = ["daily", "hourly", "minutely", "never"];

/// Accepted `log-format` values.
pub const LOG_FORMATS: [&str; 3] = ["compact", "pretty", "json"];

/// Bootstrap configuration.
///
/// ```yaml
/// version: 1.0.0
/// service:
///   name: orders
///   host: 0.0.0.0
///   port: 8080
///   api-command-buffer: 10
///   write-timeout-seconds: 15
///   read-timeout-seconds: 15
///   idle-timeout-seconds: 60
/// log-file-path: /var/log/orders.log
/// log-level: INFO
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    /// Application version.
    pub version: String,
    /// HTTP service settings.
    pub service: ServiceConfig,
    /// Logging settings; these keys live at the top level.
    #[serde(flatten)]
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.0.0".to_string(),
            service: ServiceConfig::default(),
            log: LogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Checks value ranges and enumerations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PORT).contains(&self.service.port) {
            return Err(ConfigError::invalid_value(
                crate::keys::SERVICE_PORT,
                format!(
                    "port must be between 1 and {MAX_PORT}, got {}",
                    self.service.port
                ),
            ));
        }

        if self.service.api_command_buffer == 0 {
            return Err(ConfigError::invalid_value(
                crate::keys::SERVICE_COMMAND_BUFFER,
                "must be at least 1",
            ));
        }

        one_of(crate::keys::LOG_LEVEL, &self.log.log_level, &LOG_LEVELS)?;
        one_of(crate::keys::LOG_FILE_ROTATION, &self.log.log_file_rotation, &LOG_ROTATIONS)?;
        one_of(crate::keys::LOG_FORMAT, &self.log.log_format, &LOG_FORMATS)?;

        Ok(())
    }
}

fn one_of(key: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            key,
            format!("`{value}` is not one of {}", allowed.join(", ")),
        ))
    }
}

/// `service.*` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServiceConfig {
    /// Service name, used in logs.
    pub name: String,
    /// Bind host.
    pub host: String,
    /// Bind port; validated to 1..=65535.
    pub port: u32,
    /// Capacity of the server control channel.
    pub api_command_buffer: usize,
    /// Handler timeout in seconds.
    pub write_timeout_seconds: u64,
    /// Header read timeout in seconds.
    pub read_timeout_seconds: u64,
    /// Keep-alive idle timeout in seconds; `0` disables keep-alive.
    pub idle_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "webstrap".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_command_buffer: 10,
            write_timeout_seconds: 15,
            read_timeout_seconds: 15,
            idle_timeout_seconds: 60,
        }
    }
}

impl ServiceConfig {
    /// Write timeout as a [`Duration`].
    #[must_use]
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds)
    }

    /// Read timeout as a [`Duration`].
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    /// Idle timeout as a [`Duration`].
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }
}

/// Top-level `log-*` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogSettings {
    /// Log file; console only when unset.
    pub log_file_path: Option<String>,
    /// Level name.
    pub log_level: String,
    /// Rotated files to keep.
    pub log_file_max_backups: usize,
    /// Rotation period.
    pub log_file_rotation: String,
    /// Console format.
    pub log_format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_file_path: None,
            log_level: "info".to_string(),
            log_file_max_backups: 7,
            log_file_rotation: "daily".to_string(),
            log_format: "compact".to_string(),
        }
    }
}
