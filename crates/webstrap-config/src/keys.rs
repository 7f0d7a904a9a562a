//! Well-known configuration keys.
//!
//! Keys are dotted paths into the configuration tree, as written in
//! `application.yaml`.

/// Application version.
pub const VERSION: &str = "version";
/// Service name.
pub const SERVICE_NAME: &str = "service.name";
/// Host the service binds to.
pub const SERVICE_HOST: &str = "service.host";
/// Port the service listens on.
pub const SERVICE_PORT: &str = "service.port";
/// Capacity of the server control channel.
pub const SERVICE_COMMAND_BUFFER: &str = "service.api-command-buffer";
/// Handler write timeout, in seconds.
pub const SERVICE_WRITE_TIMEOUT: &str = "service.write-timeout-seconds";
/// Request header read timeout, in seconds.
pub const SERVICE_READ_TIMEOUT: &str = "service.read-timeout-seconds";
/// Keep-alive idle timeout, in seconds. `0` disables keep-alive.
pub const SERVICE_IDLE_TIMEOUT: &str = "service.idle-timeout-seconds";
/// Log file path. No file logging when unset.
pub const LOG_FILE_PATH: &str = "log-file-path";
/// Log level.
pub const LOG_LEVEL: &str = "log-level";
/// Number of rotated log files to keep.
pub const LOG_FILE_MAX_BACKUPS: &str = "log-file-max-backups";
/// Log file rotation period: `daily`, `hourly`, `minutely` or `never`.
pub const LOG_FILE_ROTATION: &str = "log-file-rotation";
/// Console log format: `compact`, `pretty` or `json`.
pub const LOG_FORMAT: &str = "log-format";
