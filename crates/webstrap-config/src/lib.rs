//! Layered configuration for webstrap services.
//!
//! Configuration is read into a tree from, in increasing precedence:
//! caller defaults, an `application.yaml` (or `.yml`, `.toml`, `.json`)
//! file, an optional `.env` file, and `PREFIX__SECTION__KEY` environment
//! variables.
//!
//! Values are read back through [`Settings::get`], whose accessors take a
//! default and never fail, or as the typed [`AppConfig`] for the keys the
//! bootstrap itself uses.
//!
//! # Example
//!
//! ```
//! use webstrap_config::{keys, ConfigLoader};
//!
//! # fn main() -> Result<(), webstrap_config::ConfigError> {
//! let settings = ConfigLoader::new()
//!     .with_string("service:\n  name: orders\n  port: 8080\n", "yaml")?
//!     .with_env_prefix("WEBSTRAP")
//!     .load()?;
//!
//! settings.require([keys::SERVICE_PORT])?;
//! assert_eq!(settings.get(keys::SERVICE_NAME).string("unknown"), "orders");
//!
//! let config = settings.app_config()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
pub mod keys;
mod loader;
mod settings;

pub use config::{
    AppConfig, LogSettings, ServiceConfig, LOG_FORMATS, LOG_LEVELS, LOG_ROTATIONS, MAX_PORT,
};
pub use error::ConfigError;
pub use loader::{
    default_search_dirs, find_config_file, ConfigLoader, Format, CONFIG_FILE_EXTENSIONS,
    CONFIG_FILE_STEM,
};
pub use settings::{Entry, KeyPath, Settings};
