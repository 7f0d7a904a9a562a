//! # webstrap
//!
//! Bootstrap for HTTP services. An application implements [`Application`],
//! hands itself to [`execute`], and gets:
//!
//! - a command-line entry point with a global `--config <FILE>` flag
//! - layered configuration (`application.{yaml,toml,json}`, `.env`,
//!   `WEBSTRAP__*` environment overrides)
//! - console and rolling-file logging
//! - an HTTP server with graceful shutdown on SIGINT and SIGTERM
//! - typed accessors for path and query parameters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use webstrap::prelude::*;
//!
//! struct Hello;
//!
//! impl Application for Hello {
//!     fn init(&mut self, _settings: &Settings) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn initialize_routes(&self, router: &mut Router<Handler>) {
//!         router.route(
//!             Method::GET,
//!             "/users/{id}",
//!             handler(|req| async move {
//!                 let id = param_as_u64(&req, "id", 0);
//!                 respond_with_json(StatusCode::OK, &id)
//!             }),
//!         );
//!     }
//!
//!     fn cleanup(&mut self) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn properties(&self) -> Properties {
//!         Properties::new("hello", "Says hello", "A service that says hello")
//!     }
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     webstrap::execute(Hello)
//! }
//! ```

mod cli;
mod service;

pub use cli::{command, execute, load_settings, run, run_with_shutdown, GlobalArgs, ENV_PREFIX};
pub use webstrap_config::MAX_PORT;
pub use service::{Application, Properties};

pub use webstrap_config as config;
pub use webstrap_params as params;
pub use webstrap_router as router;
pub use webstrap_server as server;
pub use webstrap_telemetry as telemetry;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{execute, Application, Properties};

    pub use bytes::Bytes;
    pub use http::{Method, Request, StatusCode};

    pub use webstrap_config::Settings;
    pub use webstrap_params::*;
    pub use webstrap_router::Router;
    pub use webstrap_server::{
        handler, respond_with_error, respond_with_json, Handler, HttpResponse,
    };
}
