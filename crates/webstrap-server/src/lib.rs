//! # webstrap-server
//!
//! HTTP server for webstrap services, built on hyper and tokio.
//!
//! - [`Server`] serves a [`Router<Handler>`](webstrap_router::Router) and
//!   stores each match's [`PathVars`](webstrap_router::PathVars) in the
//!   request extensions
//! - [`respond_with_json`] and [`respond_with_error`] build JSON responses
//! - [`ShutdownSignal`] and [`ConnectionTracker`] drive graceful shutdown
//! - [`ServerMessage`] travels on the supervisor control channel
//!
//! Unknown paths get a `404` JSON error and known paths with no handler for
//! the request method get a `405` with an `Allow` header. Handlers that run
//! past the write timeout are answered with `504`.

mod config;
mod error;
mod handler;
mod message;
mod response;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HOST, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_PORT,
    DEFAULT_READ_TIMEOUT_SECS, DEFAULT_SERVICE_NAME, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
    DEFAULT_WRITE_TIMEOUT_SECS,
};
pub use error::ServerError;
pub use handler::{handler, BoxedResponse, Handler, HttpResponse, ResponseBody};
pub use message::{channel, MessageReceiver, MessageSender, ServerMessage};
pub use response::{respond_with_error, respond_with_json, APPLICATION_JSON};
pub use server::Server;
pub use shutdown::{
    wait_for_os_signal, ConnectionToken, ConnectionTracker, ShutdownReceiver, ShutdownSignal,
};
