//! HTTP server implementation.
//!
//! The server binds a TCP listener, serves each connection with hyper's
//! HTTP/1 implementation, and dispatches requests through a
//! [`Router<Handler>`]. The matched [`PathVars`] are stored in the request
//! extensions before the handler runs, which is where the parameter
//! accessors look for path-bound values.
//!
//! # Example
//!
//! ```rust,ignore
//! use http::{Method, StatusCode};
//! use webstrap_server::{handler, respond_with_json, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::new(ServerConfig::default()).initialize(|router| {
//!         router.route(
//!             Method::GET,
//!             "/hello",
//!             handler(|_req| async { respond_with_json(StatusCode::OK, "Hello, World!") }),
//!         );
//!     });
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::header::{HeaderValue, ALLOW};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use webstrap_router::{PathVars, Router};
use webstrap_telemetry::{log_request_complete, log_request_error};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::{Handler, HttpResponse};
use crate::message::{MessageSender, ServerMessage};
use crate::response::respond_with_error;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The webstrap HTTP server.
pub struct Server {
    config: ServerConfig,
    router: Router<Handler>,
    messages: Option<MessageSender>,
}

impl Server {
    /// Creates a server with an empty router.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: Router::new(),
            messages: None,
        }
    }

    /// Registers routes by handing the router to `init`.
    #[must_use]
    pub fn initialize<F>(mut self, init: F) -> Self
    where
        F: FnOnce(&mut Router<Handler>),
    {
        init(&mut self.router);
        self
    }

    /// Attaches the supervisor's control channel.
    ///
    /// [`ServerMessage::Stop`] is sent on it if the server fails to start.
    #[must_use]
    pub fn with_messages(mut self, sender: MessageSender) -> Self {
        self.messages = Some(sender);
        self
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router<Handler> {
        &self.router
    }

    /// Returns the router for route registration.
    pub fn router_mut(&mut self) -> &mut Router<Handler> {
        &mut self.router
    }

    /// Binds a listener to the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        if self.config.host().trim().is_empty() {
            return Err(ServerError::invalid_address("host is empty"));
        }
        let addr = self.config.http_addr();
        TcpListener::bind(addr.as_str())
            .await
            .map_err(|e| ServerError::bind(addr, e))
    }

    /// Runs the server until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds and serves until `shutdown` fires.
    ///
    /// If binding fails the error is logged, [`ServerMessage::Stop`] is sent
    /// on the control channel (if any), and the error is returned.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        match self.bind().await {
            Ok(listener) => self.serve(listener, shutdown).await,
            Err(e) => {
                self.report_start_failure(&e).await;
                Err(e)
            }
        }
    }

    /// Serves connections from an already-bound listener until `shutdown`
    /// fires, then waits up to the shutdown timeout for open connections.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            service.name = %self.config.service_name(),
            "Server listening on {}",
            local_addr
        );

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::debug!("Connection error from {}: {}", remote_addr, e);
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            "Waiting up to {:?} for {} connections to close",
            shutdown_timeout,
            tracker.active_connections()
        );

        tokio::select! {
            () = tracker.wait_for_shutdown() => {
                tracing::info!("All connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    "Shutdown timeout reached, {} connections still active",
                    tracker.active_connections()
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    async fn report_start_failure(&self, error: &ServerError) {
        tracing::error!(
            "Could not start {} service: {}",
            self.config.service_name(),
            error
        );
        if let Some(sender) = &self.messages {
            if sender.send(ServerMessage::Stop).await.is_err() {
                tracing::warn!("Supervisor channel closed before stop message was sent");
            }
        }
    }

    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(&self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let read_timeout = self.config.read_timeout();
        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(self.config.keep_alive())
            .header_read_timeout((!read_timeout.is_zero()).then_some(read_timeout));

        let conn = builder.serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!("Closing connection from {} for shutdown", remote_addr);
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(
        self: &Arc<Self>,
        req: Request<Incoming>,
    ) -> Result<HttpResponse, Infallible> {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = self.dispatch(req).await;

        log_request_complete!(
            method,
            path,
            response.status().as_u16(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
        );
        Ok(response)
    }

    async fn dispatch(&self, req: Request<Incoming>) -> HttpResponse {
        let path = req.uri().path();
        let Some((methods, vars)) = self.router.match_path(path) else {
            return respond_with_error(StatusCode::NOT_FOUND, "Not Found");
        };

        let Some(handler) = methods.target(req.method()) else {
            let mut response =
                respond_with_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            if let Ok(allow) = HeaderValue::from_str(&methods.allow_header()) {
                response.headers_mut().insert(ALLOW, allow);
            }
            return response;
        };

        let handler = Arc::clone(handler);
        let write_timeout = self.config.write_timeout();
        let method = req.method().clone();
        let path = path.to_string();
        let work = invoke(handler, req, vars);

        let outcome = if write_timeout.is_zero() {
            Some(work.await)
        } else {
            tokio::time::timeout(write_timeout, work).await.ok()
        };

        match outcome {
            Some(Ok(response)) => response,
            Some(Err(e)) => {
                log_request_error!(method, path, e);
                respond_with_error(StatusCode::BAD_REQUEST, "failed to read request body")
            }
            None => {
                tracing::warn!("Handler timed out for {} {}", method, path);
                respond_with_error(StatusCode::GATEWAY_TIMEOUT, "handler timed out")
            }
        }
    }
}

/// Buffers the body, stores the path variables, and runs the handler.
async fn invoke(
    handler: Handler,
    req: Request<Incoming>,
    vars: PathVars,
) -> Result<HttpResponse, hyper::Error> {
    let (mut parts, body) = req.into_parts();
    let body: Bytes = body.collect().await?.to_bytes();
    parts.extensions.insert(vars);
    Ok(handler(Request::from_parts(parts, body)).await)
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("routes", &self.router.len())
            .field("messages", &self.messages.is_some())
            .finish()
    }
}
