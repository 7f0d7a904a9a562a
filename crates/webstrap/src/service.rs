//! The application contract implemented by services built on webstrap.

use clap::{ArgMatches, Command};
use webstrap_config::Settings;
use webstrap_router::Router;
use webstrap_server::Handler;

/// Text shown by the root command's help output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    /// Command name shown in usage lines.
    pub usage: String,
    /// One-line description.
    pub short_description: String,
    /// Description shown by `--help`.
    pub long_description: String,
}

impl Properties {
    /// Creates a set of command properties.
    pub fn new(
        usage: impl Into<String>,
        short_description: impl Into<String>,
        long_description: impl Into<String>,
    ) -> Self {
        Self {
            usage: usage.into(),
            short_description: short_description.into(),
            long_description: long_description.into(),
        }
    }
}

/// A service run by [`execute`](crate::execute).
///
/// The lifecycle is `init`, then `initialize_routes` while the server is
/// built, then `cleanup` once the service is told to stop.
///
/// # Example
///
/// ```rust
/// use webstrap::prelude::*;
///
/// struct Hello;
///
/// impl Application for Hello {
///     fn init(&mut self, _settings: &Settings) -> anyhow::Result<()> {
///         Ok(())
///     }
///
///     fn initialize_routes(&self, router: &mut Router<Handler>) {
///         router.route(
///             Method::GET,
///             "/hello",
///             handler(|_req| async { respond_with_json(StatusCode::OK, "Hello, World!") }),
///         );
///     }
///
///     fn cleanup(&mut self) -> anyhow::Result<()> {
///         Ok(())
///     }
///
///     fn properties(&self) -> Properties {
///         Properties::new("hello", "Says hello", "A service that says hello")
///     }
/// }
/// ```
pub trait Application {
    /// Prepares the application once configuration has been loaded.
    fn init(&mut self, settings: &Settings) -> anyhow::Result<()>;

    /// Registers the application's routes.
    fn initialize_routes(&self, router: &mut Router<Handler>);

    /// Releases resources before the process exits.
    fn cleanup(&mut self) -> anyhow::Result<()>;

    /// Help text for the root command.
    fn properties(&self) -> Properties;

    /// Extra subcommands added to the root command.
    fn commands(&self) -> Vec<Command> {
        Vec::new()
    }

    /// Runs one of the subcommands returned by [`Application::commands`].
    ///
    /// Subcommands run instead of the service; `init` is not called first.
    fn run_command(
        &mut self,
        name: &str,
        _matches: &ArgMatches,
        _settings: &Settings,
    ) -> anyhow::Result<()> {
        anyhow::bail!("command '{name}' is not implemented")
    }
}
