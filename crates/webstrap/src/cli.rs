//! Command-line entry point and service supervisor.
//!
//! [`execute`] builds the root command from the application's
//! [`Properties`], loads configuration, initializes logging, then starts the
//! HTTP server and waits for SIGINT, SIGTERM or a [`ServerMessage::Stop`]
//! from the server before running the application's cleanup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Command, FromArgMatches};
use webstrap_config::{keys, AppConfig, ConfigLoader, Settings};
use webstrap_server::{channel, Server, ServerConfig, ServerMessage, ShutdownSignal};
use webstrap_telemetry::{init_logging, LogConfig, LogGuard};

use crate::service::{Application, Properties};

/// Prefix of environment variables that override configuration.
pub const ENV_PREFIX: &str = "WEBSTRAP";

/// Flags shared by the root command and every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// config file (default searches for application.yaml next to the executable, then in $HOME)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Builds the root command for an application.
pub fn command(properties: &Properties, subcommands: Vec<Command>) -> Command {
    let root = Command::new(properties.usage.clone())
        .about(properties.short_description.clone())
        .long_about(properties.long_description.clone())
        .subcommands(subcommands);
    GlobalArgs::augment_args(root)
}

/// Runs the application with the process arguments and returns the exit code.
///
/// Help and usage errors are printed by clap and exit the process directly.
pub fn execute<A: Application>(app: A) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Could not start the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(app, std::env::args_os())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the application with explicit arguments until SIGINT or SIGTERM.
pub async fn run<A, I, T>(app: A, args: I) -> anyhow::Result<()>
where
    A: Application,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    run_with_shutdown(app, args, ShutdownSignal::with_os_signals()).await
}

/// Like [`run`], stopping when `stop` fires instead of on OS signals.
pub async fn run_with_shutdown<A, I, T>(
    mut app: A,
    args: I,
    stop: ShutdownSignal,
) -> anyhow::Result<()>
where
    A: Application,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(&app.properties(), app.commands()).try_get_matches_from(args)?;
    let leaf = matches.subcommand().map_or(&matches, |(_, sub)| sub);
    let global = GlobalArgs::from_arg_matches(leaf)?;

    let settings = load_settings(global.config.as_deref())?;
    let config = settings
        .app_config()
        .context("Could not read the service configuration")?;
    let _log_guard = setup_logging(&config);

    if let Some(path) = settings.source() {
        tracing::info!("Using config file: {}", path.display());
    }

    if let Some((name, sub)) = matches.subcommand() {
        return app.run_command(name, sub, &settings);
    }

    app.init(&settings)
        .context("Could not initialize the application")?;

    serve(app, &settings, config, stop).await
}

/// Loads configuration from `path`, or discovers `application.*` when no
/// path is given, then applies `.env` and `WEBSTRAP__*` overrides.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let loader = ConfigLoader::new().with_dotenv();
    let loader = match path {
        Some(path) => loader
            .with_file(path)
            .with_context(|| format!("Could not load config file {}", path.display()))?,
        None => loader.discover()?,
    };
    Ok(loader.with_env_prefix(ENV_PREFIX).load()?)
}

fn setup_logging(config: &AppConfig) -> Option<LogGuard> {
    let result = LogConfig::from_settings(&config.log).and_then(|log| init_logging(&log));
    match result {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging was not initialized: {e}");
            None
        }
    }
}

async fn serve<A: Application>(
    mut app: A,
    settings: &Settings,
    config: AppConfig,
    stop: ShutdownSignal,
) -> anyhow::Result<()> {
    settings.require([keys::SERVICE_HOST, keys::SERVICE_PORT])?;

    config.validate()?;

    tracing::info!(
        "Starting service on {}:{}",
        config.service.host,
        config.service.port
    );

    let (sender, mut messages) = channel(config.service.api_command_buffer);
    let server = Server::new(ServerConfig::from_service(&config.service)?)
        .with_messages(sender)
        .initialize(|router| app.initialize_routes(router));

    let server_shutdown = ShutdownSignal::new();
    let server_task = tokio::spawn(server.run_with_shutdown(server_shutdown.clone()));

    loop {
        tokio::select! {
            () = stop.recv() => {
                tracing::info!("Caught termination signal: terminating");
                break;
            }
            message = messages.recv() => match message {
                Some(ServerMessage::Stop) => {
                    tracing::info!("Stop request from API server has been received, stopping service");
                    break;
                }
                Some(other) => {
                    tracing::info!(
                        "Received an unrecognised command from the API server: {}, ignoring",
                        other.code()
                    );
                }
                None => {
                    tracing::warn!("API server exited without a stop request, stopping service");
                    break;
                }
            }
        }
    }

    server_shutdown.trigger();
    let served = server_task.await;

    if let Err(e) = app.cleanup() {
        tracing::error!("Could not execute cleanup - {}", e);
        return Err(e.context("Could not execute cleanup"));
    }

    served.context("API server task failed")??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> Properties {
        Properties::new("orders", "Order service", "Serves and stores orders")
    }

    #[test]
    fn test_command_uses_properties() {
        let cmd = command(&props(), Vec::new());
        assert_eq!(cmd.get_name(), "orders");
        assert_eq!(cmd.get_about().map(ToString::to_string).as_deref(), Some("Order service"));
        assert_eq!(
            cmd.get_long_about().map(ToString::to_string).as_deref(),
            Some("Serves and stores orders")
        );
    }

    #[test]
    fn test_config_flag_is_global() {
        let cmd = command(&props(), vec![Command::new("migrate")]);
        let matches = cmd
            .try_get_matches_from(["orders", "migrate", "--config", "/etc/orders.yaml"])
            .unwrap();

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "migrate");
        let global = GlobalArgs::from_arg_matches(sub).unwrap();
        assert_eq!(global.config, Some(PathBuf::from("/etc/orders.yaml")));
    }

    #[test]
    fn test_config_flag_optional() {
        let matches = command(&props(), Vec::new())
            .try_get_matches_from(["orders"])
            .unwrap();
        let global = GlobalArgs::from_arg_matches(&matches).unwrap();
        assert!(global.config.is_none());
    }

    #[test]
    fn test_load_settings_missing_file() {
        let err = load_settings(Some(Path::new("/nonexistent/application.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Could not load config file"));
    }
}
