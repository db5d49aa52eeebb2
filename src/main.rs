use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use room_service::{app, bootstrap};
use room_service_configuration::ENV_VAR_CONFIG_TOML_PATH;
use room_service_registry::{Outcome, ShutdownHandler};

/// Registers the room service into a Eureka registry and keeps it registered until stopped.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = ENV_VAR_CONFIG_TOML_PATH)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match bootstrap::config::initialize(args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("room-service: {e}");
            return ExitCode::from(app::EXIT_FATAL);
        }
    };

    bootstrap::tracing::setup(&config.logging);

    let shutdown = ShutdownHandler::install();

    match app::run(&config, shutdown.token()).await {
        Ok(Outcome::Deregistered(deregistered)) => {
            tracing::info!(
                instance_key = %deregistered.identity().instance_key(),
                acknowledged = deregistered.acknowledged(),
                "room service stopped"
            );
            ExitCode::from(app::EXIT_STOPPED)
        }
        Ok(Outcome::NeverRegistered { attempts }) => {
            tracing::info!(attempts, "room service stopped before registering");
            ExitCode::from(app::EXIT_STOPPED)
        }
        Err(e) => {
            tracing::error!(%e, "room service failed");
            eprintln!("room-service: {e}");
            ExitCode::from(app::EXIT_FATAL)
        }
    }
}
