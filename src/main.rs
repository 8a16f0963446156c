//! A2A orchestration server - main entry point

use a2a_orchestrator::config::OrchestratorConfig;
use a2a_orchestrator::observability::{init_default_logging, metrics};
use a2a_orchestrator::orchestrator::{HttpConnectionFactory, Orchestrator};
use a2a_orchestrator::server::A2aServer;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

/// A2A orchestration server
#[derive(Parser)]
#[command(name = "a2a-orchestrator")]
#[command(about = "A2A orchestration server: registers agents, routes tasks, aggregates replies")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the orchestration server
    Run,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!(
        "Starting A2A orchestration server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => run_server(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Application shutdown complete");
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<OrchestratorConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(OrchestratorConfig::load_from_file(path)?)
        }
        None => {
            // Try default locations
            let default_paths = vec!["orchestrator.toml", "config/orchestrator.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(OrchestratorConfig::load_from_file(&path)?);
                }
            }

            error!(
                "No configuration file found. Please provide one with -c/--config or create orchestrator.toml"
            );
            process::exit(1);
        }
    }
}

async fn run_server(config: OrchestratorConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Application starting with orchestrator ID: {}",
        config.orchestrator.id
    );

    let collector = metrics();
    collector.set_server_state("initializing");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let factory = Arc::new(HttpConnectionFactory::new(Duration::from_secs(
        config.agents.dispatch_timeout_secs,
    )));
    let orchestrator = Arc::new(Orchestrator::new(config, factory)?);

    // Resolve configured remote agents before accepting traffic
    orchestrator.bootstrap().await;
    let refresher = orchestrator.spawn_liveness_refresher();

    let server = A2aServer::new(orchestrator);

    let shutdown = async {
        let mut sigint = match signal::unix::signal(signal::unix::SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to install SIGINT handler: {}", e);
                return;
            }
        };
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                return;
            }
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };

    server.run(addr, shutdown).await;

    refresher.abort();
    Ok(())
}

fn handle_config_command(
    config: OrchestratorConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}
