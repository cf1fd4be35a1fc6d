// `check-config` prints the effective configuration to stdout
#![allow(clippy::print_stdout)]

mod config;
mod logging;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Runs one side of the hopwire pair: the downstream service or the gateway
/// in front of it.
#[derive(Parser, Debug)]
#[command(name = "hopwire-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file layered over the built-in defaults
    #[arg(short, long, env = "HOPWIRE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Serve the downstream demo service
    Downstream,
    /// Serve the gateway
    Gateway,
    /// Print the effective configuration as JSON and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::CheckConfig => {
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(())
        }
        Command::Downstream => {
            logging::init(&cfg.logging)?;
            let app = hopwire_downstream::router(&cfg.downstream.settings);
            serve("downstream", cfg.downstream.bind_addr, app).await
        }
        Command::Gateway => {
            logging::init(&cfg.logging)?;
            let app = hopwire_gateway::router(&cfg.gateway.settings)?;
            serve("gateway", cfg.gateway.bind_addr, app).await
        }
    }
}

async fn serve(role: &'static str, addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {role} to {addr}"))?;
    info!(role, %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| format!("{role} server failed"))?;

    info!(role, "Stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
