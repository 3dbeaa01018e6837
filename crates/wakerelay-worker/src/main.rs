#![doc = include_str!("../README.md")]

mod worker;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use worker::client::HttpBroker;
use worker::config::{CliArgs, WorkerConfig};
use worker::identity;
use worker::poll::Poller;
use worker::telemetry::init_telemetry;
use worker::wake::WakeDispatch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = WorkerConfig::try_from(args)?;

    init_telemetry()?;

    let id = identity::resolve(config.id.as_deref()).context("cannot determine worker id")?;
    tracing::info!("Machine id: {id}");
    if cfg!(debug_assertions) {
        tracing::info!("Starting worker with full config: {:#?}", config);
    }

    let broker = HttpBroker::new(config.broker_url.clone(), config.request_timeout)?;
    let wake = WakeDispatch::from(&config.wake);
    let mut poller = Poller::new(id.to_string(), broker, wake, config.backoff);

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    poller.run(shutdown).await;
    tracing::info!("Worker shut down successfully");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }

    tracing::info!("Shutdown signal received, stopping after the current poll...");
    shutdown.cancel();
}
