//! EDHREC analyzer HTTP server.

use anyhow::Context;
use clap::Parser;
use edhrec_etl::config::server::{resolve_bind_config, ServerArgs};
use edhrec_etl::server::{self, AppState};
use edhrec_etl::utils::{logger, validation::Validate};
use edhrec_etl::{AnalyzerConfig, AnalyzerContext};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    logger::init_server_logger(args.json_logs);

    info!("Starting EDHREC analyzer server");

    let config = AnalyzerConfig::load(args.config.as_deref())
        .with_context(|| "failed to load settings")?;
    config.validate().context("invalid settings")?;

    let bind = resolve_bind_config(&args, &config);
    let context = AnalyzerContext::new(config)
        .await
        .context("failed to initialize analyzer")?;
    let state = AppState::new(context);

    let addr = bind.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    server::serve(listener, state, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
