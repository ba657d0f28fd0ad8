mod cli;
mod logging;
mod server;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;

use beutel_core::{MempoolClient, MempoolOptions, Network};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A missing .env file is normal outside development.
    dotenvy::dotenv().ok();
    let args = cli::Cli::parse();
    logging::init(args.log_json);

    let network = Network::parse(&args.network);
    if network.as_str() != args.network {
        tracing::warn!(
            requested = %args.network,
            "unrecognized network name, falling back to mainnet"
        );
    }

    let provider = MempoolClient::with_options(
        network,
        MempoolOptions {
            base_url: args.upstream_url.clone(),
            timeout: Duration::from_secs(args.upstream_timeout_secs),
        },
    )
    .wrap_err("configure upstream explorer client")?;

    tracing::info!(
        %network,
        upstream = %provider.base_url(),
        timeout_secs = args.upstream_timeout_secs,
        "upstream explorer configured"
    );

    let state = server::AppState {
        provider: Arc::new(provider),
        network,
    };
    let router = server::build_router(state);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .wrap_err_with(|| format!("bind TCP listener on {bind_addr}"))?;

    tracing::info!(%network, "beutel listening on {bind_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("run HTTP server")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "cannot listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
