//! `sns-relay` binary: loads configuration, wires the SNS and CloudWatch Logs
//! clients, then serves until SIGINT or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snsrelay::aws::build_state;
use snsrelay::{build_router, Config};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        region = %config.aws_region,
        topic_arn = %config.sns_topic_arn,
        log_group = %config.cw_group_name,
        log_stream = %config.cw_stream_name,
        "relay_config_loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(build_state(config).await);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(address = %addr, "relay_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("Server error")?;

    info!("relay_stopped");
    Ok(())
}

/// JSON logs filtered by `RUST_LOG`, `info` when unset.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();
}

/// Resolves on the first of SIGINT or SIGTERM.
///
/// A signal that cannot be registered is logged and never fires, so the
/// other one still stops the server.
async fn wait_for_shutdown() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "relay_sigint_unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "relay_sigterm_unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(signal, "relay_draining");
}
