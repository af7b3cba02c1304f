//! Ticket relay web server.
//!
//! Receives ticketing webhooks, verifies their signature and forwards each
//! ticket to the matching chat webhook as an embed.

use std::net::SocketAddr;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ticket_relay::{create_router, AppState, Config, ROUTES};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    let started = Instant::now();
    info!("relay_starting");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "config_invalid");
            return Err(e).context("Failed to load configuration");
        }
    };
    info!(
        port = config.port,
        ticket_base_url = %config.ticket_base_url,
        route_count = ROUTES.len(),
        "config_loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(started))
        .await
        .context("Server error")?;

    info!("relay_shutdown_complete");

    Ok(())
}

/// Resolve on SIGINT or SIGTERM, logging which arrived and how long the
/// relay served. In-flight relays finish before the server exits.
async fn shutdown_signal(started: Instant) {
    let received = tokio::select! {
        _ = interrupt() => "SIGINT",
        _ = terminate() => "SIGTERM",
    };

    info!(
        signal = received,
        uptime_seconds = started.elapsed().as_secs(),
        "relay_shutting_down"
    );
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "sigint_handler_unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!(error = %e, "sigterm_handler_unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
