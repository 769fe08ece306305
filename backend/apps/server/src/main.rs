//! Quote Server Entry Point
//!
//! Serves random quotes behind the PoW gate.
//! Uses `anyhow` for startup errors; request-level errors are
//! `pow::PowError`.

mod config;
mod quote;

use axum::Router;
use config::ServerConfig;
use pow::{GenerationalStore, PowAppState, RedisStore, TtlStore, pow_router, protect};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,pow=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        port = config.port,
        redis = config.redis_url.is_some(),
        target_bits = %config.pow.target_bits,
        token_lifetime = ?config.pow.access_ttl,
        "Loaded configuration"
    );

    if config.pow.retention_shorter_than_tokens() {
        tracing::warn!(
            retention = ?config.pow.ledger_retention,
            "Ledger retention is shorter than token lifetimes; valid tokens may be rejected"
        );
    }

    match config.redis_url.clone() {
        Some(url) => {
            let store = RedisStore::connect(&url, config.pow.ledger_retention).await?;
            serve(store, config).await
        }
        None => {
            tracing::info!("REDIS_URL not set, using in-process token store");
            let store = GenerationalStore::new(config.pow.ledger_retention);
            tracing::info!(retention = ?store.retention(), "Token ledger generations");
            serve(store, config).await
        }
    }
}

async fn serve<S>(store: S, config: ServerConfig) -> anyhow::Result<()>
where
    S: TtlStore + Send + Sync + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = PowAppState::new(store, config.pow)?;
    let app = build_app(state).layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    serve_until(listener, app, shutdown_signal(), SHUTDOWN_GRACE).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Serves until `signal` fires, then waits at most `grace` for open
/// connections to drain.
async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        Ok(()) = signalled_rx => match tokio::time::timeout(grace, &mut server).await {
            Ok(result) => result?,
            Err(_) => tracing::warn!(
                ?grace,
                "Connections still open after grace period, forcing shutdown"
            ),
        },
    }
    Ok(())
}

fn build_app<S>(state: PowAppState<S>) -> Router
where
    S: TtlStore + Send + Sync + 'static,
{
    protect(quote::quote_router(), state.clone()).merge(pow_router(state))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
