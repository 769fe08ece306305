//! Quote Client Entry Point
//!
//! Polls the quote server at a fixed interval until Ctrl-C.

mod client;
mod config;

use client::QuoteClient;
use config::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        server = %config.server_host,
        pow_deadline = ?config.pow_deadline,
        interval = ?config.quote_interval,
        "Starting quote client"
    );

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let mut client = QuoteClient::new(http, config.server_host.as_str(), config.pow_deadline);

    let mut ticker = tokio::time::interval(config.quote_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => match client.get_quote().await {
                Ok(quote) => tracing::info!(%quote, "Received quote"),
                Err(e) => tracing::warn!(error = %e, "Failed to get quote"),
            },
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                }
                break;
            }
        }
    }

    tracing::info!("Termination signal received");
    Ok(())
}
