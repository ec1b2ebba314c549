use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_proxy::{Dispatcher, ProxyConfig, ProxyContext};

/// Concurrent forwarding proxy for plain-text HTTP GET traffic.
#[derive(Parser)]
#[command(name = "relay-proxy")]
struct Cli {
    /// Port to listen on.
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_proxy=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ProxyConfig::for_port(cli.port);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        access_log = %config.access_log.path,
        chunk_size = config.relay.chunk_size,
        "configuration loaded"
    );

    let context = Arc::new(ProxyContext::new(&config)?);
    let dispatcher = Dispatcher::bind(&config.listener.bind_address).await?;

    // Runs until an accept fails, which is fatal to the whole process.
    dispatcher.run(context).await?;
    Ok(())
}
