//! Krishi reference order service binary.

use krishi_node::{run_server, NodeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Krishi order service starting");

    let config = NodeConfig::from_env()?;
    run_server(config).await
}
