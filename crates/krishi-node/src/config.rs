//! Node configuration loaded from the environment.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;

/// Settings for the reference order service.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,

    /// Register the demo buyer and seller accounts at startup.
    pub seed_demo: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            seed_demo: true,
        }
    }
}

impl NodeConfig {
    /// Load from `KRISHI_HOST`, `KRISHI_PORT` and `KRISHI_SEED_DEMO`, reading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let host = env::var("KRISHI_HOST").unwrap_or(defaults.host);
        let port = match env::var("KRISHI_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid KRISHI_PORT '{}'", raw))?,
            Err(_) => defaults.port,
        };
        let seed_demo = match env::var("KRISHI_SEED_DEMO") {
            Ok(raw) => raw
                .parse::<bool>()
                .with_context(|| format!("Invalid KRISHI_SEED_DEMO '{}'", raw))?,
            Err(_) => defaults.seed_demo,
        };

        tracing::info!(%host, port, seed_demo, "Node configuration loaded");
        Ok(Self { host, port, seed_demo })
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_addr() {
        let addr = NodeConfig::default().listen_addr().unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_bad_host_is_rejected() {
        let config = NodeConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(config.listen_addr().is_err());
    }
}
