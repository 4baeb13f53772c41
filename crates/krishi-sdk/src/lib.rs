//! # Krishi SDK
//!
//! Client SDK for the Krishi order service.

pub mod auth;
pub mod client;
pub mod config;
pub mod gateway;

pub use auth::{CredentialProvider, NoCredentials, StaticCredentials};
pub use client::OrderClient;
pub use config::ClientConfig;
pub use gateway::OrderGateway;

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::auth::{CredentialProvider, NoCredentials, StaticCredentials};
    pub use crate::client::OrderClient;
    pub use crate::config::ClientConfig;
    pub use crate::gateway::OrderGateway;
    pub use krishi_core::prelude::*;
}
