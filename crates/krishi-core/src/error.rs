//! Error types for order operations.

use thiserror::Error;

/// Main error type for Krishi order operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// The request could not be sent or did not complete.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The server answered with something that is not JSON.
    #[error("Server error: expected JSON response ({0})")]
    MalformedResponse(String),

    /// The referenced order or item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A draft or status value failed validation before being sent.
    #[error("Invalid order: {0}")]
    Invalid(String),

    /// The item carries neither a line id nor an index into its order.
    #[error("Item '{item}' of order {order_id} has no stable key")]
    MissingItemKey { order_id: String, item: String },

    /// The operation is not available to the current viewer.
    #[error("Not permitted: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrderError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            OrderError::Network(_) => true,
            OrderError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the server rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, OrderError::Server { status: 401, .. })
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            OrderError::Server { status, .. } => Some(*status),
            OrderError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Message suitable for showing to the person using the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            OrderError::Server { message, .. } => message.clone(),
            OrderError::NotFound(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Convenience Result type for order operations.
pub type Result<T> = std::result::Result<T, OrderError>;

impl From<serde_json::Error> for OrderError {
    fn from(err: serde_json::Error) -> Self {
        OrderError::Serialization(err.to_string())
    }
}
