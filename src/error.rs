//! Error types for the catalog client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Client Error Enum ==
/// Unified error type for the catalog client.
///
/// Persistent-tier storage and serialization failures never surface here;
/// they are logged and absorbed inside the cache so the fetch path keeps
/// working on the memory tier alone.
///
/// The enum is `Clone` so a single in-flight request can fan its outcome
/// out to every deduplicated waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The API rejected the credentials (HTTP 401). Never masked by the
    /// stale-cache fallback.
    #[error("Authentication required. Please check your API key.")]
    AuthRequired,

    /// Non-success HTTP status other than 401.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The network layer failed before a status was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The response was missing an expected payload field.
    #[error("Missing data in response: {0}")]
    MissingData(String),

    /// A request payload failed validation before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog client.
pub type Result<T> = std::result::Result<T, ClientError>;
