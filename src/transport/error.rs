//! Error types for transport operations.

use thiserror::Error;

/// Error type for transport operations.
///
/// Describes why a transport call could not be completed. The executor
/// wraps every one of these into a single execution failure.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the deadline configured on the client.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value cannot be carried by HTTP.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The offending header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },
}
