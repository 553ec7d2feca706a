//! Routing error types

use thiserror::Error;

/// Errors that can occur when requesting a route
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing backend failed
    #[error("Routing connection failed: {0}")]
    ConnectionFailed(String),

    /// The backend rejected the request; carries the backend's failure
    /// detail or a generic no-route message
    #[error("{0}")]
    RequestFailed(String),

    /// Failed to parse the route response
    #[error("Route parse error: {0}")]
    ParseError(String),

    /// Request timeout
    #[error("Route request timed out")]
    Timeout,
}

impl RoutingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout)
    }
}
