//! Application-level errors

use domain::MalformedRoute;
use thiserror::Error;

/// Errors that can occur while planning a route
///
/// Each variant is terminal for the run that raised it; recovery is a
/// fresh submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// An address could not be resolved to a coordinate; names the
    /// failing query. Transport failures at the geocoding boundary fold
    /// into this variant.
    #[error("Could not find location: \"{query}\"")]
    GeocodeNotFound {
        /// The free-text query that failed to resolve
        query: String,
    },

    /// The routing backend rejected the request or was unreachable;
    /// carries the backend's failure detail or a generic no-route message
    #[error("{0}")]
    RouteRequestFailed(String),

    /// The route response violated the expected shape
    #[error(transparent)]
    MalformedRoute(#[from] MalformedRoute),
}
