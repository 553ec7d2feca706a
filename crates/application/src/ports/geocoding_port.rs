//! Geocoding port
//!
//! Defines the interface for resolving free-text addresses to coordinates.
//! Adapters in the infrastructure layer implement this port using a
//! geocoding provider.

use async_trait::async_trait;
use domain::{Address, Coordinate};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for address resolution
///
/// One request per call; only the provider's first candidate is consumed.
/// An unresolvable address, including a transport failure on the way to
/// the provider, surfaces as `GeocodeNotFound` naming the query.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a free-text address to a coordinate
    async fn resolve(&self, query: &Address) -> Result<Coordinate, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeocodingPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }
}
