//! Routing port
//!
//! Defines the interface for requesting a walking route between two
//! coordinates. Adapters in the infrastructure layer implement this port
//! using the routing backend.

use async_trait::async_trait;
use domain::{Coordinate, RouteFeatureCollection};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for route requests
///
/// Exactly one outstanding request per pipeline run; the pipeline does not
/// call this until both coordinates are resolved.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Request a walking route between two coordinates
    async fn request_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteFeatureCollection, ApplicationError>;
}
