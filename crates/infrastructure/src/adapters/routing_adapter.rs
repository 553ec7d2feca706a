//! Routing adapter - Implements RoutingPort using integration_routing

use application::error::ApplicationError;
use application::ports::RoutingPort;
use async_trait::async_trait;
use domain::{Coordinate, RouteFeatureCollection};
use integration_routing::{NO_ROUTE_MESSAGE, RouteBackendClient, RoutingClient, RoutingError};
use tracing::{instrument, warn};

/// Adapter for route requests against the walking-route backend
///
/// Backend rejections carry their failure detail through verbatim;
/// transport-level failures surface as the generic no-route message.
#[derive(Debug)]
pub struct RouteBackendAdapter {
    client: RouteBackendClient,
}

impl RouteBackendAdapter {
    /// Create a new routing adapter
    pub fn new(client: RouteBackendClient) -> Self {
        Self { client }
    }

    /// Check if the routing backend is reachable
    pub async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }
}

#[async_trait]
impl RoutingPort for RouteBackendAdapter {
    #[instrument(skip(self), fields(start = %start, end = %end))]
    async fn request_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteFeatureCollection, ApplicationError> {
        self.client.request_route(start, end).await.map_err(|error| {
            warn!(%error, "Route request failed");
            let message = match error {
                RoutingError::RequestFailed(detail) => detail,
                _ => NO_ROUTE_MESSAGE.to_string(),
            };
            ApplicationError::RouteRequestFailed(message)
        })
    }
}
