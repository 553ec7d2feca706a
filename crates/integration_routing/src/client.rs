//! Walking-route backend client
//!
//! Issues one POST per route request with both coordinates in the body.
//! Success responses are a route feature collection; failure responses
//! carry a `{detail}` message and a non-2xx status.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, RouteFeatureCollection};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::RoutingConfig;
use crate::error::RoutingError;

/// Fallback message when the backend gives no failure detail
pub const NO_ROUTE_MESSAGE: &str = "No route found. Try points closer to a main road.";

/// Trait for routing backend clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Request a walking route between two coordinates
    async fn request_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteFeatureCollection, RoutingError>;

    /// Check if the routing backend is reachable
    async fn is_healthy(&self) -> bool;
}

/// HTTP client for the walking-route backend
#[derive(Debug)]
pub struct RouteBackendClient {
    client: Client,
    config: RoutingConfig,
}

impl RouteBackendClient {
    /// Create a new routing backend client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("walkabout/0.1")
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Extract the failure message from a non-success response body
    fn failure_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.detail)
            .unwrap_or_else(|| NO_ROUTE_MESSAGE.to_string())
    }
}

#[async_trait]
impl RoutingClient for RouteBackendClient {
    #[instrument(skip(self), fields(start = %start, end = %end))]
    async fn request_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteFeatureCollection, RoutingError> {
        let url = format!("{}/route", self.config.base_url);

        let body = RouteRequest {
            start_lon: start.longitude(),
            start_lat: start.latitude(),
            end_lon: end.longitude(),
            end_lat: end.latitude(),
        };

        debug!(?url, "Requesting route");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::failure_message(&body);
            warn!(%status, %message, "Route request rejected");
            return Err(RoutingError::RequestFailed(message));
        }

        let route: RouteFeatureCollection = response
            .json()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        debug!(features = route.features.len(), "Route received");
        Ok(route)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/", self.config.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }
}

/// Route request body: both coordinates, WGS84 degrees
#[derive(Debug, Serialize)]
struct RouteRequest {
    start_lon: f64,
    start_lat: f64,
    end_lon: f64,
    end_lat: f64,
}

/// Failure-detail shape of non-success responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}
