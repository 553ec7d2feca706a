//! Walking-route backend integration
//!
//! Requests pedestrian routes between two coordinates from the routing
//! backend. One POST per request; a non-success response carries a
//! `{detail}` failure message which is surfaced to the caller.
//!
//! # Architecture
//!
//! [`RoutingClient`] defines the interface, implemented by
//! [`RouteBackendClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::Coordinate;
//! use integration_routing::{RouteBackendClient, RoutingConfig};
//!
//! let config = RoutingConfig::default();
//! let client = RouteBackendClient::new(&config)?;
//!
//! let start = Coordinate::new(-2.2453, 53.4794)?;
//! let end = Coordinate::new(-2.2309, 53.4774)?;
//! let route = client.request_route(start, end).await?;
//! ```

mod client;
mod config;
mod error;

pub use client::{NO_ROUTE_MESSAGE, RouteBackendClient, RoutingClient};
pub use config::RoutingConfig;
pub use error::RoutingError;
