//! Route search orchestration
//!
//! Sequences the pipeline for one search: resolve the start address, then
//! (only on success) the end address, then request the route, then attach
//! the synthesized connectors. State transitions are pure functions of
//! (state, event); all network effects live in [`RoutePlannerService`],
//! which publishes every applied transition for the rendering surface.
//!
//! Overlapping submissions are guarded by a generation counter: each
//! submission bumps it, and an effect result is applied only while its
//! generation is still current, so responses from a superseded run can
//! never overwrite the newer run's state.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use domain::{Address, ConnectorFeatureCollection, Coordinate, RouteFeatureCollection};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{GeocodingPort, RoutingPort};
use crate::services::connectors;

/// Where a pipeline run currently stands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PipelinePhase {
    /// No search submitted yet
    Idle,
    /// Resolving the start address
    ResolvingStart,
    /// Start resolved; resolving the end address
    ResolvingEnd,
    /// Both addresses resolved; waiting on the routing backend
    Requesting,
    /// Route received and connectors attached
    Succeeded {
        /// The computed route
        route: RouteFeatureCollection,
        /// The synthesized doorstep segments
        connectors: ConnectorFeatureCollection,
    },
    /// The run failed; the machine awaits the next submission
    Failed {
        /// Human-readable failure description
        reason: String,
    },
}

/// UI-facing state of the search pipeline
///
/// Created fresh per submission and superseded by the next one. Coordinates
/// resolved before a failure are preserved so their markers stay visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineState {
    generation: u64,
    #[serde(flatten)]
    phase: PipelinePhase,
    start: Option<Coordinate>,
    end: Option<Coordinate>,
}

impl PipelineState {
    /// The initial state before any submission
    #[must_use]
    pub fn idle() -> Self {
        Self {
            generation: 0,
            phase: PipelinePhase::Idle,
            start: None,
            end: None,
        }
    }

    /// Submission counter of the run this state belongs to
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> &PipelinePhase {
        &self.phase
    }

    /// Resolved start coordinate, if any
    #[must_use]
    pub const fn start(&self) -> Option<Coordinate> {
        self.start
    }

    /// Resolved end coordinate, if any
    #[must_use]
    pub const fn end(&self) -> Option<Coordinate> {
        self.end
    }

    /// The computed route, present only in the succeeded phase
    #[must_use]
    pub const fn route(&self) -> Option<&RouteFeatureCollection> {
        match &self.phase {
            PipelinePhase::Succeeded { route, .. } => Some(route),
            _ => None,
        }
    }

    /// The connector segments, present only in the succeeded phase
    #[must_use]
    pub const fn connectors(&self) -> Option<&ConnectorFeatureCollection> {
        match &self.phase {
            PipelinePhase::Succeeded { connectors, .. } => Some(connectors),
            _ => None,
        }
    }

    /// The failure reason, present only in the failed phase
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.phase {
            PipelinePhase::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Whether a run is currently awaiting a network response
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(
            self.phase,
            PipelinePhase::ResolvingStart
                | PipelinePhase::ResolvingEnd
                | PipelinePhase::Requesting
        )
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::idle()
    }
}

/// An event produced by the effect layer
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A new search was accepted under the given generation
    Submitted {
        /// Generation of the new run
        generation: u64,
    },
    /// The start address resolved
    StartResolved(Coordinate),
    /// The end address resolved
    EndResolved(Coordinate),
    /// The routing backend returned a route
    RouteReceived(RouteFeatureCollection),
    /// The current stage failed
    StageFailed {
        /// Human-readable failure description
        reason: String,
    },
}

/// Pure transition function of the pipeline state machine
///
/// Sequencing is strict: each event advances exactly one phase, failure is
/// reachable from every in-flight phase and preserves resolved coordinates,
/// and a submission restarts from scratch. An event that does not match the
/// current phase leaves the state unchanged.
///
/// Entering the succeeded phase synthesizes the connectors; a malformed
/// route turns the same event into a failure.
#[must_use]
pub fn transition(state: &PipelineState, event: PipelineEvent) -> PipelineState {
    match (&state.phase, event) {
        (_, PipelineEvent::Submitted { generation }) => PipelineState {
            generation,
            phase: PipelinePhase::ResolvingStart,
            start: None,
            end: None,
        },
        (PipelinePhase::ResolvingStart, PipelineEvent::StartResolved(coordinate)) => {
            PipelineState {
                phase: PipelinePhase::ResolvingEnd,
                start: Some(coordinate),
                ..state.clone()
            }
        },
        (PipelinePhase::ResolvingEnd, PipelineEvent::EndResolved(coordinate)) => PipelineState {
            phase: PipelinePhase::Requesting,
            end: Some(coordinate),
            ..state.clone()
        },
        (PipelinePhase::Requesting, PipelineEvent::RouteReceived(route)) => {
            let (Some(start), Some(end)) = (state.start, state.end) else {
                return state.clone();
            };
            let phase = match connectors::synthesize(start, end, &route) {
                Ok(connectors) => PipelinePhase::Succeeded { route, connectors },
                Err(error) => PipelinePhase::Failed {
                    reason: error.to_string(),
                },
            };
            PipelineState {
                phase,
                ..state.clone()
            }
        },
        (
            PipelinePhase::ResolvingStart | PipelinePhase::ResolvingEnd | PipelinePhase::Requesting,
            PipelineEvent::StageFailed { reason },
        ) => PipelineState {
            phase: PipelinePhase::Failed { reason },
            ..state.clone()
        },
        (_, event) => {
            debug!(?event, "Event does not match current phase; state unchanged");
            state.clone()
        },
    }
}

/// Orchestrates one route search at a time and publishes UI-facing state
pub struct RoutePlannerService {
    geocoder: Arc<dyn GeocodingPort>,
    router: Arc<dyn RoutingPort>,
    generation: AtomicU64,
    state: Mutex<PipelineState>,
    publisher: watch::Sender<PipelineState>,
}

impl fmt::Debug for RoutePlannerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePlannerService")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl RoutePlannerService {
    /// Create a new route planner service
    #[must_use]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, router: Arc<dyn RoutingPort>) -> Self {
        let (publisher, _) = watch::channel(PipelineState::idle());
        Self {
            geocoder,
            router,
            generation: AtomicU64::new(0),
            state: Mutex::new(PipelineState::idle()),
            publisher,
        }
    }

    /// Subscribe to published state snapshots
    ///
    /// The rendering surface re-renders from each received snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.publisher.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn current_state(&self) -> PipelineState {
        self.state.lock().clone()
    }

    /// Run one search: start address, end address, route, connectors
    ///
    /// Returns the final snapshot of this run, or the newer run's state if
    /// this run was superseded mid-flight. Failures are reported through
    /// the returned state's failed phase, never as an `Err`.
    #[instrument(skip(self), fields(start = %start_query, end = %end_query))]
    pub async fn submit(&self, start_query: &Address, end_query: &Address) -> PipelineState {
        let generation = {
            let mut state = self.state.lock();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = transition(&state, PipelineEvent::Submitted { generation });
            self.publisher.send_replace(state.clone());
            generation
        };

        info!(generation, "Route search started");

        let start = match self.geocoder.resolve(start_query).await {
            Ok(coordinate) => coordinate,
            Err(error) => return self.fail(generation, &error),
        };
        if self
            .apply_if_current(generation, PipelineEvent::StartResolved(start))
            .is_none()
        {
            return self.current_state();
        }

        let end = match self.geocoder.resolve(end_query).await {
            Ok(coordinate) => coordinate,
            Err(error) => return self.fail(generation, &error),
        };
        if self
            .apply_if_current(generation, PipelineEvent::EndResolved(end))
            .is_none()
        {
            return self.current_state();
        }

        let route = match self.router.request_route(start, end).await {
            Ok(route) => route,
            Err(error) => return self.fail(generation, &error),
        };
        match self.apply_if_current(generation, PipelineEvent::RouteReceived(route)) {
            Some(state) => {
                info!(generation, "Route search finished");
                state
            },
            None => self.current_state(),
        }
    }

    /// Apply an event if the run is still current, publishing the result
    ///
    /// Returns `None` when the run has been superseded; the event is
    /// discarded and the caller stops issuing further calls.
    fn apply_if_current(&self, generation: u64, event: PipelineEvent) -> Option<PipelineState> {
        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding event from superseded run");
            return None;
        }
        *state = transition(&state, event);
        let snapshot = state.clone();
        drop(state);
        self.publisher.send_replace(snapshot.clone());
        Some(snapshot)
    }

    /// Record a stage failure and return the resulting state
    fn fail(&self, generation: u64, error: &ApplicationError) -> PipelineState {
        warn!(generation, %error, "Route search stage failed");
        self.apply_if_current(
            generation,
            PipelineEvent::StageFailed {
                reason: error.to_string(),
            },
        )
        .unwrap_or_else(|| self.current_state())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use domain::{LineFeature, LineString, RouteSummary};
    use tokio::sync::Notify;

    use super::*;
    use crate::ports::{MockGeocodingPort, MockRoutingPort};

    fn coord(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new_unchecked(lon, lat)
    }

    fn address(text: &str) -> Address {
        Address::new(text).expect("test address")
    }

    fn sample_route() -> RouteFeatureCollection {
        RouteFeatureCollection::new(vec![LineFeature::new(LineString::new(vec![
            coord(-2.24, 53.48),
            coord(-2.22, 53.47),
            coord(-2.20, 53.46),
        ]))])
        .with_metadata(RouteSummary {
            distance_m: 5000.0,
            duration_min: 60.0,
        })
    }

    // --- Pure transition tests ---

    #[test]
    fn test_happy_path_transitions() {
        let state = PipelineState::idle();

        let state = transition(&state, PipelineEvent::Submitted { generation: 1 });
        assert_eq!(state.phase(), &PipelinePhase::ResolvingStart);
        assert_eq!(state.generation(), 1);

        let state = transition(&state, PipelineEvent::StartResolved(coord(-2.2453, 53.4794)));
        assert_eq!(state.phase(), &PipelinePhase::ResolvingEnd);
        assert_eq!(state.start(), Some(coord(-2.2453, 53.4794)));

        let state = transition(&state, PipelineEvent::EndResolved(coord(-2.2309, 53.4774)));
        assert_eq!(state.phase(), &PipelinePhase::Requesting);
        assert_eq!(state.end(), Some(coord(-2.2309, 53.4774)));

        let state = transition(&state, PipelineEvent::RouteReceived(sample_route()));
        assert!(state.route().is_some());
        let connectors = state.connectors().expect("connectors synthesized");
        assert_eq!(connectors.features().len(), 2);
        assert_eq!(
            connectors.features()[0].geometry.coordinates,
            vec![coord(-2.2453, 53.4794), coord(-2.24, 53.48)]
        );
        assert_eq!(
            connectors.features()[1].geometry.coordinates,
            vec![coord(-2.20, 53.46), coord(-2.2309, 53.4774)]
        );
    }

    #[test]
    fn test_failure_preserves_resolved_coordinates() {
        let state = transition(
            &PipelineState::idle(),
            PipelineEvent::Submitted { generation: 1 },
        );
        let state = transition(&state, PipelineEvent::StartResolved(coord(-2.2453, 53.4794)));
        let state = transition(
            &state,
            PipelineEvent::StageFailed {
                reason: "Could not find location: \"nowhere\"".to_string(),
            },
        );

        assert_eq!(state.start(), Some(coord(-2.2453, 53.4794)));
        assert!(state.end().is_none());
        assert!(state.route().is_none());
        assert_eq!(
            state.failure_reason(),
            Some("Could not find location: \"nowhere\"")
        );
    }

    #[test]
    fn test_malformed_route_fails_the_run() {
        let state = transition(
            &PipelineState::idle(),
            PipelineEvent::Submitted { generation: 1 },
        );
        let state = transition(&state, PipelineEvent::StartResolved(coord(-2.25, 53.49)));
        let state = transition(&state, PipelineEvent::EndResolved(coord(-2.19, 53.45)));
        let state = transition(
            &state,
            PipelineEvent::RouteReceived(RouteFeatureCollection::new(vec![])),
        );

        assert!(state.route().is_none());
        assert_eq!(state.failure_reason(), Some("Route has no features"));
    }

    #[test]
    fn test_mismatched_events_leave_state_unchanged() {
        let idle = PipelineState::idle();
        let unchanged = transition(&idle, PipelineEvent::StartResolved(coord(-2.25, 53.49)));
        assert_eq!(unchanged, idle);

        let resolving = transition(&idle, PipelineEvent::Submitted { generation: 1 });
        let unchanged = transition(&resolving, PipelineEvent::RouteReceived(sample_route()));
        assert_eq!(unchanged, resolving);
    }

    #[test]
    fn test_resubmission_discards_previous_run() {
        let state = transition(
            &PipelineState::idle(),
            PipelineEvent::Submitted { generation: 1 },
        );
        let state = transition(&state, PipelineEvent::StartResolved(coord(-2.25, 53.49)));
        let state = transition(&state, PipelineEvent::Submitted { generation: 2 });

        assert_eq!(state.generation(), 2);
        assert_eq!(state.phase(), &PipelinePhase::ResolvingStart);
        assert!(state.start().is_none());
    }

    #[test]
    fn test_state_serializes_with_phase_tag() {
        let state = transition(
            &PipelineState::idle(),
            PipelineEvent::Submitted { generation: 1 },
        );
        let json = serde_json::to_value(&state).expect("serialize");
        assert_eq!(json["phase"], "resolving_start");
        assert_eq!(json["generation"], 1);
    }

    // --- Service tests (mocked ports) ---

    fn planner(
        geocoder: MockGeocodingPort,
        router: MockRoutingPort,
    ) -> RoutePlannerService {
        RoutePlannerService::new(Arc::new(geocoder), Arc::new(router))
    }

    #[tokio::test]
    async fn test_successful_search_publishes_route_and_stats() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_resolve()
            .withf(|query| query.as_str() == "Manchester Town Hall")
            .times(1)
            .returning(|_| Ok(coord(-2.2453, 53.4794)));
        geocoder
            .expect_resolve()
            .withf(|query| query.as_str() == "Piccadilly Station")
            .times(1)
            .returning(|_| Ok(coord(-2.2309, 53.4774)));

        let mut router = MockRoutingPort::new();
        router
            .expect_request_route()
            .times(1)
            .returning(|_, _| Ok(sample_route()));

        let service = planner(geocoder, router);
        let state = service
            .submit(&address("Manchester Town Hall"), &address("Piccadilly Station"))
            .await;

        assert_eq!(state.start(), Some(coord(-2.2453, 53.4794)));
        assert_eq!(state.end(), Some(coord(-2.2309, 53.4774)));

        let route = state.route().expect("route published");
        let summary = route.metadata.expect("metadata present");
        assert_eq!(summary.format_distance(), "5.00 km");
        assert_eq!(summary.format_duration(), "60 mins");
        assert!(state.connectors().is_some());
    }

    #[tokio::test]
    async fn test_start_failure_aborts_before_end_geocode() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_resolve()
            .withf(|query| query.as_str() == "nowhere")
            .times(1)
            .returning(|query| {
                Err(ApplicationError::GeocodeNotFound {
                    query: query.to_string(),
                })
            });

        let mut router = MockRoutingPort::new();
        router.expect_request_route().times(0);

        let service = planner(geocoder, router);
        let state = service
            .submit(&address("nowhere"), &address("Piccadilly Station"))
            .await;

        // The end address is never queried: the single expectation above
        // would reject a second resolve call.
        assert_eq!(
            state.failure_reason(),
            Some(r#"Could not find location: "nowhere""#)
        );
        assert!(state.start().is_none());
        assert!(state.route().is_none());
    }

    #[tokio::test]
    async fn test_end_failure_keeps_start_marker_and_skips_route() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_resolve()
            .withf(|query| query.as_str() == "Manchester Town Hall")
            .times(1)
            .returning(|_| Ok(coord(-2.2453, 53.4794)));
        geocoder
            .expect_resolve()
            .withf(|query| query.as_str() == "nowhere")
            .times(1)
            .returning(|query| {
                Err(ApplicationError::GeocodeNotFound {
                    query: query.to_string(),
                })
            });

        let mut router = MockRoutingPort::new();
        router.expect_request_route().times(0);

        let service = planner(geocoder, router);
        let state = service
            .submit(&address("Manchester Town Hall"), &address("nowhere"))
            .await;

        assert_eq!(state.start(), Some(coord(-2.2453, 53.4794)));
        assert!(state.end().is_none());
        assert!(state.route().is_none());
        assert_eq!(
            state.failure_reason(),
            Some(r#"Could not find location: "nowhere""#)
        );
    }

    #[tokio::test]
    async fn test_backend_rejection_surfaces_detail() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_resolve()
            .times(2)
            .returning(|_| Ok(coord(-2.24, 53.48)));

        let mut router = MockRoutingPort::new();
        router
            .expect_request_route()
            .times(1)
            .returning(|_, _| Err(ApplicationError::RouteRequestFailed("no route found".into())));

        let service = planner(geocoder, router);
        let state = service
            .submit(&address("Manchester Town Hall"), &address("Piccadilly Station"))
            .await;

        assert_eq!(state.failure_reason(), Some("no route found"));
        assert!(state.route().is_none());
        assert_eq!(state.start(), Some(coord(-2.24, 53.48)));
        assert_eq!(state.end(), Some(coord(-2.24, 53.48)));
    }

    #[tokio::test]
    async fn test_subscribers_observe_each_phase() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_resolve()
            .times(2)
            .returning(|_| Ok(coord(-2.24, 53.48)));

        let mut router = MockRoutingPort::new();
        router
            .expect_request_route()
            .times(1)
            .returning(|_, _| Ok(sample_route()));

        let service = planner(geocoder, router);
        let mut receiver = service.subscribe();
        assert_eq!(receiver.borrow().phase(), &PipelinePhase::Idle);

        service
            .submit(&address("Manchester Town Hall"), &address("Piccadilly Station"))
            .await;

        // The watch channel keeps the latest snapshot
        assert!(receiver.has_changed().expect("sender alive"));
        let state = receiver.borrow_and_update().clone();
        assert!(matches!(state.phase(), PipelinePhase::Succeeded { .. }));
    }

    // --- Generation guard ---

    /// Geocoder double whose first call blocks until released
    struct GatedGeocoder {
        coordinate: Coordinate,
        gate: Arc<Notify>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeocodingPort for GatedGeocoder {
        async fn resolve(&self, _query: &Address) -> Result<Coordinate, ApplicationError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
            }
            Ok(self.coordinate)
        }
    }

    #[tokio::test]
    async fn test_stale_run_cannot_overwrite_newer_run() {
        let gate = Arc::new(Notify::new());
        let geocoder = Arc::new(GatedGeocoder {
            coordinate: coord(-2.24, 53.48),
            gate: Arc::clone(&gate),
            calls: AtomicUsize::new(0),
        });

        let mut router = MockRoutingPort::new();
        router
            .expect_request_route()
            .times(1)
            .returning(|_, _| Ok(sample_route()));

        let service = Arc::new(RoutePlannerService::new(geocoder.clone(), Arc::new(router)));

        // First run blocks inside its start geocode
        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .submit(&address("blocked start"), &address("blocked end"))
                    .await
            })
        };
        while geocoder.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Second run supersedes it and completes
        let second = service
            .submit(&address("Manchester Town Hall"), &address("Piccadilly Station"))
            .await;
        assert_eq!(second.generation(), 2);
        assert!(matches!(second.phase(), PipelinePhase::Succeeded { .. }));

        // Release the first run: its late response must be discarded
        gate.notify_one();
        let first = first.await.expect("task completes");
        assert_eq!(first.generation(), 2);

        let current = service.current_state();
        assert_eq!(current.generation(), 2);
        assert!(matches!(current.phase(), PipelinePhase::Succeeded { .. }));
    }
}
