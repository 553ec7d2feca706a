//! Application services - Use case implementations

pub mod connectors;
pub mod render;
mod route_planner;

pub use route_planner::{
    PipelineEvent, PipelinePhase, PipelineState, RoutePlannerService, transition,
};
