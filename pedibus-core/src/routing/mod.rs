//! Routing: the generic path router and the multimodal planner built on
//! top of it.

mod itinerary;
pub mod planner;
pub mod router;

pub use planner::{
    FastestRoute, MultimodalPlanner, PlannerConfig, ShortestRoute, TravelMode, TripStep,
};
pub use router::{PathRouter, RoutedPath, VertexId};
