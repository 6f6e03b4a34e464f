//! Convenience re-exports for downstream crates.

pub use crate::error::Error;
pub use crate::geo::{compass_direction, format_location, haversine_miles, initial_bearing};
pub use crate::loading::{load_bus_network, load_street_map};
pub use crate::model::{BusNetwork, BusNetworkIndex, StreetMap};
pub use crate::routing::{
    FastestRoute, MultimodalPlanner, PathRouter, PlannerConfig, ShortestRoute, TravelMode,
    TripStep,
};

// Core identifier types
pub use crate::model::{NodeId, StopId, WayId};
pub use crate::routing::VertexId;
