//! Multimodal street and bus trip planning.
//!
//! The crate loads an OpenStreetMap XML extract and a CSV-described bus
//! system into immutable in-memory models, then answers two questions
//! between any pair of map nodes: the shortest walking route by
//! great-circle distance, and the fastest trip when the traveller may
//! walk, bike or ride scheduled buses. Fastest trips come back as
//! mode-annotated steps that render into turn-by-turn directions.
//!
//! Everything is built once and queried many times; the loaded models
//! and the planner are safe to share across threads.

pub mod error;
pub mod geo;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{load_bus_network, load_street_map};
pub use model::{
    BusNetwork, BusNetworkIndex, Node, NodeId, Route, Stop, StopId, StreetMap, Way, WayId,
};
pub use routing::{
    FastestRoute, MultimodalPlanner, PathRouter, PlannerConfig, RoutedPath, ShortestRoute,
    TravelMode, TripStep, VertexId,
};
