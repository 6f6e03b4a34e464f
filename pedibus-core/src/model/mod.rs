//! Data model for the street map and the bus network.

pub mod bus;
pub mod bus_index;
pub mod streets;

pub use bus::{BusNetwork, Route, Stop, StopId};
pub use bus_index::BusNetworkIndex;
pub use streets::{Node, NodeId, StreetMap, Way, WayId};
