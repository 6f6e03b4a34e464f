//! Loading the street map and the bus network from their external formats.

pub mod bus;
pub mod osm;

pub use bus::load_bus_network;
pub use osm::load_street_map;
