//! Bus network model: boardable stops and the named routes serving them.

use hashbrown::HashMap;

use super::streets::NodeId;

/// Bus stop identifier.
pub type StopId = u64;

/// A boardable stop co-located with a street map node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    pub id: StopId,
    pub node_id: NodeId,
}

/// A named ordered sequence of stops served by a bus line.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    stop_ids: Vec<StopId>,
}

impl Route {
    pub fn new(name: String, stop_ids: Vec<StopId>) -> Self {
        Self { name, stop_ids }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop_count(&self) -> usize {
        self.stop_ids.len()
    }

    pub fn stop_id(&self, index: usize) -> Option<StopId> {
        self.stop_ids.get(index).copied()
    }

    pub fn stop_ids(&self) -> &[StopId] {
        &self.stop_ids
    }
}

/// Stops and routes in load order, with O(1) lookup by id and name.
#[derive(Debug, Clone, Default)]
pub struct BusNetwork {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    stop_index: HashMap<StopId, usize>,
    route_index: HashMap<String, usize>,
}

impl BusNetwork {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// The `index`-th stop in load order.
    pub fn stop_by_index(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    pub fn stop_by_id(&self, id: StopId) -> Option<&Stop> {
        self.stop_index.get(&id).map(|&index| &self.stops[index])
    }

    /// The `index`-th route in first-appearance order.
    pub fn route_by_index(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.route_index.get(name).map(|&index| &self.routes[index])
    }

    pub(crate) fn push_stop(&mut self, stop: Stop) {
        self.stop_index.entry(stop.id).or_insert(self.stops.len());
        self.stops.push(stop);
    }

    pub(crate) fn push_route(&mut self, route: Route) {
        self.route_index
            .entry(route.name().to_string())
            .or_insert(self.routes.len());
        self.routes.push(route);
    }
}
