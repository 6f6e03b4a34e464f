//! Secondary indices over a loaded bus network.
//!
//! The network itself keeps load order; this wrapper adds sorted access,
//! node-to-stop resolution and route reachability predicates used by the
//! planner and the itinerary writer.

use std::sync::Arc;

use hashbrown::HashMap;

use super::bus::{BusNetwork, Route, Stop, StopId};
use super::streets::NodeId;

/// Read-only index decorating a shared [`BusNetwork`].
#[derive(Debug, Clone)]
pub struct BusNetworkIndex {
    network: Arc<BusNetwork>,
    /// Stop positions sorted by stop id
    sorted_stops: Vec<usize>,
    /// Route positions sorted by route name
    sorted_routes: Vec<usize>,
    /// When several stops share a node, the smallest stop id wins.
    node_to_stop: HashMap<NodeId, StopId>,
}

impl BusNetworkIndex {
    pub fn new(network: Arc<BusNetwork>) -> Self {
        let mut sorted_stops: Vec<usize> = (0..network.stop_count()).collect();
        sorted_stops.sort_by_key(|&index| network.stop_by_index(index).map(|stop| stop.id));

        let mut sorted_routes: Vec<usize> = (0..network.route_count()).collect();
        sorted_routes.sort_by_key(|&index| {
            network
                .route_by_index(index)
                .map(|route| route.name().to_string())
        });

        let mut node_to_stop: HashMap<NodeId, StopId> = HashMap::new();
        for index in 0..network.stop_count() {
            if let Some(stop) = network.stop_by_index(index) {
                node_to_stop
                    .entry(stop.node_id)
                    .and_modify(|existing| *existing = (*existing).min(stop.id))
                    .or_insert(stop.id);
            }
        }

        Self {
            network,
            sorted_stops,
            sorted_routes,
            node_to_stop,
        }
    }

    pub fn stop_count(&self) -> usize {
        self.network.stop_count()
    }

    pub fn route_count(&self) -> usize {
        self.network.route_count()
    }

    /// The `index`-th stop in ascending stop-id order.
    pub fn sorted_stop_by_index(&self, index: usize) -> Option<&Stop> {
        self.sorted_stops
            .get(index)
            .and_then(|&position| self.network.stop_by_index(position))
    }

    /// The `index`-th route in ascending name order.
    pub fn sorted_route_by_index(&self, index: usize) -> Option<&Route> {
        self.sorted_routes
            .get(index)
            .and_then(|&position| self.network.route_by_index(position))
    }

    /// The canonical stop on a node, if any.
    pub fn stop_by_node(&self, node_id: NodeId) -> Option<&Stop> {
        self.node_to_stop
            .get(&node_id)
            .and_then(|&stop_id| self.network.stop_by_id(stop_id))
    }

    /// Routes that visit a stop on `src` strictly before a stop on `dst`,
    /// in network order. Empty when either node carries no stop.
    pub fn routes_between_nodes(&self, src: NodeId, dst: NodeId) -> Vec<&Route> {
        if !self.node_to_stop.contains_key(&src) || !self.node_to_stop.contains_key(&dst) {
            return Vec::new();
        }
        (0..self.network.route_count())
            .filter_map(|index| self.network.route_by_index(index))
            .filter(|&route| self.route_visits_in_order(route, src, dst))
            .collect()
    }

    /// Whether any single route visits `src` before `dst`.
    pub fn route_between_nodes(&self, src: NodeId, dst: NodeId) -> bool {
        !self.routes_between_nodes(src, dst).is_empty()
    }

    fn route_visits_in_order(&self, route: &Route, src: NodeId, dst: NodeId) -> bool {
        let mut seen_src = false;
        for &stop_id in route.stop_ids() {
            let Some(stop) = self.network.stop_by_id(stop_id) else {
                continue;
            };
            // dst first, so equal nodes still require two distinct positions
            if seen_src && stop.node_id == dst {
                return true;
            }
            if stop.node_id == src {
                seen_src = true;
            }
        }
        false
    }
}
