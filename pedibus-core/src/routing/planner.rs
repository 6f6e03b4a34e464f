//! Multimodal trip planning over the street map and bus network.
//!
//! The planner builds two router graphs up front: one weighted by
//! great-circle miles for shortest-distance queries, one weighted by
//! hours for fastest-trip queries. A time edge carries the minimum over
//! the modes a traveller can actually use on that segment, so Dijkstra
//! picks the fastest mode per segment and the itinerary step for an edge
//! is recovered by matching its weight back to a mode.

use std::collections::BTreeSet;
use std::sync::Arc;

use hashbrown::HashMap;
use log::info;

use crate::geo::haversine_miles;
use crate::model::{BusNetwork, BusNetworkIndex, Node, NodeId, StreetMap, Way};
use crate::routing::itinerary;
use crate::routing::router::{PathRouter, VertexId};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// How a trip segment is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    Walk,
    Bike,
    Bus,
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TravelMode::Walk => "Walk",
            TravelMode::Bike => "Bike",
            TravelMode::Bus => "Bus",
        })
    }
}

/// One leg boundary of a fastest trip: the node reached while travelling
/// in `mode`. The first step anchors the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripStep {
    pub mode: TravelMode,
    pub node: NodeId,
}

/// Result of a shortest-distance query, in miles.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestRoute {
    pub miles: f64,
    pub nodes: Vec<NodeId>,
}

/// Result of a fastest-trip query, in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct FastestRoute {
    pub hours: f64,
    pub steps: Vec<TripStep>,
}

/// Everything the planner needs: the loaded data plus travel parameters.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub street_map: Arc<StreetMap>,
    pub bus_network: Arc<BusNetwork>,
    /// Walking speed in miles per hour
    pub walk_speed_mph: f64,
    /// Biking speed in miles per hour
    pub bike_speed_mph: f64,
    /// Road speed assumed when a way posts no limit, miles per hour
    pub default_speed_mph: f64,
    /// Seconds a bus spends at each stop it departs from
    pub bus_stop_time_sec: f64,
}

impl PlannerConfig {
    pub fn new(street_map: Arc<StreetMap>, bus_network: Arc<BusNetwork>) -> Self {
        Self {
            street_map,
            bus_network,
            walk_speed_mph: 3.0,
            bike_speed_mph: 8.0,
            default_speed_mph: 25.0,
            bus_stop_time_sec: 30.0,
        }
    }
}

/// Multimodal planner answering shortest-distance and fastest-trip
/// queries between street map nodes.
///
/// Construction is one-shot; afterwards the planner is immutable and
/// queries may run concurrently from shared references.
#[derive(Debug, Clone)]
pub struct MultimodalPlanner {
    config: PlannerConfig,
    bus_index: BusNetworkIndex,
    /// Node ids in ascending order; position doubles as the vertex id in
    /// both routers.
    sorted_nodes: Vec<NodeId>,
    node_to_vertex: HashMap<NodeId, VertexId>,
    /// Per node, the (route name, next node) pairs served by a bus,
    /// ordered for deterministic edge insertion.
    bus_adjacency: HashMap<NodeId, BTreeSet<(String, NodeId)>>,
    distance_router: PathRouter<NodeId>,
    time_router: PathRouter<NodeId>,
}

impl MultimodalPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        let streets = Arc::clone(&config.street_map);
        let bus_index = BusNetworkIndex::new(Arc::clone(&config.bus_network));

        let mut sorted_nodes: Vec<NodeId> = (0..streets.node_count())
            .filter_map(|index| streets.node_by_index(index))
            .map(|node| node.id)
            .collect();
        sorted_nodes.sort_unstable();
        sorted_nodes.dedup();

        let mut distance_router = PathRouter::new();
        let mut time_router = PathRouter::new();
        let mut node_to_vertex = HashMap::with_capacity(sorted_nodes.len());
        for &node_id in &sorted_nodes {
            let vertex = distance_router.add_vertex(node_id);
            time_router.add_vertex(node_id);
            node_to_vertex.insert(node_id, vertex);
        }

        let bus_adjacency = build_bus_adjacency(&config.bus_network);

        let mut planner = Self {
            config,
            bus_index,
            sorted_nodes,
            node_to_vertex,
            bus_adjacency,
            distance_router,
            time_router,
        };
        planner.add_street_edges();
        planner.add_bus_edges();
        info!(
            "planner ready: {} nodes, {} bus departure nodes",
            planner.sorted_nodes.len(),
            planner.bus_adjacency.len()
        );
        planner
    }

    /// Street segments become edges in both routers. Ways through more
    /// than two nodes go first; dedicated two-node ways follow and
    /// overwrite, so a direct way definition is canonical for its pair.
    fn add_street_edges(&mut self) {
        let streets = Arc::clone(&self.config.street_map);
        for way in streets.ways().iter().filter(|way| way.node_count() > 2) {
            self.add_way_segments(way);
        }
        for way in streets.ways().iter().filter(|way| way.node_count() == 2) {
            self.add_way_segments(way);
        }
    }

    fn add_way_segments(&mut self, way: &Way) {
        let oneway = way.is_oneway();
        for pair in way.node_ids().windows(2) {
            self.add_street_segment(pair[0], pair[1], oneway);
        }
    }

    fn add_street_segment(&mut self, src: NodeId, dst: NodeId, oneway: bool) {
        let streets = &self.config.street_map;
        let (Some(a), Some(b)) = (streets.node_by_id(src), streets.node_by_id(dst)) else {
            return;
        };
        let distance = haversine_miles(a.location, b.location);
        if distance <= 0.0 {
            return;
        }
        let (Some(&u), Some(&v)) = (self.node_to_vertex.get(&src), self.node_to_vertex.get(&dst))
        else {
            return;
        };

        self.distance_router.add_edge(u, v, distance, !oneway);

        let walk = distance / self.config.walk_speed_mph;
        let bike = distance / self.config.bike_speed_mph;
        // Walking is always permitted against a oneway; biking is not.
        self.time_router.add_edge(u, v, walk.min(bike), false);
        let reverse = if oneway { walk } else { walk.min(bike) };
        self.time_router.add_edge(v, u, reverse, false);
    }

    /// Bus edges only make the time graph, and only where the bus beats
    /// whatever street travel already connects the pair.
    fn add_bus_edges(&mut self) {
        for index in 0..self.sorted_nodes.len() {
            let node_id = self.sorted_nodes[index];
            let Some(links) = self.bus_adjacency.get(&node_id) else {
                continue;
            };
            for (_, next) in links.iter() {
                let Some(bus_hours) = self.bus_hours(node_id, *next) else {
                    continue;
                };
                let (Some(&u), Some(&v)) = (
                    self.node_to_vertex.get(&node_id),
                    self.node_to_vertex.get(next),
                ) else {
                    continue;
                };
                let street = self.time_router.edge_weight(u, v);
                if street.is_none_or(|hours| bus_hours < hours) {
                    self.time_router.add_edge(u, v, bus_hours, false);
                }
            }
        }
    }

    /// In-motion time at the default road speed plus the dwell charged at
    /// the departure stop.
    fn bus_hours(&self, src: NodeId, dst: NodeId) -> Option<f64> {
        let streets = &self.config.street_map;
        let a = streets.node_by_id(src)?;
        let b = streets.node_by_id(dst)?;
        let distance = haversine_miles(a.location, b.location);
        Some(distance / self.config.default_speed_mph + self.config.bus_stop_time_sec / SECONDS_PER_HOUR)
    }

    pub fn street_map(&self) -> &StreetMap {
        &self.config.street_map
    }

    pub fn bus_index(&self) -> &BusNetworkIndex {
        &self.bus_index
    }

    /// Number of nodes known to the planner.
    pub fn node_count(&self) -> usize {
        self.sorted_nodes.len()
    }

    /// The `index`-th node in ascending node-id order.
    pub fn sorted_node_by_index(&self, index: usize) -> Option<&Node> {
        self.sorted_nodes
            .get(index)
            .and_then(|&id| self.config.street_map.node_by_id(id))
    }

    /// Shortest walking route by great-circle distance, in miles.
    ///
    /// Returns `None` when either node is unknown or unreachable.
    pub fn shortest_path(&self, src: NodeId, dst: NodeId) -> Option<ShortestRoute> {
        let &u = self.node_to_vertex.get(&src)?;
        let &v = self.node_to_vertex.get(&dst)?;
        let path = self.distance_router.shortest_path(u, v)?;
        let nodes = path
            .vertices
            .iter()
            .map(|&vertex| self.sorted_nodes[vertex])
            .collect();
        Some(ShortestRoute {
            miles: path.cost,
            nodes,
        })
    }

    /// Fastest trip across walking, biking and scheduled buses, in hours.
    ///
    /// Returns `None` when either node is unknown or unreachable. A trip
    /// from a node to itself is a zero-hour walk.
    pub fn fastest_path(&self, src: NodeId, dst: NodeId) -> Option<FastestRoute> {
        let &u = self.node_to_vertex.get(&src)?;
        let &v = self.node_to_vertex.get(&dst)?;
        if src == dst {
            return Some(FastestRoute {
                hours: 0.0,
                steps: vec![TripStep {
                    mode: TravelMode::Walk,
                    node: src,
                }],
            });
        }
        let path = self.time_router.shortest_path(u, v)?;
        let nodes: Vec<NodeId> = path
            .vertices
            .iter()
            .map(|&vertex| self.sorted_nodes[vertex])
            .collect();
        Some(FastestRoute {
            hours: path.cost,
            steps: self.trip_steps(&nodes),
        })
    }

    /// Turn-by-turn description of a fastest trip.
    ///
    /// Returns `None` when the steps are empty or reference unknown
    /// nodes. Produces one line per movement step plus the start and end
    /// anchors.
    pub fn path_description(&self, steps: &[TripStep]) -> Option<Vec<String>> {
        itinerary::describe_path(self, steps)
    }

    /// Collapse the node path into mode-annotated steps. The opening step
    /// anchors the origin and keeps the first edge's mode; consecutive
    /// movement steps sharing a mode collapse onto their last node.
    fn trip_steps(&self, nodes: &[NodeId]) -> Vec<TripStep> {
        let mut steps: Vec<TripStep> = Vec::with_capacity(nodes.len());
        for pair in nodes.windows(2) {
            let mode = self.edge_mode(pair[0], pair[1]);
            if steps.is_empty() {
                steps.push(TripStep {
                    mode,
                    node: pair[0],
                });
                steps.push(TripStep {
                    mode,
                    node: pair[1],
                });
                continue;
            }
            if steps.last().is_some_and(|last| last.mode == mode) {
                if let Some(last) = steps.last_mut() {
                    last.node = pair[1];
                }
            } else {
                steps.push(TripStep {
                    mode,
                    node: pair[1],
                });
            }
        }
        steps
    }

    /// The mode whose per-segment time equals the relaxed edge weight,
    /// preferring Bus over Bike over Walk on ties. Bus is only a
    /// candidate on a recorded bus adjacency.
    fn edge_mode(&self, from: NodeId, to: NodeId) -> TravelMode {
        let streets = &self.config.street_map;
        let (Some(a), Some(b)) = (streets.node_by_id(from), streets.node_by_id(to)) else {
            return TravelMode::Walk;
        };
        let weight = self
            .node_to_vertex
            .get(&from)
            .zip(self.node_to_vertex.get(&to))
            .and_then(|(&u, &v)| self.time_router.edge_weight(u, v));
        let Some(weight) = weight else {
            return TravelMode::Walk;
        };

        let distance = haversine_miles(a.location, b.location);
        if self.bus_link_exists(from, to) {
            let bus = distance / self.config.default_speed_mph
                + self.config.bus_stop_time_sec / SECONDS_PER_HOUR;
            if approx_eq(bus, weight) {
                return TravelMode::Bus;
            }
        }
        if approx_eq(distance / self.config.bike_speed_mph, weight) {
            return TravelMode::Bike;
        }
        TravelMode::Walk
    }

    /// Whether some route runs a bus directly from `from` to `to`.
    pub fn bus_link_exists(&self, from: NodeId, to: NodeId) -> bool {
        self.bus_adjacency
            .get(&from)
            .is_some_and(|links| links.iter().any(|(_, next)| *next == to))
    }
}

/// Consecutive stop pairs of every route, keyed by the departure node.
/// The set is keyed by (route name, destination node) so duplicate rows
/// collapse.
fn build_bus_adjacency(network: &BusNetwork) -> HashMap<NodeId, BTreeSet<(String, NodeId)>> {
    let mut adjacency: HashMap<NodeId, BTreeSet<(String, NodeId)>> = HashMap::new();
    for index in 0..network.route_count() {
        let Some(route) = network.route_by_index(index) else {
            continue;
        };
        for pair in route.stop_ids().windows(2) {
            let (Some(a), Some(b)) = (network.stop_by_id(pair[0]), network.stop_by_id(pair[1]))
            else {
                continue;
            };
            adjacency
                .entry(a.node_id)
                .or_default()
                .insert((route.name().to_string(), b.node_id));
        }
    }
    adjacency
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
