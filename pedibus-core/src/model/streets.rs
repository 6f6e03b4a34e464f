//! Street network model loaded from OSM data.

use geo::Point;
use hashbrown::HashMap;

/// OSM node identifier.
pub type NodeId = u64;
/// OSM way identifier.
pub type WayId = u64;

/// A geolocated point on the street map.
#[derive(Debug, Clone)]
pub struct Node {
    /// OSM ID of the node
    pub id: NodeId,
    /// Node coordinates (x = longitude, y = latitude)
    pub location: Point<f64>,
    tags: HashMap<String, String>,
}

impl Node {
    pub fn new(id: NodeId, location: Point<f64>, tags: HashMap<String, String>) -> Self {
        Self { id, location, tags }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }
}

/// An ordered polyline through nodes representing a street segment.
#[derive(Debug, Clone)]
pub struct Way {
    /// OSM ID of the way
    pub id: WayId,
    node_ids: Vec<NodeId>,
    tags: HashMap<String, String>,
}

impl Way {
    pub fn new(id: WayId, node_ids: Vec<NodeId>, tags: HashMap<String, String>) -> Self {
        Self { id, node_ids, tags }
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn node_id(&self, index: usize) -> Option<NodeId> {
        self.node_ids.get(index).copied()
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Whether traffic may only flow in node order along this way.
    pub fn is_oneway(&self) -> bool {
        matches!(self.tag("oneway"), Some("yes" | "true" | "1"))
    }

    /// Posted speed limit in miles per hour.
    ///
    /// OSM encodes the value as a decimal with an optional trailing unit
    /// token (`"25 mph"`); the unit is stripped. Returns `fallback` when
    /// the tag is missing or does not parse.
    pub fn max_speed(&self, fallback: f64) -> f64 {
        self.tag("maxspeed")
            .and_then(|raw| raw.split_whitespace().next())
            .and_then(|token| token.parse::<f64>().ok())
            .unwrap_or(fallback)
    }
}

/// Nodes and ways in load order, with O(1) lookup by id.
#[derive(Debug, Clone, Default)]
pub struct StreetMap {
    nodes: Vec<Node>,
    ways: Vec<Way>,
    node_index: HashMap<NodeId, usize>,
    way_index: HashMap<WayId, usize>,
}

impl StreetMap {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// The `index`-th node in load order.
    pub fn node_by_index(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&index| &self.nodes[index])
    }

    /// The `index`-th way in load order.
    pub fn way_by_index(&self, index: usize) -> Option<&Way> {
        self.ways.get(index)
    }

    pub fn way_by_id(&self, id: WayId) -> Option<&Way> {
        self.way_index.get(&id).map(|&index| &self.ways[index])
    }

    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.node_index.entry(node.id).or_insert(self.nodes.len());
        self.nodes.push(node);
    }

    pub(crate) fn push_way(&mut self, way: Way) {
        self.way_index.entry(way.id).or_insert(self.ways.len());
        self.ways.push(way);
    }
}
