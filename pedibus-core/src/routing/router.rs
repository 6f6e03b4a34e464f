//! Generic single-source shortest-path engine.
//!
//! [`PathRouter`] is a directed weighted graph whose vertices carry an
//! opaque caller-supplied tag. Vertex ids are dense and assigned in
//! insertion order, so callers can keep side tables indexed by them.
//! Queries run Dijkstra's algorithm with per-call scratch state; the
//! router itself is immutable during a query and safe to share.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::Error;

/// Dense vertex identifier, assigned from 0 in insertion order.
pub type VertexId = usize;

/// A reconstructed shortest path with its total cost.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub cost: f64,
    pub vertices: Vec<VertexId>,
}

/// Directed weighted graph with Dijkstra shortest-path queries.
#[derive(Debug, Clone)]
pub struct PathRouter<T> {
    graph: DiGraph<T, f64>,
}

impl<T> Default for PathRouter<T> {
    fn default() -> Self {
        Self {
            graph: DiGraph::new(),
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    vertex: NodeIndex,
}

impl Eq for State {}

// Min-heap by cost (reversed from the standard max-heap ordering). Costs
// are finite and non-negative, so total_cmp is a plain numeric order.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PathRouter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Append a vertex carrying `tag`; ids run 0, 1, 2, ...
    pub fn add_vertex(&mut self, tag: T) -> VertexId {
        self.graph.add_node(tag).index()
    }

    /// The tag stored on `vertex`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidVertex`] when the id was never assigned.
    pub fn vertex_tag(&self, vertex: VertexId) -> Result<&T, Error> {
        if vertex >= self.vertex_count() {
            return Err(Error::InvalidVertex(vertex));
        }
        Ok(&self.graph[NodeIndex::new(vertex)])
    }

    /// Insert an edge, optionally in both directions.
    ///
    /// Returns `false`, without mutating the graph, when the weight is
    /// not strictly positive and finite or either endpoint is unknown.
    /// Re-adding an existing (src, dst) pair overwrites its weight.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId, weight: f64, bidirectional: bool) -> bool {
        if !weight.is_finite() || weight <= 0.0 {
            return false;
        }
        let count = self.vertex_count();
        if src >= count || dst >= count {
            return false;
        }
        let (a, b) = (NodeIndex::new(src), NodeIndex::new(dst));
        self.graph.update_edge(a, b, weight);
        if bidirectional {
            self.graph.update_edge(b, a, weight);
        }
        true
    }

    /// Current weight of the (src, dst) edge, if present.
    pub fn edge_weight(&self, src: VertexId, dst: VertexId) -> Option<f64> {
        let count = self.vertex_count();
        if src >= count || dst >= count {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(src), NodeIndex::new(dst))
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    /// Hook for acceleration structures built ahead of queries.
    ///
    /// Queries run plain Dijkstra, so there is nothing to build; the
    /// deadline is trivially honoured.
    pub fn precompute(&mut self, _deadline: Instant) -> bool {
        true
    }

    /// Shortest path from `src` to `dst` by total edge weight.
    ///
    /// Returns `None` when either id is unknown or `dst` is unreachable.
    /// `src == dst` yields a zero-cost single-vertex path. Ties between
    /// equal-cost paths resolve deterministically for a fixed insertion
    /// history. Runs in O((V + E) log V).
    pub fn shortest_path(&self, src: VertexId, dst: VertexId) -> Option<RoutedPath> {
        let count = self.vertex_count();
        if src >= count || dst >= count {
            return None;
        }
        if src == dst {
            return Some(RoutedPath {
                cost: 0.0,
                vertices: vec![src],
            });
        }

        let mut dist = vec![f64::INFINITY; count];
        let mut prev = vec![usize::MAX; count];
        let mut heap = BinaryHeap::new();

        let target = NodeIndex::new(dst);
        dist[src] = 0.0;
        heap.push(State {
            cost: 0.0,
            vertex: NodeIndex::new(src),
        });

        while let Some(State { cost, vertex }) = heap.pop() {
            if vertex == target {
                break;
            }
            // Skip entries made stale by a later relaxation
            if cost > dist[vertex.index()] {
                continue;
            }
            for edge in self.graph.edges(vertex) {
                let next = edge.target();
                let alt = cost + edge.weight();
                if alt < dist[next.index()] {
                    dist[next.index()] = alt;
                    prev[next.index()] = vertex.index();
                    heap.push(State {
                        cost: alt,
                        vertex: next,
                    });
                }
            }
        }

        if !dist[dst].is_finite() {
            return None;
        }

        let mut vertices = vec![dst];
        let mut current = dst;
        while current != src {
            let parent = prev[current];
            if parent == usize::MAX {
                return None;
            }
            vertices.push(parent);
            current = parent;
        }
        vertices.reverse();

        Some(RoutedPath {
            cost: dist[dst],
            vertices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> PathRouter<&'static str> {
        let mut router = PathRouter::new();
        for tag in ["A", "B", "C", "D"] {
            router.add_vertex(tag);
        }
        assert!(router.add_edge(0, 1, 10.0, false));
        assert!(router.add_edge(0, 2, 5.0, false));
        assert!(router.add_edge(1, 3, 10.0, false));
        assert!(router.add_edge(2, 3, 15.0, false));
        router
    }

    #[test]
    fn vertex_ids_are_dense_and_tagged() {
        let router = diamond();
        assert_eq!(router.vertex_count(), 4);
        assert_eq!(*router.vertex_tag(0).unwrap(), "A");
        assert_eq!(*router.vertex_tag(3).unwrap(), "D");
        assert!(matches!(router.vertex_tag(4), Err(Error::InvalidVertex(4))));
    }

    #[test]
    fn shortest_path_takes_the_cheaper_branch() {
        let router = diamond();
        let path = router.shortest_path(0, 3).unwrap();
        assert_eq!(path.cost, 20.0);
        assert_eq!(path.vertices, vec![0, 1, 3]);
    }

    #[test]
    fn cost_equals_the_sum_of_edge_weights_on_the_path() {
        let router = diamond();
        let path = router.shortest_path(0, 3).unwrap();
        let total: f64 = path
            .vertices
            .windows(2)
            .map(|pair| router.edge_weight(pair[0], pair[1]).unwrap())
            .sum();
        assert_eq!(path.cost, total);
    }

    #[test]
    fn unreachable_vertices_yield_no_path() {
        let mut router = PathRouter::new();
        router.add_vertex(0u64);
        router.add_vertex(1u64);
        assert!(router.shortest_path(0, 1).is_none());
        assert!(router.shortest_path(0, 7).is_none());
    }

    #[test]
    fn bidirectional_edges_route_both_ways() {
        let mut router = PathRouter::new();
        router.add_vertex(());
        router.add_vertex(());
        assert!(router.add_edge(0, 1, 10.0, true));
        assert_eq!(router.shortest_path(0, 1).map(|p| p.cost), Some(10.0));
        assert_eq!(router.shortest_path(1, 0).map(|p| p.cost), Some(10.0));
    }

    #[test]
    fn self_path_is_zero_cost() {
        let mut router = PathRouter::new();
        let v = router.add_vertex(());
        let path = router.shortest_path(v, v).unwrap();
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.vertices, vec![v]);
    }

    #[test]
    fn non_positive_weights_are_rejected_without_mutation() {
        let mut router = PathRouter::new();
        router.add_vertex(());
        router.add_vertex(());
        assert!(!router.add_edge(0, 1, 0.0, false));
        assert!(!router.add_edge(0, 1, -1.0, false));
        assert!(!router.add_edge(0, 1, f64::NAN, false));
        assert!(router.edge_weight(0, 1).is_none());
        assert!(router.shortest_path(0, 1).is_none());
    }

    #[test]
    fn unknown_endpoints_are_rejected() {
        let mut router = PathRouter::new();
        router.add_vertex(());
        assert!(!router.add_edge(0, 5, 1.0, false));
        assert!(!router.add_edge(5, 0, 1.0, false));
    }

    #[test]
    fn duplicate_edges_overwrite_the_weight() {
        let mut router = PathRouter::new();
        router.add_vertex(());
        router.add_vertex(());
        assert!(router.add_edge(0, 1, 10.0, false));
        assert!(router.add_edge(0, 1, 4.0, false));
        assert_eq!(router.edge_weight(0, 1), Some(4.0));
        assert_eq!(router.shortest_path(0, 1).map(|p| p.cost), Some(4.0));
    }

    #[test]
    fn repeated_queries_return_the_same_path() {
        let mut router = PathRouter::new();
        for _ in 0..4 {
            router.add_vertex(());
        }
        // two equal-cost routes 0 -> 1 -> 3 and 0 -> 2 -> 3
        router.add_edge(0, 1, 1.0, false);
        router.add_edge(0, 2, 1.0, false);
        router.add_edge(1, 3, 1.0, false);
        router.add_edge(2, 3, 1.0, false);
        let first = router.shortest_path(0, 3).unwrap();
        for _ in 0..8 {
            assert_eq!(router.shortest_path(0, 3).unwrap(), first);
        }
    }

    #[test]
    fn precompute_honours_its_deadline_trivially() {
        let mut router: PathRouter<()> = PathRouter::new();
        assert!(router.precompute(Instant::now()));
    }
}
