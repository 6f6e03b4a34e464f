//! Natural-language itineraries for fastest trips.
//!
//! Walking and biking legs read as a compass direction along a named
//! street; bus legs name the route and the boarding and alighting stops.

use crate::geo::{compass_direction, format_location, haversine_miles, initial_bearing};
use crate::model::{Node, NodeId, StreetMap};
use crate::routing::planner::{MultimodalPlanner, TravelMode, TripStep};

/// Render trip steps as one line per movement, bracketed by start and end
/// anchors. `None` when the steps are empty or name an unknown node.
pub(crate) fn describe_path(
    planner: &MultimodalPlanner,
    steps: &[TripStep],
) -> Option<Vec<String>> {
    let streets = planner.street_map();
    let first = streets.node_by_id(steps.first()?.node)?;

    let mut lines = Vec::with_capacity(steps.len() + 1);
    lines.push(format!("Start at {}", format_location(first.location)));

    let mut prev = first;
    for step in &steps[1..] {
        let node = streets.node_by_id(step.node)?;
        let line = match step.mode {
            TravelMode::Bus => bus_line(planner, prev, node)
                .unwrap_or_else(|| movement_line("Walk", prev, node, streets)),
            TravelMode::Bike => movement_line("Bike", prev, node, streets),
            TravelMode::Walk => movement_line("Walk", prev, node, streets),
        };
        lines.push(line);
        prev = node;
    }

    lines.push(format!("End at {}", format_location(prev.location)));
    Some(lines)
}

fn movement_line(verb: &str, from: &Node, to: &Node, streets: &StreetMap) -> String {
    let direction = compass_direction(initial_bearing(from.location, to.location));
    let distance = haversine_miles(from.location, to.location);
    match street_name(streets, from.id, to.id) {
        Some(street) => format!("{verb} {direction} along {street} for {distance:.1} mi"),
        None => format!("{verb} {direction} toward End for {distance:.1} mi"),
    }
}

/// Name of a way containing the pair as consecutive nodes, in either
/// order. Coalesced legs span several segments and may match no way.
fn street_name<'a>(streets: &'a StreetMap, a: NodeId, b: NodeId) -> Option<&'a str> {
    for way in streets.ways() {
        for pair in way.node_ids().windows(2) {
            if (pair[0] == a && pair[1] == b) || (pair[0] == b && pair[1] == a) {
                return Some(way.tag("name").unwrap_or("unnamed street"));
            }
        }
    }
    None
}

/// Bus legs need stops on both endpoints sharing a route; the smallest
/// qualifying route name keeps the wording deterministic.
fn bus_line(planner: &MultimodalPlanner, from: &Node, to: &Node) -> Option<String> {
    let index = planner.bus_index();
    let board = index.stop_by_node(from.id)?;
    let alight = index.stop_by_node(to.id)?;
    let route = index
        .routes_between_nodes(from.id, to.id)
        .into_iter()
        .map(|route| route.name())
        .min()?;
    Some(format!(
        "Take Bus {route} from stop {} to stop {}",
        board.id, alight.id
    ))
}
