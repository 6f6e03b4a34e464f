//! End-to-end planner tests over literal XML and CSV fixtures.

use std::sync::Arc;

use pedibus_core::geo::haversine_miles;
use pedibus_core::{
    load_bus_network, load_street_map, MultimodalPlanner, PlannerConfig, TravelMode,
};

/// A one-mile square (nodes 1, 2, 3, 4), a two-mile bus corridor
/// (nodes 5, 6), a short hop (nodes 7, 8) and a oneway pair (nodes 9, 10).
const MAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="38.0144693" lon="-121.0183614"/>
  <node id="2" lat="38.0144693" lon="-121.0"/>
  <node id="3" lat="38.0" lon="-121.0"/>
  <node id="4" lat="38.0" lon="-121.0183614"/>
  <node id="5" lat="38.03" lon="-121.05"/>
  <node id="6" lat="38.06" lon="-121.05"/>
  <node id="7" lat="38.0" lon="-121.05"/>
  <node id="8" lat="38.001" lon="-121.05"/>
  <node id="9" lat="38.1" lon="-121.1"/>
  <node id="10" lat="38.1144693" lon="-121.1"/>
  <way id="100">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="name" v="North Street"/>
  </way>
  <way id="101">
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="name" v="East Street"/>
  </way>
  <way id="102">
    <nd ref="3"/>
    <nd ref="4"/>
    <tag k="name" v="South Street"/>
  </way>
  <way id="103">
    <nd ref="4"/>
    <nd ref="1"/>
    <tag k="name" v="West Street"/>
  </way>
  <way id="104">
    <nd ref="5"/>
    <nd ref="6"/>
    <tag k="name" v="Transit Way"/>
  </way>
  <way id="105">
    <nd ref="7"/>
    <nd ref="8"/>
    <tag k="name" v="Short Street"/>
  </way>
  <way id="106">
    <nd ref="9"/>
    <nd ref="10"/>
    <tag k="name" v="One Way"/>
    <tag k="oneway" v="yes"/>
  </way>
</osm>
"#;

const STOPS: &str = "stop_id,node_id\n\
    201,5\n\
    202,6\n\
    203,7\n\
    204,8\n";

const ROUTES: &str = "route,stop_id\n\
    42,201\n\
    42,202\n\
    7A,203\n\
    7A,204\n";

fn planner() -> MultimodalPlanner {
    let street_map = load_street_map(MAP.as_bytes()).expect("fixture map parses");
    let bus_network =
        load_bus_network(STOPS.as_bytes(), ROUTES.as_bytes()).expect("fixture buses parse");
    MultimodalPlanner::new(PlannerConfig::new(Arc::new(street_map), Arc::new(bus_network)))
}

fn segment_miles(planner: &MultimodalPlanner, a: u64, b: u64) -> f64 {
    let map = planner.street_map();
    haversine_miles(
        map.node_by_id(a).unwrap().location,
        map.node_by_id(b).unwrap().location,
    )
}

#[test]
fn loaded_nodes_round_trip_their_ids_and_locations() {
    let planner = planner();
    let node = planner.street_map().node_by_id(3).unwrap();
    assert_eq!(node.id, 3);
    assert!((node.location.y() - 38.0).abs() < 1e-12);
    assert!((node.location.x() - -121.0).abs() < 1e-12);
}

#[test]
fn shortest_around_the_square_is_two_miles_over_three_nodes() {
    let planner = planner();
    let route = planner.shortest_path(1, 3).expect("square is connected");
    assert_eq!(route.nodes.len(), 3);
    assert_eq!(route.nodes.first(), Some(&1));
    assert_eq!(route.nodes.last(), Some(&3));
    assert!((route.miles - 2.0).abs() < 0.01, "got {}", route.miles);
}

#[test]
fn square_shortest_distance_is_symmetric() {
    let planner = planner();
    let forward = planner.shortest_path(1, 3).unwrap();
    let backward = planner.shortest_path(3, 1).unwrap();
    assert!((forward.miles - backward.miles).abs() < 1e-12);
}

#[test]
fn bus_wins_the_long_corridor() {
    let planner = planner();
    let route = planner.fastest_path(5, 6).expect("corridor is connected");

    let miles = segment_miles(&planner, 5, 6);
    let expected = miles / 25.0 + 30.0 / 3600.0;
    assert!((route.hours - expected).abs() < 1e-9, "got {}", route.hours);

    assert_eq!(route.steps.len(), 2);
    assert_eq!(route.steps[0].node, 5);
    assert_eq!(route.steps[1].mode, TravelMode::Bus);
    assert_eq!(route.steps[1].node, 6);
}

#[test]
fn bus_description_names_route_and_stops() {
    let planner = planner();
    let route = planner.fastest_path(5, 6).unwrap();
    let lines = planner.path_description(&route.steps).unwrap();
    assert_eq!(lines.len(), route.steps.len() + 1);
    assert!(lines[0].starts_with("Start at "));
    assert_eq!(lines[1], "Take Bus 42 from stop 201 to stop 202");
    assert!(lines[2].starts_with("End at "));
}

#[test]
fn dwell_time_makes_biking_beat_the_bus_on_a_short_hop() {
    let planner = planner();
    let route = planner.fastest_path(7, 8).expect("hop is connected");

    let miles = segment_miles(&planner, 7, 8);
    assert!((route.hours - miles / 8.0).abs() < 1e-9);
    assert_eq!(route.steps[1].mode, TravelMode::Bike);

    let lines = planner.path_description(&route.steps).unwrap();
    assert_eq!(lines[1], "Bike N along Short Street for 0.1 mi");
}

#[test]
fn walking_is_the_only_way_back_up_a_oneway() {
    let planner = planner();
    assert!(planner.shortest_path(9, 10).is_some());
    assert!(planner.shortest_path(10, 9).is_none());

    let route = planner.fastest_path(10, 9).expect("walking is bidirectional");
    let miles = segment_miles(&planner, 9, 10);
    assert!((route.hours - miles / 3.0).abs() < 1e-9);
    assert!(route.steps[1..].iter().all(|s| s.mode == TravelMode::Walk));
}

#[test]
fn coalesced_legs_fall_back_to_toward_end_wording() {
    let planner = planner();
    let route = planner.fastest_path(1, 3).unwrap();
    // two bike segments collapse into one leg whose endpoints share no way
    assert_eq!(route.steps.len(), 2);
    let lines = planner.path_description(&route.steps).unwrap();
    assert_eq!(lines[1], "Bike SE toward End for 1.4 mi");
}

#[test]
fn start_and_end_anchors_format_locations() {
    let planner = planner();
    let route = planner.fastest_path(1, 2).unwrap();
    let lines = planner.path_description(&route.steps).unwrap();
    assert_eq!(lines[0], "Start at 38d 0' 52\" N, 121d 1' 6\" W");
    assert_eq!(lines[1], "Bike E along North Street for 1.0 mi");
    assert_eq!(lines[2], "End at 38d 0' 52\" N, 121d 0' 0\" W");
}

#[test]
fn adjacent_movement_steps_never_share_a_mode() {
    let planner = planner();
    for (src, dst) in [(1, 3), (5, 6), (7, 8), (10, 9)] {
        let route = planner.fastest_path(src, dst).unwrap();
        for pair in route.steps[1..].windows(2) {
            assert_ne!(pair[0].mode, pair[1].mode);
        }
    }
}

#[test]
fn disconnected_islands_have_no_route_between_them() {
    let planner = planner();
    // the square and the bus corridor are separate components
    assert!(planner.shortest_path(1, 5).is_none());
    assert!(planner.fastest_path(1, 5).is_none());
}

#[test]
fn empty_description_for_empty_steps() {
    let planner = planner();
    assert!(planner.path_description(&[]).is_none());
}
