//! Bus network loading from delimited text.
//!
//! Two inputs: a stops table (`stop_id,node_id`) and a routes table
//! (`route,stop_id`). The header row of each is skipped regardless of its
//! content, so rows deserialise positionally. Rows that are short or fail
//! to parse are logged and skipped; I/O failures abort the load.

use std::io::Read;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use log::{info, warn};
use serde::Deserialize;

use crate::model::{BusNetwork, NodeId, Route, Stop, StopId};
use crate::Error;

#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: StopId,
    node_id: NodeId,
}

#[derive(Debug, Deserialize)]
struct RouteRow {
    route: String,
    stop_id: StopId,
}

/// Parse a bus network from stop and route tables.
///
/// Stops keep input order. Routes aggregate rows sharing a name, in the
/// order each name first appears; stop order within a route is the
/// textual order of its rows.
///
/// # Errors
///
/// Returns an error when either stream fails to read. Malformed rows are
/// skipped.
pub fn load_bus_network<R: Read, S: Read>(stops: R, routes: S) -> Result<BusNetwork, Error> {
    let mut network = BusNetwork::default();

    for result in rows::<StopRow, _>(stops) {
        match result {
            Ok(row) => network.push_stop(Stop {
                id: row.stop_id,
                node_id: row.node_id,
            }),
            Err(error) => skip_or_fail(error, "stop")?,
        }
    }

    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<StopId>> = HashMap::new();
    for result in rows::<RouteRow, _>(routes) {
        match result {
            Ok(row) => match grouped.entry(row.route) {
                Entry::Vacant(entry) => {
                    order.push(entry.key().clone());
                    entry.insert(vec![row.stop_id]);
                }
                Entry::Occupied(mut entry) => entry.get_mut().push(row.stop_id),
            },
            Err(error) => skip_or_fail(error, "route")?,
        }
    }
    for name in order {
        if let Some(stop_ids) = grouped.remove(&name) {
            network.push_route(Route::new(name, stop_ids));
        }
    }

    info!(
        "loaded bus network: {} stops, {} routes",
        network.stop_count(),
        network.route_count()
    );
    Ok(network)
}

/// Deserialising row iterator with the header row consumed.
fn rows<T, R>(input: R) -> impl Iterator<Item = Result<T, csv::Error>>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input)
        .into_deserialize()
        .skip(1)
}

fn skip_or_fail(error: csv::Error, kind: &str) -> Result<(), Error> {
    if matches!(error.kind(), csv::ErrorKind::Io(_)) {
        return Err(error.into());
    }
    warn!("skipping malformed {kind} row: {error}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_rows_are_skipped_whatever_they_say() {
        let stops = "anything at all,really\n10,500\n";
        let routes = "route,stop_id\nA,10\n";
        let network = load_bus_network(stops.as_bytes(), routes.as_bytes()).unwrap();
        assert_eq!(network.stop_count(), 1);
        assert_eq!(network.stop_by_id(10).map(|s| s.node_id), Some(500));
    }

    #[test]
    fn short_and_malformed_rows_are_skipped() {
        let stops = "stop_id,node_id\n1,100\nbroken\nx,y\n2,200\n";
        let routes = "route,stop_id\nA,1\nB\nA,2\n";
        let network = load_bus_network(stops.as_bytes(), routes.as_bytes()).unwrap();
        assert_eq!(network.stop_count(), 2);
        assert_eq!(network.route_count(), 1);
        assert_eq!(network.route_by_name("A").map(Route::stop_count), Some(2));
    }

    #[test]
    fn routes_aggregate_in_first_seen_order() {
        let stops = "stop_id,node_id\n1,100\n2,200\n3,300\n";
        let routes = "route,stop_id\nGreen,1\nBlue,2\nGreen,3\nBlue,1\n";
        let network = load_bus_network(stops.as_bytes(), routes.as_bytes()).unwrap();

        assert_eq!(network.route_by_index(0).map(Route::name), Some("Green"));
        assert_eq!(network.route_by_index(1).map(Route::name), Some("Blue"));
        assert_eq!(
            network.route_by_name("Green").map(Route::stop_ids),
            Some(&[1, 3][..])
        );
        assert_eq!(
            network.route_by_name("Blue").map(Route::stop_ids),
            Some(&[2, 1][..])
        );
    }

    #[test]
    fn quoted_route_names_may_contain_the_delimiter() {
        let stops = "stop_id,node_id\n1,100\n2,200\n";
        let routes = "route,stop_id\n\"F, Express\",1\n\"F, Express\",2\n";
        let network = load_bus_network(stops.as_bytes(), routes.as_bytes()).unwrap();
        assert_eq!(
            network.route_by_name("F, Express").map(Route::stop_count),
            Some(2)
        );
    }

    #[test]
    fn empty_inputs_yield_an_empty_network() {
        let network = load_bus_network(&b""[..], &b""[..]).unwrap();
        assert_eq!(network.stop_count(), 0);
        assert_eq!(network.route_count(), 0);
    }
}
