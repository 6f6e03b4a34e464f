//! Street map loading from OSM XML.
//!
//! The reader consumes an XML event stream and recognises `node`, `way`,
//! `nd` and `tag` elements; everything else is skipped. A malformed
//! numeric attribute drops that one entity, never the whole load.

use std::io::BufRead;

use geo::Point;
use hashbrown::HashMap;
use log::{info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::model::{Node, NodeId, StreetMap, Way, WayId};
use crate::Error;

#[derive(Default)]
struct PendingNode {
    id: Option<NodeId>,
    lat: Option<f64>,
    lon: Option<f64>,
    tags: HashMap<String, String>,
    malformed: bool,
}

impl PendingNode {
    fn finish(self, map: &mut StreetMap) {
        match (self.id, self.lat, self.lon, self.malformed) {
            (Some(id), Some(lat), Some(lon), false) => {
                map.push_node(Node::new(id, Point::new(lon, lat), self.tags));
            }
            _ => warn!("dropping node with missing or malformed id/lat/lon"),
        }
    }
}

#[derive(Default)]
struct PendingWay {
    id: Option<WayId>,
    node_ids: Vec<NodeId>,
    tags: HashMap<String, String>,
    malformed: bool,
}

impl PendingWay {
    fn finish(self, map: &mut StreetMap) {
        match (self.id, self.malformed) {
            (Some(id), false) => map.push_way(Way::new(id, self.node_ids, self.tags)),
            _ => warn!("dropping way with missing or malformed id"),
        }
    }
}

/// Parse a street map from an OSM XML stream.
///
/// # Errors
///
/// Returns an error when the underlying stream is not well-formed XML or
/// fails to read. Entity-level problems are logged and skipped instead.
pub fn load_street_map<R: BufRead>(source: R) -> Result<StreetMap, Error> {
    let mut reader = Reader::from_reader(source);

    let mut map = StreetMap::default();
    let mut node: Option<PendingNode> = None;
    let mut way: Option<PendingWay> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => open_element(&start, &mut node, &mut way),
            Event::Empty(start) => {
                // self-closing form: open and immediately finish
                open_element(&start, &mut node, &mut way);
                match start.name().as_ref() {
                    b"node" => {
                        if let Some(pending) = node.take() {
                            pending.finish(&mut map);
                        }
                    }
                    b"way" => {
                        if let Some(pending) = way.take() {
                            pending.finish(&mut map);
                        }
                    }
                    _ => {}
                }
            }
            Event::End(end) => match end.name().as_ref() {
                b"node" => {
                    if let Some(pending) = node.take() {
                        pending.finish(&mut map);
                    }
                }
                b"way" => {
                    if let Some(pending) = way.take() {
                        pending.finish(&mut map);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    info!(
        "loaded street map: {} nodes, {} ways",
        map.node_count(),
        map.way_count()
    );
    Ok(map)
}

fn open_element(
    start: &BytesStart<'_>,
    node: &mut Option<PendingNode>,
    way: &mut Option<PendingWay>,
) {
    match start.name().as_ref() {
        b"node" => {
            *way = None;
            *node = Some(open_node(start));
        }
        b"way" => {
            *node = None;
            *way = Some(open_way(start));
        }
        b"nd" => {
            if let Some(current) = way.as_mut() {
                push_node_ref(start, current);
            }
        }
        b"tag" => {
            if let Some((key, value)) = read_tag(start) {
                if let Some(current) = node.as_mut() {
                    current.tags.insert(key, value);
                } else if let Some(current) = way.as_mut() {
                    current.tags.insert(key, value);
                }
            }
        }
        _ => {}
    }
}

fn open_node(start: &BytesStart<'_>) -> PendingNode {
    let mut pending = PendingNode::default();
    for (key, value) in element_attributes(start) {
        match key.as_str() {
            "id" => match value.parse() {
                Ok(id) => pending.id = Some(id),
                Err(_) => pending.malformed = true,
            },
            "lat" => match value.parse() {
                Ok(lat) => pending.lat = Some(lat),
                Err(_) => pending.malformed = true,
            },
            "lon" => match value.parse() {
                Ok(lon) => pending.lon = Some(lon),
                Err(_) => pending.malformed = true,
            },
            _ => {
                pending.tags.insert(key, value);
            }
        }
    }
    pending
}

fn open_way(start: &BytesStart<'_>) -> PendingWay {
    let mut pending = PendingWay::default();
    for (key, value) in element_attributes(start) {
        match key.as_str() {
            "id" => match value.parse() {
                Ok(id) => pending.id = Some(id),
                Err(_) => pending.malformed = true,
            },
            _ => {
                pending.tags.insert(key, value);
            }
        }
    }
    pending
}

fn push_node_ref(start: &BytesStart<'_>, way: &mut PendingWay) {
    for (key, value) in element_attributes(start) {
        if key == "ref" {
            match value.parse() {
                Ok(node_id) => way.node_ids.push(node_id),
                Err(_) => warn!("skipping nd with malformed ref {value:?}"),
            }
        }
    }
}

fn read_tag(start: &BytesStart<'_>) -> Option<(String, String)> {
    let mut key = None;
    let mut value = None;
    for (name, content) in element_attributes(start) {
        match name.as_str() {
            "k" => key = Some(content),
            "v" => value = Some(content),
            _ => {}
        }
    }
    Some((key?, value.unwrap_or_default()))
}

fn element_attributes(start: &BytesStart<'_>) -> Vec<(String, String)> {
    start
        .attributes()
        .flatten()
        .filter_map(|attribute| {
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}
