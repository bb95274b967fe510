//! Point-to-point routing on top of a [`MapProvider`].
//!
//! Builds a small graph from the map nodes inside a circle spanning both
//! endpoints, runs the search on it and drops generated nodes from the result.

use hashbrown::HashMap;

use crate::dijkstra::shortest_path_to;
use crate::geo::GeoPoint;
use crate::graph::Graph;
use crate::map::{MapError, MapNode, MapNodeId, MapProvider, MapResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Total cost of the route in meters, generated nodes included.
    pub distance_m: f64,
    /// Real map nodes along the route, origin first.
    pub node_ids: Vec<MapNodeId>,
}

/// Route between the map nodes nearest to `from` and `to`.
///
/// Only nodes within `distance(from, to) / 2 + slack_m` of the midpoint take
/// part in the search. Returns `Ok(None)` when no route exists inside that circle.
pub fn plan_route<M: MapProvider>(
    map: &M,
    from: GeoPoint,
    to: GeoPoint,
    slack_m: f64,
) -> MapResult<Option<Route>> {
    let origin = map.nearest_node(from).ok_or(MapError::EmptyMap)?;
    let destination = map.nearest_node(to).ok_or(MapError::EmptyMap)?;

    let center = from.midpoint(&to);
    let radius = map.distance(from, to) / 2.0 + slack_m;
    let mut members: Vec<&MapNode> = map.nodes_within(center, radius);

    let mut slots: HashMap<MapNodeId, usize> = members
        .iter()
        .enumerate()
        .map(|(slot, n)| (n.id, slot))
        .collect();
    // Snapped endpoints can sit just outside the circle.
    for endpoint in [origin, destination] {
        if !slots.contains_key(&endpoint.id) {
            slots.insert(endpoint.id, members.len());
            members.push(endpoint);
        }
    }

    let mut graph = Graph::new(members.iter().map(|n| n.id).collect());
    for (slot, node) in members.iter().enumerate() {
        for way in &node.ways {
            if let Some(&end) = slots.get(&way.end_node) {
                graph.connect_directed(slot, end, way.cost)?;
            }
        }
    }
    tracing::debug!(
        origin = origin.id,
        destination = destination.id,
        radius_m = radius,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built local graph"
    );

    let found = shortest_path_to(&graph, slots[&origin.id], slots[&destination.id])?;
    Ok(found.map(|found| Route {
        distance_m: found.distance,
        node_ids: found
            .path
            .iter()
            .filter(|n| !members[n.index()].generated)
            .map(|n| *n.data())
            .collect(),
    }))
}
