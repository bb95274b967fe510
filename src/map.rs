//! Map data: road nodes with coordinates and outgoing segments.
//!
//! The search core never sees this module. [`MapProvider`] is the narrow
//! interface the routing glue needs: snap a coordinate to a node, enumerate
//! the nodes inside a circle together with their outgoing ways, and measure
//! geographic distance.
//!
//! [`OsmMap`] is the in-memory provider. It can be built by hand through
//! [`OsmMapBuilder`] or loaded from an OSM `.pbf` extract. Long road segments
//! are split by synthetic ("generated") nodes so that radius queries still see
//! points along roads whose real nodes lie far apart. Generated nodes get
//! negative ids, real OSM ids are positive.

use std::fs::File;
use std::path::Path;

use fnv::FnvHashMap;
use ordered_float::OrderedFloat;
use osmpbfreader::{OsmObj, OsmPbfReader, Tags};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use thiserror::Error;

use crate::error::PathError;
use crate::geo::{radius_in_degrees, GeoPoint};

pub type MapNodeId = i64;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OSM parse error: {0}")]
    Osm(String),

    #[error("map has no nodes")]
    EmptyMap,

    #[error("map node {0} is not known")]
    UnknownNode(MapNodeId),

    #[error(transparent)]
    Path(#[from] PathError),
}

pub type MapResult<T> = Result<T, MapError>;

/// An outgoing road segment: the node it ends at and its cost in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Way {
    pub end_node: MapNodeId,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapNode {
    pub id: MapNodeId,
    pub pos: GeoPoint,
    /// Inserted while splitting a long segment; not present in the source data.
    pub generated: bool,
    pub ways: Vec<Way>,
}

/// What routing needs from a map.
pub trait MapProvider {
    /// Node closest to `pos`, or `None` for an empty map.
    fn nearest_node(&self, pos: GeoPoint) -> Option<&MapNode>;

    /// All nodes within `radius_m` meters of `center`, closest first.
    fn nodes_within(&self, center: GeoPoint, radius_m: f64) -> Vec<&MapNode>;

    /// Geographic distance in meters.
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        a.distance_m(&b)
    }
}

/// Which way traffic may use a segment, relative to the order of its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Both,
    Forward,
    Backward,
}

/// Options for [`OsmMap::load_pbf`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Only keep ways tagged `highway`.
    pub only_highways: bool,
    /// Segments longer than this are split by generated nodes.
    pub max_segment_m: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            only_highways: true,
            max_segment_m: 50.0,
        }
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    slot: usize,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in degrees. Only used to pick candidates.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── OsmMap ────────────────────────────────────────────────────────────────────

pub struct OsmMap {
    nodes: Vec<MapNode>,
    by_id: FnvHashMap<MapNodeId, usize>,
    spatial_idx: RTree<NodeEntry>,
}

impl OsmMap {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: MapNodeId) -> Option<&MapNode> {
        self.by_id.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MapNode> + '_ {
        self.nodes.iter()
    }

    /// Read routable ways from an OSM `.pbf` file.
    ///
    /// Two passes: the first collects routable ways and the node ids they
    /// reference, the second reads coordinates for those nodes only.
    pub fn load_pbf(path: impl AsRef<Path>, options: &LoadOptions) -> MapResult<OsmMap> {
        let path = path.as_ref();

        let mut pbf = OsmPbfReader::new(File::open(path)?);
        let mut ways: Vec<(Vec<MapNodeId>, Direction)> = Vec::new();
        let mut needed_nodes: FnvHashMap<MapNodeId, Option<GeoPoint>> = FnvHashMap::default();
        for obj in pbf.iter() {
            let obj = obj.map_err(|e| MapError::Osm(e.to_string()))?;
            if let OsmObj::Way(w) = obj {
                if !is_way_routable(&w.tags, options.only_highways) {
                    continue;
                }
                let ids: Vec<MapNodeId> = w.nodes.iter().map(|n| n.0).collect();
                for id in &ids {
                    needed_nodes.insert(*id, None);
                }
                ways.push((ids, direction(&w.tags)));
            }
        }
        tracing::info!(
            ways = ways.len(),
            node_refs = needed_nodes.len(),
            "collected routable ways"
        );

        let mut pbf = OsmPbfReader::new(File::open(path)?);
        for obj in pbf.iter() {
            let obj = obj.map_err(|e| MapError::Osm(e.to_string()))?;
            if let OsmObj::Node(n) = obj {
                if let Some(slot) = needed_nodes.get_mut(&n.id.0) {
                    *slot = Some(GeoPoint::new(n.lat(), n.lon()));
                }
            }
        }

        let mut builder = OsmMapBuilder::new(options.max_segment_m);
        // Sorted so node slots do not depend on hash map iteration order.
        let mut located: Vec<(MapNodeId, GeoPoint)> = needed_nodes
            .iter()
            .filter_map(|(&id, pos)| pos.map(|p| (id, p)))
            .collect();
        located.sort_unstable_by_key(|(id, _)| *id);
        let missing = needed_nodes.len() - located.len();
        if missing > 0 {
            tracing::warn!(missing, "way nodes without coordinates were skipped");
        }
        for (id, pos) in located {
            builder.add_node(id, pos);
        }

        for (ids, dir) in &ways {
            for pair in ids.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a == b || !builder.contains(a) || !builder.contains(b) {
                    continue;
                }
                builder.add_segment(a, b, *dir)?;
            }
        }

        let map = builder.build();
        tracing::info!(
            path = %path.display(),
            nodes = map.node_count(),
            generated = map.nodes().filter(|n| n.generated).count(),
            "loaded map"
        );
        Ok(map)
    }
}

impl MapProvider for OsmMap {
    fn nearest_node(&self, pos: GeoPoint) -> Option<&MapNode> {
        // Degree space stretches longitude, so the tree's nearest entry only
        // bounds the answer. Re-rank everything inside that bound by haversine.
        let candidate = self
            .spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| &self.nodes[e.slot])?;
        let bound = pos.distance_m(&candidate.pos);
        self.nodes_within(pos, bound).into_iter().next().or(Some(candidate))
    }

    fn nodes_within(&self, center: GeoPoint, radius_m: f64) -> Vec<&MapNode> {
        let deg = radius_in_degrees(&center, radius_m);
        let mut found: Vec<(f64, &MapNode)> = self
            .spatial_idx
            .locate_within_distance([center.lat, center.lon], deg * deg)
            .map(|e| &self.nodes[e.slot])
            .map(|n| (center.distance_m(&n.pos), n))
            .filter(|(d, _)| *d <= radius_m)
            .collect();
        found.sort_unstable_by_key(|(d, n)| (OrderedFloat(*d), n.id));
        found.into_iter().map(|(_, n)| n).collect()
    }
}

// ── OsmMapBuilder ─────────────────────────────────────────────────────────────

/// Accumulates nodes and segments, then bulk-loads the spatial index in [`build`](Self::build).
pub struct OsmMapBuilder {
    nodes: Vec<MapNode>,
    by_id: FnvHashMap<MapNodeId, usize>,
    max_segment_m: f64,
    next_generated: MapNodeId,
}

impl OsmMapBuilder {
    /// `max_segment_m` of `f64::INFINITY` disables splitting.
    pub fn new(max_segment_m: f64) -> Self {
        Self {
            nodes: Vec::new(),
            by_id: FnvHashMap::default(),
            max_segment_m,
            next_generated: -1,
        }
    }

    pub fn contains(&self, id: MapNodeId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Add a real node. Re-adding an id keeps the first position.
    pub fn add_node(&mut self, id: MapNodeId, pos: GeoPoint) {
        if self.contains(id) {
            return;
        }
        self.push(id, pos, false);
    }

    /// Add a road segment between two known nodes, splitting it if it is
    /// longer than the builder's maximum segment length.
    pub fn add_segment(&mut self, a: MapNodeId, b: MapNodeId, dir: Direction) -> MapResult<()> {
        let pa = self.position(a)?;
        let pb = self.position(b)?;
        let length = pa.distance_m(&pb);

        let pieces = if self.max_segment_m.is_finite() && self.max_segment_m > 0.0 {
            (length / self.max_segment_m).ceil().max(1.0) as usize
        } else {
            1
        };
        let cost = length / pieces as f64;

        let mut chain = Vec::with_capacity(pieces + 1);
        chain.push(a);
        for k in 1..pieces {
            let id = self.next_generated;
            self.next_generated -= 1;
            self.push(id, pa.lerp(&pb, k as f64 / pieces as f64), true);
            chain.push(id);
        }
        chain.push(b);

        for pair in chain.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if dir != Direction::Backward {
                self.link(from, to, cost);
            }
            if dir != Direction::Forward {
                self.link(to, from, cost);
            }
        }
        Ok(())
    }

    pub fn build(self) -> OsmMap {
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(slot, n)| NodeEntry {
                point: [n.pos.lat, n.pos.lon],
                slot,
            })
            .collect();
        OsmMap {
            nodes: self.nodes,
            by_id: self.by_id,
            spatial_idx: RTree::bulk_load(entries),
        }
    }

    fn push(&mut self, id: MapNodeId, pos: GeoPoint, generated: bool) {
        self.by_id.insert(id, self.nodes.len());
        self.nodes.push(MapNode {
            id,
            pos,
            generated,
            ways: Vec::new(),
        });
    }

    fn position(&self, id: MapNodeId) -> MapResult<GeoPoint> {
        self.by_id
            .get(&id)
            .map(|&slot| self.nodes[slot].pos)
            .ok_or(MapError::UnknownNode(id))
    }

    fn link(&mut self, from: MapNodeId, to: MapNodeId, cost: f64) {
        if let Some(&slot) = self.by_id.get(&from) {
            self.nodes[slot].ways.push(Way { end_node: to, cost });
        }
    }
}

impl Default for OsmMapBuilder {
    fn default() -> Self {
        Self::new(f64::INFINITY)
    }
}

fn is_way_routable(tags: &Tags, only_highways: bool) -> bool {
    if only_highways && !tags.contains_key("highway") {
        return false;
    }
    // Areas are closed outlines, not roads.
    if tags.get("area").map(|v| v == "yes").unwrap_or(false) {
        return false;
    }
    true
}

fn direction(tags: &Tags) -> Direction {
    if let Some(v) = tags.get("oneway") {
        match v.as_str() {
            "yes" | "true" | "1" => return Direction::Forward,
            "-1" => return Direction::Backward,
            _ => {}
        }
    }
    if tags
        .get("junction")
        .map(|v| v == "roundabout")
        .unwrap_or(false)
    {
        return Direction::Forward;
    }
    Direction::Both
}
