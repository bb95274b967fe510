//! `hoproute`: single-source shortest paths with full hop reconstruction.
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`heap`]     | `IndexedMinHeap`, `HeapStrategy`                          |
//! | [`graph`]    | `Graph`, `Node`, `Edge`, `NodeRef`                        |
//! | [`dijkstra`] | `dijkstra`, `dijkstra_until`, `shortest_path_to`          |
//! | [`error`]    | `PathError`, `Violation`, `PathResult<T>`                 |
//! | [`geo`]      | `GeoPoint`, haversine distance                            |
//! | [`map`]      | `MapProvider`, `OsmMap` (OSM `.pbf` loading)              |
//! | [`route`]    | `plan_route`: local subgraph + search between two points  |
//!
//! ```
//! use hoproute::{dijkstra, Graph};
//!
//! let mut graph = Graph::new(vec!["A", "B", "C", "D"]);
//! graph.connect(0, 1, 1.0).unwrap();
//! graph.connect(1, 2, 2.0).unwrap();
//! graph.connect(0, 2, 4.0).unwrap();
//! graph.connect(2, 3, 1.0).unwrap();
//!
//! let result = dijkstra(&graph, 0).unwrap();
//! let to_d = result.last().unwrap();
//! assert_eq!(to_d.distance, 4.0);
//! let hops: Vec<&str> = to_d.path.iter().map(|n| *n.data()).collect();
//! assert_eq!(hops, vec!["A", "B", "C", "D"]);
//! ```

pub mod dijkstra;
pub mod error;
pub mod geo;
pub mod graph;
pub mod heap;
pub mod map;
pub mod route;

pub use dijkstra::{dijkstra, dijkstra_until, shortest_path_to, ShortestPath};
pub use error::{PathError, PathResult, Violation};
pub use geo::GeoPoint;
pub use graph::{Edge, Graph, Node, NodeRef};
pub use heap::{HeapStrategy, IndexedMinHeap};
pub use map::{MapError, MapNode, MapProvider, MapResult, OsmMap, OsmMapBuilder};
pub use route::{plan_route, Route};
