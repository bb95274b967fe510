use crate::error::PathResult;
use crate::graph::{Graph, Node, NodeRef};
use crate::heap::{HeapStrategy, IndexedMinHeap};

/// A finalized node: its total distance from the source and the hops that achieve it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath<'g, T> {
    pub distance: f64,
    /// Source first, reached node last.
    pub path: Vec<&'g Node<T>>,
}

impl<'g, T> ShortestPath<'g, T> {
    /// The node this path ends at.
    pub fn target(&self) -> Option<&'g Node<T>> {
        self.path.last().copied()
    }
}

// Per-search state wrapped around a graph node. Lives only inside the heap.
struct Decorated<'g, T> {
    node: &'g Node<T>,
    distance: f64,
    hops: Vec<&'g Node<T>>,
}

struct Relaxed<'g, T> {
    distance: f64,
    hops: Vec<&'g Node<T>>,
}

// Min-heap by provisional distance, identity = graph index.
struct ByDistance;

impl<'g, T> HeapStrategy<Decorated<'g, T>> for ByDistance {
    type Update = Relaxed<'g, T>;

    #[inline]
    fn less(&self, a: &Decorated<'g, T>, b: &Decorated<'g, T>) -> bool {
        a.distance < b.distance
    }

    #[inline]
    fn identity(&self, element: &Decorated<'g, T>) -> usize {
        element.node.index()
    }

    fn apply_update(&self, element: &mut Decorated<'g, T>, update: Relaxed<'g, T>) {
        element.distance = update.distance;
        element.hops = update.hops;
    }
}

/// Dijkstra from `source` to every reachable node.
///
/// Entries come back in the order nodes were finalized, so distances are
/// non-decreasing. Nodes that cannot be reached from `source` are absent.
/// Edge weights are non-negative by construction of [`Graph`].
pub fn dijkstra<'g, T>(graph: &'g Graph<T>, source: impl NodeRef) -> PathResult<Vec<ShortestPath<'g, T>>> {
    dijkstra_until(graph, source, |_| false)
}

/// Like [`dijkstra`], but evaluates `stop` on each finalized entry and returns
/// as soon as it answers `true`. The stopping entry is the last one returned.
pub fn dijkstra_until<'g, T, F>(
    graph: &'g Graph<T>,
    source: impl NodeRef,
    mut stop: F,
) -> PathResult<Vec<ShortestPath<'g, T>>>
where
    F: FnMut(&ShortestPath<'g, T>) -> bool,
{
    let source = graph.resolve(source)?;

    let decorated: Vec<Decorated<'g, T>> = graph
        .nodes()
        .map(|node| {
            if node.index() == source {
                Decorated { node, distance: 0.0, hops: vec![node] }
            } else {
                Decorated { node, distance: f64::INFINITY, hops: Vec::new() }
            }
        })
        .collect();
    let mut heap = IndexedMinHeap::new(decorated, ByDistance)?;

    let mut finalized = Vec::new();
    let mut relaxations = 0usize;
    while !heap.is_empty() {
        let Decorated { node, distance, hops } = heap.pop_min()?;
        // Everything left is unreachable.
        if distance.is_infinite() {
            break;
        }

        let entry = ShortestPath { distance, path: hops };
        if stop(&entry) {
            finalized.push(entry);
            break;
        }

        for edge in graph.neighbors(node)? {
            let Some(position) = heap.locate(edge.target) else {
                continue;
            };
            let Some(target) = heap.get(position) else {
                continue;
            };
            let candidate = distance + edge.weight;
            if candidate < target.distance {
                let mut hops = Vec::with_capacity(entry.path.len() + 1);
                hops.extend_from_slice(&entry.path);
                hops.push(target.node);
                heap.decrease_key(position, Relaxed { distance: candidate, hops })?;
                relaxations += 1;
            }
        }
        finalized.push(entry);
    }

    tracing::debug!(
        source,
        nodes = graph.node_count(),
        settled = finalized.len(),
        relaxations,
        "dijkstra finished"
    );
    Ok(finalized)
}

/// Shortest path from `source` to `target`, or `None` if `target` is unreachable.
/// The search stops once `target` is finalized.
pub fn shortest_path_to<'g, T>(
    graph: &'g Graph<T>,
    source: impl NodeRef,
    target: impl NodeRef,
) -> PathResult<Option<ShortestPath<'g, T>>> {
    let target = graph.resolve(target)?;
    let reaches_target =
        |entry: &ShortestPath<'g, T>| entry.target().map(Node::index) == Some(target);
    let mut finalized = dijkstra_until(graph, source, reaches_target)?;
    Ok(finalized.pop().filter(reaches_target))
}
