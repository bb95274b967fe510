//! Property-based tests using proptest
//!
//! Random heaps and operation sequences check the heap invariant, the order
//! mapping and pop order against `priority_queue::PriorityQueue`; random
//! graphs check Dijkstra against a lazy-deletion `BinaryHeap` search.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use hoproute::{dijkstra, Graph, HeapStrategy, IndexedMinHeap, ShortestPath};
use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct Item {
    id: usize,
    key: u32,
}

#[derive(Debug)]
struct ByKey;

impl HeapStrategy<Item> for ByKey {
    type Update = u32;

    fn less(&self, a: &Item, b: &Item) -> bool {
        a.key < b.key
    }

    fn identity(&self, element: &Item) -> usize {
        element.id
    }

    fn apply_update(&self, element: &mut Item, update: u32) {
        element.key = update;
    }
}

fn check_heap(heap: &IndexedMinHeap<Item, ByKey>, popped: &HashSet<usize>) -> Result<(), TestCaseError> {
    let nodes = heap.as_slice();
    for i in 0..nodes.len() {
        for child in [2 * i + 1, 2 * i + 2] {
            if child < nodes.len() {
                prop_assert!(nodes[i].key <= nodes[child].key, "heap property broken at {}", i);
            }
        }
        prop_assert_eq!(heap.locate(nodes[i].id), Some(i));
    }
    for &id in popped {
        prop_assert_eq!(heap.locate(id), None);
    }
    Ok(())
}

/// Ops: `(true, _, _)` pops, `(false, pick, delta)` lowers the key of a live
/// element by `delta` (never below zero).
fn heap_matches_oracle(keys: Vec<u32>, ops: Vec<(bool, usize, u32)>) -> Result<(), TestCaseError> {
    let items: Vec<Item> = keys.iter().enumerate().map(|(id, &key)| Item { id, key }).collect();
    let mut heap = IndexedMinHeap::new(items, ByKey).unwrap();
    let mut oracle: PriorityQueue<usize, Reverse<u32>> = PriorityQueue::new();
    for (id, &key) in keys.iter().enumerate() {
        oracle.push(id, Reverse(key));
    }
    let mut popped = HashSet::new();
    let mut last_popped: Option<u32> = None;
    check_heap(&heap, &popped)?;

    for (pop, pick, delta) in ops {
        if heap.is_empty() {
            prop_assert!(heap.pop_min().is_err());
            prop_assert!(heap.peek_min().is_err());
            break;
        }
        if pop {
            let peeked = heap.peek_min().unwrap().key;
            let item = heap.pop_min().unwrap();
            let (_, Reverse(expected)) = oracle.pop().unwrap();
            prop_assert_eq!(item.key, peeked);
            prop_assert_eq!(item.key, expected);
            // Nothing was decreased below an already popped key.
            if let Some(last) = last_popped {
                prop_assert!(item.key >= last);
            }
            last_popped = Some(item.key);
            popped.insert(item.id);
        } else {
            let position = pick % heap.len();
            let current = *heap.get(position).unwrap();
            let floor = last_popped.unwrap_or(0);
            let new_key = current.key.saturating_sub(delta).max(floor);
            heap.decrease_key(position, new_key).unwrap();
            oracle.change_priority(&current.id, Reverse(new_key));
        }
        check_heap(&heap, &popped)?;
        prop_assert_eq!(heap.len(), oracle.len());
    }
    Ok(())
}

// Reference search: lazy deletion over std's BinaryHeap, distances only.
fn reference_distances(n: usize, edges: &[(usize, usize, u32)], source: usize) -> Vec<f64> {
    let mut adj = vec![Vec::new(); n];
    for &(u, v, w) in edges {
        adj[u].push((v, w as f64));
        adj[v].push((u, w as f64));
    }
    let mut dist = vec![f64::INFINITY; n];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Reverse((OrderedFloat(0.0), source)));
    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if cost > dist[node] {
            continue;
        }
        for &(next, w) in &adj[node] {
            let next_cost = cost + w;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                heap.push(Reverse((OrderedFloat(next_cost), next)));
            }
        }
    }
    dist
}

fn lightest_edge(graph: &Graph<usize>, from: usize, to: usize) -> Option<f64> {
    graph
        .neighbors(from)
        .unwrap()
        .iter()
        .filter(|e| e.target == to)
        .map(|e| e.weight)
        .min_by_key(|w| OrderedFloat(*w))
}

fn check_path(graph: &Graph<usize>, source: usize, entry: &ShortestPath<'_, usize>) -> Result<(), TestCaseError> {
    prop_assert_eq!(entry.path[0].index(), source);
    let mut total = 0.0;
    for pair in entry.path.windows(2) {
        let w = lightest_edge(graph, pair[0].index(), pair[1].index());
        prop_assert!(w.is_some(), "hop {} -> {} is not an edge", pair[0].index(), pair[1].index());
        total += w.unwrap_or(0.0);
    }
    prop_assert_eq!(total, entry.distance);
    Ok(())
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>, usize)> {
    (1usize..25).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, 0u32..20), 0..60),
            0..n,
        )
    })
}

fn dijkstra_matches_reference(n: usize, edges: Vec<(usize, usize, u32)>, source: usize) -> Result<(), TestCaseError> {
    let mut graph = Graph::new((0..n).collect());
    for &(u, v, w) in &edges {
        graph.connect(u, v, w as f64).unwrap();
    }
    let expected = reference_distances(n, &edges, source);
    let result = dijkstra(&graph, source).unwrap();

    let reachable = expected.iter().filter(|d| d.is_finite()).count();
    prop_assert_eq!(result.len(), reachable);

    let mut seen = HashSet::new();
    let mut last = 0.0;
    for entry in &result {
        let target = entry.target().unwrap().index();
        prop_assert!(seen.insert(target), "node {} finalized twice", target);
        prop_assert_eq!(entry.distance, expected[target]);
        prop_assert!(entry.distance >= last);
        last = entry.distance;
        check_path(&graph, source, entry)?;
    }
    Ok(())
}

fn insertion_order_irrelevant(n: usize, edges: Vec<(usize, usize, u32)>, source: usize) -> Result<(), TestCaseError> {
    let distances = |edges: &[(usize, usize, u32)]| {
        let mut graph = Graph::new((0..n).collect::<Vec<usize>>());
        for &(u, v, w) in edges {
            graph.connect(u, v, w as f64).unwrap();
        }
        let mut dist = vec![f64::INFINITY; n];
        for entry in dijkstra(&graph, source).unwrap() {
            dist[entry.target().unwrap().index()] = entry.distance;
        }
        dist
    };
    let reversed: Vec<_> = edges.iter().rev().copied().collect();
    prop_assert_eq!(distances(&edges), distances(&reversed));
    Ok(())
}

proptest! {
    #[test]
    fn test_heap_operations_match_priority_queue(
        keys in prop::collection::vec(0u32..1000, 0..60),
        ops in prop::collection::vec((prop::bool::ANY, 0usize..1000, 0u32..500), 0..120),
    ) {
        heap_matches_oracle(keys, ops)?;
    }

    #[test]
    fn test_heapify_then_drain_is_sorted(keys in prop::collection::vec(0u32..100, 0..200)) {
        let items: Vec<Item> = keys.iter().enumerate().map(|(id, &key)| Item { id, key }).collect();
        let mut heap = IndexedMinHeap::new(items, ByKey).unwrap();
        let mut drained = Vec::new();
        while let Ok(item) = heap.pop_min() {
            drained.push(item.key);
        }
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(drained, sorted);
    }

    #[test]
    fn test_dijkstra_matches_reference((n, edges, source) in graph_strategy()) {
        dijkstra_matches_reference(n, edges, source)?;
    }

    #[test]
    fn test_edge_insertion_order((n, edges, source) in graph_strategy()) {
        insertion_order_irrelevant(n, edges, source)?;
    }
}
