//! End-to-end searches over small hand-built graphs.

use hoproute::{dijkstra, shortest_path_to, Graph, PathError, ShortestPath};

fn labels(entry: &ShortestPath<'_, &'static str>) -> Vec<&'static str> {
    entry.path.iter().map(|n| *n.data()).collect()
}

fn distance_to(result: &[ShortestPath<'_, &'static str>], label: &str) -> Option<f64> {
    result
        .iter()
        .find(|e| e.target().map(|n| *n.data()) == Some(label))
        .map(|e| e.distance)
}

fn diamond() -> Graph<&'static str> {
    // A-B(1), B-C(2), A-C(4), C-D(1), E isolated.
    let mut graph = Graph::new(vec!["A", "B", "C", "D", "E"]);
    graph.connect(0, 1, 1.0).unwrap();
    graph.connect(1, 2, 2.0).unwrap();
    graph.connect(0, 2, 4.0).unwrap();
    graph.connect(2, 3, 1.0).unwrap();
    graph
}

#[test]
fn diamond_distances_and_path() {
    let graph = diamond();
    let result = dijkstra(&graph, 0).unwrap();

    assert_eq!(distance_to(&result, "A"), Some(0.0));
    assert_eq!(distance_to(&result, "B"), Some(1.0));
    assert_eq!(distance_to(&result, "C"), Some(3.0));
    assert_eq!(distance_to(&result, "D"), Some(4.0));

    let to_d = result.iter().find(|e| labels(e).last() == Some(&"D")).unwrap();
    assert_eq!(labels(to_d), vec!["A", "B", "C", "D"]);
}

#[test]
fn isolated_node_never_appears() {
    let graph = diamond();
    let result = dijkstra(&graph, 0).unwrap();
    assert_eq!(result.len(), 4);
    assert_eq!(distance_to(&result, "E"), None);
    assert!(result.iter().all(|e| !labels(e).contains(&"E")));
}

#[test]
fn single_node_graph() {
    let graph = Graph::new(vec!["A"]);
    let result = dijkstra(&graph, 0).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].distance, 0.0);
    assert_eq!(labels(&result[0]), vec!["A"]);
}

#[test]
fn results_in_pop_order() {
    let graph = diamond();
    let result = dijkstra(&graph, 3).unwrap();
    let order: Vec<&str> = result.iter().map(|e| *e.target().unwrap().data()).collect();
    assert_eq!(order, vec!["D", "C", "B", "A"]);
    let distances: Vec<f64> = result.iter().map(|e| e.distance).collect();
    assert_eq!(distances, vec![0.0, 1.0, 3.0, 4.0]);
}

#[test]
fn duplicate_connections_keep_lightest_effective() {
    for weights in [[5.0, 2.0], [2.0, 5.0]] {
        let mut graph = Graph::new(vec!["A", "B"]);
        graph.connect(0, 1, weights[0]).unwrap();
        graph.connect(0, 1, weights[1]).unwrap();
        assert_eq!(graph.neighbors(0).unwrap().len(), 2);

        let result = dijkstra(&graph, 0).unwrap();
        assert_eq!(distance_to(&result, "B"), Some(2.0));
    }
}

#[test]
fn search_from_node_reference() {
    let graph = diamond();
    let source = graph.node(3).unwrap();
    let target = graph.node(0).unwrap();
    let found = shortest_path_to(&graph, source, target).unwrap().unwrap();
    assert_eq!(labels(&found), vec!["D", "C", "B", "A"]);
    assert_eq!(found.distance, 4.0);
}

#[test]
fn repeated_searches_do_not_share_state() {
    let graph = diamond();
    let first = dijkstra(&graph, 0).unwrap();
    let second = dijkstra(&graph, 0).unwrap();
    assert_eq!(first, second);
    let from_b = dijkstra(&graph, 1).unwrap();
    assert_eq!(distance_to(&from_b, "B"), Some(0.0));
    assert_eq!(labels(&from_b[0]), vec!["B"]);
}

#[test]
fn unknown_source_is_an_error() {
    let graph = diamond();
    assert_eq!(dijkstra(&graph, 9).unwrap_err(), PathError::InvalidNodeReference(9));
}
