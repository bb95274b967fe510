use anyhow::{Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, Writer};
use tracing_subscriber::EnvFilter;

use hoproute::{dijkstra, dijkstra_until, Graph, ShortestPath};

#[derive(Parser, Debug)]
#[command(name = "csv")]
#[command(about = "Build a graph from a CSV edge list (node_id,neighbor_id,weight) and run Dijkstra from a source node id.", long_about = None)]
struct Cli {
    /// Path to the .csv file
    #[arg(short, long)]
    csv: String,

    /// Source node id
    #[arg(short, long)]
    source: usize,

    /// Stop as soon as this node's shortest path is known
    #[arg(short, long)]
    target: Option<usize>,

    /// Treat each row as a one-way edge instead of an undirected one
    #[arg(long, default_value_t = false)]
    directed: bool,

    /// Output CSV (node_id, distance, path). If omitted, prints a summary.
    #[arg(short, long)]
    out: Option<String>,
}

fn read_edges(path: &str) -> Result<Vec<(usize, usize, f64)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path))?;

    let mut edges = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |i: usize| {
            record
                .get(i)
                .with_context(|| format!("row {}: missing column {}", row + 1, i))
        };
        let node_id: usize = field(0)?.trim().parse().with_context(|| format!("row {}: node_id", row + 1))?;
        let neighbor_id: usize = field(1)?.trim().parse().with_context(|| format!("row {}: neighbor_id", row + 1))?;
        let weight: f64 = field(2)?.trim().parse().with_context(|| format!("row {}: weight", row + 1))?;
        edges.push((node_id, neighbor_id, weight));
    }
    Ok(edges)
}

// Node ids are dense, so the graph has one node per id up to the largest seen.
fn build_graph(edges: &[(usize, usize, f64)], directed: bool) -> Result<Graph<usize>> {
    let node_count = edges
        .iter()
        .map(|&(u, v, _)| u.max(v) + 1)
        .max()
        .unwrap_or(0);

    let mut graph = Graph::new((0..node_count).collect());
    for &(u, v, w) in edges {
        if directed {
            graph.connect_directed(u, v, w)?;
        } else {
            graph.connect(u, v, w)?;
        }
    }
    Ok(graph)
}

fn format_path(entry: &ShortestPath<'_, usize>) -> String {
    let ids: Vec<String> = entry.path.iter().map(|n| n.data().to_string()).collect();
    ids.join(" ")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let edges = read_edges(&cli.csv)?;
    let graph = build_graph(&edges, cli.directed)?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph built"
    );

    let now = std::time::Instant::now();
    let results = match cli.target {
        Some(target) => dijkstra_until(&graph, cli.source, |e| {
            e.target().map(|n| *n.data()) == Some(target)
        })?,
        None => dijkstra(&graph, cli.source)?,
    };
    tracing::info!(
        elapsed_ms = now.elapsed().as_secs_f64() * 1000.0,
        settled = results.len(),
        "search finished"
    );

    if let Some(out_path) = cli.out {
        let mut wtr =
            Writer::from_path(&out_path).with_context(|| format!("creating CSV {}", &out_path))?;
        wtr.write_record(["node_id", "distance", "path"])?;
        for entry in &results {
            let Some(node) = entry.target() else { continue };
            wtr.write_record(&[
                node.data().to_string(),
                format!("{:.6}", entry.distance),
                format_path(entry),
            ])?;
        }
        wtr.flush()?;
        tracing::info!(path = %out_path, rows = results.len(), "wrote distances");
    } else if let Some(target) = cli.target {
        match results.last().filter(|e| e.target().map(|n| *n.data()) == Some(target)) {
            Some(entry) => println!("{:.6}\t{}", entry.distance, format_path(entry)),
            None => println!("{} is unreachable from {}", target, cli.source),
        }
    } else {
        println!("Nodes: {}", graph.node_count());
        println!("Reachable from {}: {}", cli.source, results.len());
        if let Some(farthest) = results.last() {
            println!("Max finite distance: {:.2}", farthest.distance);
        }
    }

    Ok(())
}
