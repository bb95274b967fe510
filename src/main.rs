use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;
use tracing_subscriber::EnvFilter;

use hoproute::map::LoadOptions;
use hoproute::{plan_route, GeoPoint, MapProvider, OsmMap};

#[derive(Parser, Debug)]
#[command(name = "osm")]
#[command(about = "Load an OSM .pbf and find the shortest road route between two coordinates.", long_about = None)]
struct Cli {
    /// Path to the .osm.pbf file
    #[arg(short, long)]
    pbf: String,

    #[arg(long, allow_hyphen_values = true)]
    from_lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    from_lon: f64,

    #[arg(long, allow_hyphen_values = true)]
    to_lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    to_lon: f64,

    /// Extra radius (m) around the circle spanning both points
    #[arg(long, default_value_t = 20.0)]
    slack: f64,

    /// Split road segments longer than this many meters
    #[arg(long, default_value_t = 50.0)]
    max_segment: f64,

    /// Only include 'highway' ways (recommended). If false, attempts to include all linear ways.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    only_highways: bool,

    /// Output CSV (node_id, lat, lon). If omitted, prints the node ids to stdout.
    #[arg(short, long)]
    out: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let options = LoadOptions {
        only_highways: cli.only_highways,
        max_segment_m: cli.max_segment,
    };
    let map = OsmMap::load_pbf(&cli.pbf, &options).with_context(|| format!("loading {}", &cli.pbf))?;

    let from = GeoPoint::new(cli.from_lat, cli.from_lon);
    let to = GeoPoint::new(cli.to_lat, cli.to_lon);
    tracing::info!(
        straight_line_m = map.distance(from, to),
        "routing"
    );

    let Some(route) = plan_route(&map, from, to, cli.slack)? else {
        tracing::warn!(slack_m = cli.slack, "no route inside the search circle; try a larger --slack");
        return Ok(());
    };
    tracing::info!(
        distance_m = route.distance_m,
        nodes = route.node_ids.len(),
        "route found"
    );

    if let Some(out_path) = cli.out {
        let mut wtr =
            Writer::from_path(&out_path).with_context(|| format!("creating CSV {}", &out_path))?;
        wtr.write_record(["node_id", "lat", "lon"])?;
        for id in &route.node_ids {
            let node = map
                .node(*id)
                .with_context(|| format!("route node {} missing from map", id))?;
            wtr.write_record(&[
                id.to_string(),
                format!("{:.7}", node.pos.lat),
                format!("{:.7}", node.pos.lon),
            ])?;
        }
        wtr.flush()?;
        tracing::info!(path = %out_path, "wrote route");
    } else {
        let ids: Vec<String> = route.node_ids.iter().map(|id| id.to_string()).collect();
        println!("{}", ids.join(" "));
    }

    Ok(())
}
