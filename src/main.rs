//! pedibus — interactive multimodal trip planner over an OpenStreetMap
//! extract and a CSV-described bus system.
//!
//! ```bash
//! pedibus --map city.osm --stops stops.csv --routes routes.csv
//! ```
//!
//! Commands are read from stdin; `help` lists them.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use pedibus_core::{load_bus_network, load_street_map, MultimodalPlanner, PlannerConfig};

mod shell;

use shell::{CommandShell, DirectoryResults};

#[derive(Parser)]
#[command(name = "pedibus")]
#[command(about = "Plan walking, biking and bus trips between street map nodes")]
struct Cli {
    /// OSM XML street map
    #[arg(long, value_name = "FILE")]
    map: PathBuf,

    /// Bus stops CSV (stop_id,node_id)
    #[arg(long, value_name = "FILE")]
    stops: PathBuf,

    /// Bus routes CSV (route,stop_id)
    #[arg(long, value_name = "FILE")]
    routes: PathBuf,

    /// Directory saved paths are written into
    #[arg(long, value_name = "DIR", default_value = "results")]
    results: PathBuf,

    /// Walking speed in miles per hour
    #[arg(long, default_value_t = 3.0)]
    walk_speed: f64,

    /// Biking speed in miles per hour
    #[arg(long, default_value_t = 8.0)]
    bike_speed: f64,

    /// Road speed assumed when a way posts no limit, in miles per hour
    #[arg(long, default_value_t = 25.0)]
    speed_limit: f64,

    /// Seconds a bus dwells at each stop it departs from
    #[arg(long, default_value_t = 30.0)]
    stop_time: f64,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let map_file = File::open(&cli.map)
        .with_context(|| format!("opening street map {}", cli.map.display()))?;
    let street_map = load_street_map(BufReader::new(map_file))
        .with_context(|| format!("reading street map {}", cli.map.display()))?;
    info!(
        "street map: {} nodes, {} ways",
        street_map.node_count(),
        street_map.way_count()
    );

    let stops_file =
        File::open(&cli.stops).with_context(|| format!("opening stops {}", cli.stops.display()))?;
    let routes_file = File::open(&cli.routes)
        .with_context(|| format!("opening routes {}", cli.routes.display()))?;
    let bus_network = load_bus_network(stops_file, routes_file).context("reading bus system")?;
    info!(
        "bus system: {} stops, {} routes",
        bus_network.stop_count(),
        bus_network.route_count()
    );

    let planner = MultimodalPlanner::new(PlannerConfig {
        street_map: Arc::new(street_map),
        bus_network: Arc::new(bus_network),
        walk_speed_mph: cli.walk_speed,
        bike_speed_mph: cli.bike_speed,
        default_speed_mph: cli.speed_limit,
        bus_stop_time_sec: cli.stop_time,
    });

    let mut shell = CommandShell::new(planner, DirectoryResults::new(cli.results));
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    shell
        .run(stdin.lock(), stdout.lock(), stderr.lock())
        .context("command loop failed")?;
    Ok(())
}
