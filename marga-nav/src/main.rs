//! MargaNav - route guidance replay
//!
//! Loads a Directions JSON response, navigates along its first route with
//! simulated fixes, and logs every guidance event.
//!
//! ```text
//! marga-nav route.json [--config marga.toml] [--reroute detour.json]
//!                      [--points 40] [--lead 20] [--corridor 50]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use marga_nav::{
    AppConfig, Director, DirectorService, FixtureRouter, GuidanceEvent, NavError, Resolution,
    Result, Router, RouterError, Simulator, TimeoutRouter,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directions JSON response to navigate
    directions: PathBuf,

    /// Configuration file path (default: marga.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directions JSON served for every reroute request
    #[arg(long)]
    reroute: Option<PathBuf>,

    /// Number of simulated fixes along the route
    #[arg(long)]
    points: Option<usize>,

    /// Lead distance in meters
    #[arg(long)]
    lead: Option<f64>,

    /// Corridor width in meters
    #[arg(long)]
    corridor: Option<f64>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marga_nav=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(points) = args.points {
        config.simulation.points = points;
    }
    if let Some(lead) = args.lead {
        config.director.lead_distance_m = lead;
    }
    if let Some(corridor) = args.corridor {
        config.director.corridor_width_m = corridor;
    }
    config.validate()?;

    let fixture = Arc::new(FixtureRouter::from_files(
        &args.directions,
        args.reroute.as_deref(),
    )?);
    let route = fixture
        .primary_routes()
        .and_then(|routes| routes.first())
        .cloned()
        .ok_or(NavError::Routing(RouterError::NoRouteFound))?;
    info!(
        "Loaded route with {} steps ({:.0} m)",
        route.len(),
        route.distance_m()
    );

    let router: Arc<dyn Router> = Arc::new(TimeoutRouter::new(
        fixture.clone(),
        config.router.timeout(),
    ));
    let mut director = Director::new(router, config.director.clone())?
        .with_location(route.start())?;
    director.events_mut().subscribe(log_event);

    let service = DirectorService::spawn(director, config.service.queue_capacity)?;
    let events = service.subscribe_channel()?;

    if service.navigate(route.end())? == Resolution::Discarded {
        warn!("Navigation was cancelled before the route arrived");
        return Ok(());
    }

    let simulator = Simulator::from_config(&config.simulation);
    let fixes = simulator.fixes_for(&route);
    let summary = simulator.replay(&service.handle(), &fixes)?;
    let status = service.status();
    service.shutdown();

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for event in events.try_iter() {
        *counts.entry(event.name()).or_default() += 1;
    }

    info!(
        "Replayed {}/{} fixes, router called {} times, final phase {}",
        summary.sent,
        summary.total,
        fixture.call_count(),
        status.phase.as_str()
    );
    for (name, count) in &counts {
        info!("  {:<10} {}", name, count);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            AppConfig::load(path)
        }
        None if Path::new("marga.toml").exists() => {
            info!("Loading configuration from marga.toml");
            AppConfig::load(Path::new("marga.toml"))
        }
        None => {
            info!("Using default configuration");
            Ok(AppConfig::default())
        }
    }
}

fn log_event(event: &GuidanceEvent) {
    match event {
        GuidanceEvent::Navigate { destination } => {
            info!(
                "navigate -> ({:.6}, {:.6})",
                destination.lon, destination.lat
            )
        }
        GuidanceEvent::Route(route) => info!("route: {} steps", route.len()),
        GuidanceEvent::Step { index, step } => info!(
            "step {}: {} {} {}",
            index,
            step.maneuver.kind,
            step.maneuver.modifier.map_or("", |m| m.as_str()),
            step.maneuver
                .instruction
                .as_deref()
                .unwrap_or(step.name.as_str())
        ),
        GuidanceEvent::Deviation => warn!("deviation"),
        GuidanceEvent::Finish => info!("finish"),
        GuidanceEvent::Cancel => info!("cancel"),
        GuidanceEvent::Error(kind) => warn!("error: {}", kind.as_str()),
    }
}
