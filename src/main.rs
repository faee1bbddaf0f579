mod app;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kg_layout::graph::{demo_graph, load_graph_file};
use kg_layout::{Filter, Frame, GraphExplorer, SimulationConfig, Viewport};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph payload (`{"nodes": [...], "edges": [...]}`); the built-in demo graph when omitted.
    #[arg(long)]
    graph: Option<PathBuf>,
    /// "all" or a category tag (area, target, compound, paper, model, regulator).
    #[arg(long, default_value = "all")]
    filter: Filter,
    #[arg(long, default_value_t = 680.0)]
    width: f32,
    #[arg(long, default_value_t = 500.0)]
    height: f32,
    #[arg(long, allow_hyphen_values = true)]
    charge: Option<f32>,
    #[arg(long)]
    theta: Option<f32>,
    #[arg(long)]
    seed: Option<u64>,
    /// 0 disables the tick cap.
    #[arg(long)]
    max_ticks: Option<usize>,
    #[arg(long)]
    alpha_start: Option<f32>,
    /// Run the layout to rest and print it as JSON instead of opening the viewer.
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        if let Some(charge) = self.charge {
            config.charge_strength = charge;
        }
        if let Some(theta) = self.theta {
            config.theta = theta.max(0.0);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = (max_ticks > 0).then_some(max_ticks);
        }
        if let Some(alpha_start) = self.alpha_start {
            config.alpha_start = alpha_start.max(0.0);
        }
        config
    }
}

#[derive(Serialize)]
struct HeadlessReport {
    filter: &'static str,
    ticks: usize,
    alpha: f32,
    settled: bool,
    viewport: Viewport,
    #[serde(flatten)]
    frame: Frame,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store = match &args.graph {
        Some(path) => load_graph_file(path)?,
        None => demo_graph()?,
    };
    info!(
        vertices = store.vertex_count(),
        edges = store.edge_count(),
        "graph loaded"
    );

    let viewport = Viewport::new(args.width, args.height);
    let explorer =
        GraphExplorer::with_filter(store, args.simulation_config(), viewport, args.filter);

    if args.headless {
        return run_headless(explorer);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1180.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "kg-layout",
        options,
        Box::new(move |cc| Ok(Box::new(app::ExplorerApp::new(cc, explorer)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}

fn run_headless(mut explorer: GraphExplorer) -> Result<()> {
    let ticks = explorer.settle();
    let simulation = explorer.simulation();
    let settled = simulation.is_settled();
    if !settled {
        info!(ticks, alpha = simulation.alpha(), "layout stopped at the tick cap");
    }

    let report = HeadlessReport {
        filter: explorer.filter().label(),
        ticks,
        alpha: simulation.alpha(),
        settled,
        viewport: explorer.viewport(),
        frame: explorer.frame(),
    };
    let json = serde_json::to_string_pretty(&report).context("failed to encode layout report")?;
    println!("{json}");
    Ok(())
}
