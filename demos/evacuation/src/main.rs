//! evacuation — pedestrian evacuation of a synthetic ward.
//!
//! Seeds residents from an embedded population table onto a small street
//! grid, sends each of them to the nearest of two shelters and runs the flow
//! engine until everyone has arrived.  Per-step CSV output lands in
//! `output/evacuation` unless the config says otherwise.
//!
//! ```text
//! RUST_LOG=debug cargo run -p evacuation -- config.json
//! ```
//!
//! `config.json` is optional; every field has a default:
//!
//! ```json
//! { "sim": { "step_secs": 1.0, "seed": 7, "route_policy": { "kind": "at_every_node" } },
//!   "output_dir": "output/run-7" }
//! ```

mod network;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ev_agent::AgentStore;
use ev_core::{NodeId, SimConfig, Tick};
use ev_mobility::MobilityStore;
use ev_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ev_population::{load_records_csv, load_records_reader};
use ev_sim::{SimBuilder, SimObserver, StepSummary};
use ev_spatial::{DijkstraRouter, Router, StreetNetwork};

use network::build_ward;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                    u64 = 42;
const SNAPSHOT_INTERVAL_STEPS: u64 = 10;
const PROGRESS_INTERVAL_STEPS: u64 = 60;

// label,quantity,region; one ring per region, metres in the ward frame.
// `market` lies inside a block with no street corner and is skipped.
const POPULATION_CSV: &str = "\
label,quantity,region\n\
riverside,120,-5 -5;185 -5;185 125;-5 125\n\
high-street,260,-5 175;425 175;425 185;-5 185\n\
hillside,90,245 235;425 235;425 305;245 305\n\
market,15,20 20;40 20;40 40;20 40\n\
";

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim:            SimConfig,
    output_dir:     PathBuf,
    /// Replaces the embedded population table.
    population_csv: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig {
                seed:                    SEED,
                snapshot_interval_steps: SNAPSHOT_INTERVAL_STEPS,
                ..SimConfig::default()
            },
            output_dir:     PathBuf::from("output/evacuation"),
            population_csv: None,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Forwards to the output observer and logs progress every few steps.
struct ProgressObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    summary_rows:  usize,
    snapshot_rows: usize,
}

impl<W: OutputWriter> ProgressObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, summary_rows: 0, snapshot_rows: 0 }
    }
}

impl<W: OutputWriter> SimObserver for ProgressObserver<W> {
    fn on_step_end(&mut self, s: &StepSummary) {
        self.summary_rows += 1;
        if s.step.0 % PROGRESS_INTERVAL_STEPS == 0 {
            info!(
                step       = s.step.0,
                evacuated  = s.evacuated,
                waiting    = s.waiting,
                in_transit = s.in_transit,
                "progress"
            );
        }
        self.inner.on_step_end(s);
    }

    fn on_snapshot(&mut self, step: Tick, mobility: &MobilityStore, agents: &AgentStore, network: &StreetNetwork) {
        self.snapshot_rows += agents.count + network.edge_count();
        self.inner.on_snapshot(step, mobility, agents, network);
    }

    fn on_sim_end(&mut self, final_step: Tick) {
        self.inner.on_sim_end(final_step);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let arg = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(arg.as_deref())?;

    // 1. Street network and shelters.
    let (network, shelters) = build_ward()?;
    println!("Ward network: {} nodes, {} edges", network.node_count(), network.edge_count());

    // 2. Population.
    let records = match &config.population_csv {
        Some(path) => load_records_csv(path)?,
        None       => load_records_reader(Cursor::new(POPULATION_CSV))?,
    };
    println!("Population records: {}", records.len());

    // 3. Build sim; every agent heads for the closest shelter as the crow flies.
    let mut sim = SimBuilder::new(config.sim.clone(), network, DijkstraRouter)
        .population(records)
        .build()?;

    let targets = shelters.all();
    let node_pos = sim.network.node_pos.clone();
    sim.assign_destinations(|_, orig| {
        let from = node_pos[orig.index()];
        targets
            .iter()
            .map(|&(_, node)| node)
            .min_by(|&a, &b| {
                from.distance(node_pos[a.index()]).total_cmp(&from.distance(node_pos[b.index()]))
            })
    });
    println!("Agents: {}  |  Seed: {}  |  Step: {} s", sim.agents.count, config.sim.seed, config.sim.step_secs);

    // 4. Output.
    let writer = CsvWriter::new(&config.output_dir)?;
    let mut obs = ProgressObserver::new(SimOutputObserver::new(writer));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        warn!(error = %e, "output incomplete");
    }

    // 6. Summary.
    let s = sim.summary();
    println!();
    println!("Simulation complete in {:.3} s (simulated {})", elapsed.as_secs_f64(), sim.clock);
    println!("  evacuated : {}/{}", s.evacuated, s.total);
    println!("  dead      : {}", s.dead);
    println!("  summary rows  : {}", obs.summary_rows);
    println!("  snapshot rows : {}", obs.snapshot_rows);
    println!();

    // 7. Free-flow route from the far corner to each shelter over the final costs.
    let origin = NodeId(0);
    println!("{:<8} {:>6} {:>10} {:>10} {:>8}", "Shelter", "Hops", "Length m", "Time s", "v m/s");
    println!("{}", "-".repeat(46));
    for (name, shelter) in targets {
        let route = sim.mobility.router.route(&sim.network, &sim.mobility.store.costs, origin, shelter)?;
        let stats = sim.mobility.store.route_stats(&sim.network, &route.nodes)?;
        println!(
            "{:<8} {:>6} {:>10.1} {:>10.1} {:>8.2}",
            name,
            route.edges.len(),
            stats.length_m,
            stats.travel_time_secs,
            stats.mean_velocity,
        );
    }

    Ok(())
}
