//! warehouse — small fleet traffic demo.
//!
//! Loads a navigation graph (path from the first argument, or the embedded
//! nine-vertex warehouse floor), spawns a handful of robots, hands out
//! crossing tasks and runs the tick loop.  Events go to the log
//! (`RUST_LOG=info` to see them); snapshots and per-tick counts go to CSV
//! under `output/warehouse`.
//!
//! ```text
//! warehouse [graph.json] [config.json]
//! ```
//!
//! `config.json` holds any subset of the `SimConfig` fields.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use fleet_core::{Point, SimConfig, Tick, VertexId};
use fleet_graph::{NavGraph, ReservationStore, load_graph_path, load_graph_str};
use fleet_output::{CsvWriter, OutputWriter, SimOutputObserver};
use fleet_robot::Robot;
use fleet_sim::{FleetEvent, FleetObserver, LogObserver, SimBuilder, TickSummary};

// ── Constants ─────────────────────────────────────────────────────────────────

const SAMPLE_GRAPH: &str = include_str!("../data/nav_graph.json");

const OUTPUT_DIR:  &str = "output/warehouse";
const TOTAL_TICKS: u64  = 600;

/// `(spawn vertex, destination vertex)` per robot.
const TASKS: [(u32, u32); 5] = [
    (0, 3), // dock_west  → dock_east
    (3, 0), // dock_east  → dock_west
    (4, 8), // charger_west → packing
    (8, 7), // packing    → charger_east
    (6, 6), // pick_2 stays put
];

// ── Observer fan-out ──────────────────────────────────────────────────────────

/// Logs every event and writes CSV output, keeping a few counters for the
/// closing report.
struct DemoObserver<W: OutputWriter> {
    log:           LogObserver,
    output:        SimOutputObserver<W>,
    events:        usize,
    deadlocks:     usize,
    snapshot_rows: usize,
}

impl<W: OutputWriter> DemoObserver<W> {
    fn new(log: LogObserver, output: SimOutputObserver<W>) -> Self {
        Self { log, output, events: 0, deadlocks: 0, snapshot_rows: 0 }
    }
}

impl<W: OutputWriter> FleetObserver for DemoObserver<W> {
    fn on_event(&mut self, tick: Tick, event: &FleetEvent) {
        self.events += 1;
        self.log.on_event(tick, event);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.deadlocks += summary.deadlocks_resolved;
        self.log.on_tick_end(tick, summary);
        self.output.on_tick_end(tick, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, robots: &[Robot], store: &ReservationStore) {
        self.snapshot_rows += robots.len();
        self.output.on_snapshot(tick, robots, store);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.log.on_sim_end(final_tick);
        self.output.on_sim_end(final_tick);
    }
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn load_graph(arg: Option<&str>) -> Result<NavGraph> {
    match arg {
        Some(path) => load_graph_path(Path::new(path)).with_context(|| format!("loading graph {path}")),
        None => load_graph_str(SAMPLE_GRAPH).context("loading embedded sample graph"),
    }
}

fn load_config(arg: Option<&str>) -> Result<SimConfig> {
    let Some(path) = arg else {
        return Ok(SimConfig { total_ticks: TOTAL_TICKS, output_interval_ticks: 10, ..SimConfig::default() });
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let graph = load_graph(args.first().map(String::as_str))?;
    let config = load_config(args.get(1).map(String::as_str))?;

    println!("=== warehouse — fleet traffic demo ===");
    println!(
        "Graph: {} vertices, {} lanes  |  Ticks: {}  |  Arrival: {:?}",
        graph.vertex_count(),
        graph.lane_count(),
        config.total_ticks,
        config.arrival_policy,
    );
    if let Some(b) = graph.bounds() {
        println!("Floor: {:.1} x {:.1} from {}", b.width(), b.height(), b.min);
    }
    println!();

    let mut sim = SimBuilder::new(config, graph).build()?;

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = DemoObserver::new(LogObserver::new(&sim.config), SimOutputObserver::new(writer));

    // Spawn and task each robot the way an operator would: click on it,
    // then click on its destination.
    for (start, dest) in TASKS {
        let (start, dest) = (VertexId(start), VertexId(dest));
        if !sim.store().graph().contains(start) || !sim.store().graph().contains(dest) {
            log::warn!("skipping task {start} → {dest}: vertex not in graph");
            continue;
        }
        let Some(robot) = sim.spawn(start, &mut obs)? else {
            continue;
        };
        let at: Point = sim.store().graph().position(start)?;
        let tolerance = sim.config.select_tolerance;
        if sim.select_nearest(at, tolerance, &mut obs) == Some(robot) {
            sim.assign_task(dest, &mut obs)?;
        }
    }

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.output.take_error() {
        eprintln!("output error: {e}");
    }

    println!();
    println!("Simulation complete in {:.3} s ({})", elapsed.as_secs_f64(), sim.clock);
    println!("  events logged       : {}", obs.events);
    println!("  deadlocks resolved  : {}", obs.deadlocks);
    println!("  robot_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv  : {} rows", sim.config.total_ticks);
    println!();

    println!("{:<8} {:<12} {:<16} {}", "Robot", "Colour", "Vertex", "Status");
    println!("{}", "-".repeat(64));
    for robot in sim.fleet().robots() {
        let v = robot.current_vertex();
        println!(
            "{:<8} {:<12} {:<16} {}",
            robot.id().0,
            robot.colour().hex(),
            sim.store().graph().name(v)?,
            robot.status_line(),
        );
    }

    Ok(())
}
