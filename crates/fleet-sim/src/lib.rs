//! `fleet-sim` — fleet registry, conflict resolver and tick loop.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Fleet     — Robot::update for every robot in registry order; earlier
//!                 robots win reservation races within the tick.
//!   ② Resolver  — the ConflictPolicy may revoke one lane held against the
//!                 first waiting robot.
//!   ③ Report    — on_tick_end(summary); on_snapshot on the output interval.
//! ```
//!
//! Everything is single-threaded.  [`Sim`] owns the
//! [`ReservationStore`](fleet_graph::ReservationStore) and lends it `&mut`
//! to one robot at a time, so reserve/release pairs never interleave.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_core::{SimConfig, VertexId};
//! use fleet_sim::{LogObserver, SimBuilder};
//!
//! let graph = fleet_graph::load_graph_str(json)?;
//! let mut sim = SimBuilder::new(SimConfig::default(), graph).build()?;
//! let mut log = LogObserver::new(&sim.config);
//! if let Some(robot) = sim.spawn(VertexId(0), &mut log)? {
//!     sim.assign_task_to(robot, VertexId(4), &mut log)?;
//! }
//! sim.run(&mut log)?;
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod manager;
pub mod observer;
pub mod sim;
pub mod snapshot;
pub mod traffic;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event::{EventSource, FleetEvent};
pub use manager::FleetManager;
pub use observer::{EventRecorder, FleetObserver, LogObserver, NoopObserver, TickSummary};
pub use sim::Sim;
pub use snapshot::{FleetSnapshot, LaneView, RobotView, VertexView};
pub use traffic::{ConflictPolicy, FirstWaitingOverride, LaneOverride, LaneStatus, TrafficManager};
