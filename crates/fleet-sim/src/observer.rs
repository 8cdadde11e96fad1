//! Observer trait for event logging, progress reporting and data collection.

use fleet_core::{SimClock, SimConfig, Tick};
use fleet_graph::ReservationStore;
use fleet_robot::Robot;

use crate::event::FleetEvent;

/// Per-tick fleet counts, reported to [`FleetObserver::on_tick_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub moving:             usize,
    pub waiting:            usize,
    pub completed:          usize,
    /// 0 or 1: the resolver overrides at most one reservation per tick.
    pub deadlocks_resolved: usize,
}

/// Callbacks invoked by [`Sim`][crate::Sim] as the fleet changes.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — deadlock counter
///
/// ```rust,ignore
/// struct DeadlockCounter(usize);
///
/// impl FleetObserver for DeadlockCounter {
///     fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
///         self.0 += summary.deadlocks_resolved;
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called at the very start of each tick, before any robot moves.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every fleet event: spawns, selections, task assignments,
    /// robot transitions and deadlock overrides.
    ///
    /// `tick` is the current clock tick; events raised between ticks carry
    /// the tick that is about to run.
    fn on_event(&mut self, _tick: Tick, _event: &FleetEvent) {}

    /// Called at the end of each tick, after the conflict resolver.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to robots and occupancy.
    fn on_snapshot(&mut self, _tick: Tick, _robots: &[Robot], _store: &ReservationStore) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}

/// Forwards fleet events to the `log` facade.
///
/// Events go out at `info`, deadlock overrides at `warn`, and per-tick
/// summaries at `debug`.  Each line is stamped with the tick and its nominal
/// elapsed time.  Install a logger (e.g. `env_logger`) in the binary.
pub struct LogObserver {
    clock: SimClock,
}

impl LogObserver {
    pub fn new(config: &SimConfig) -> Self {
        Self { clock: config.make_clock() }
    }

    fn stamp(&mut self, tick: Tick) -> &SimClock {
        self.clock.current_tick = tick;
        &self.clock
    }
}

impl FleetObserver for LogObserver {
    fn on_event(&mut self, tick: Tick, event: &FleetEvent) {
        let stamp = self.stamp(tick).to_string();
        match event {
            FleetEvent::DeadlockResolved { .. } => log::warn!("[{stamp}] {}", event.log_line()),
            _ => log::info!("[{stamp}] {}", event.log_line()),
        }
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        log::debug!(
            "tick {tick}: moving={} waiting={} completed={} deadlocks_resolved={}",
            summary.moving, summary.waiting, summary.completed, summary.deadlocks_resolved
        );
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        let stamp = self.stamp(final_tick).to_string();
        log::info!("[{stamp}] [system] Simulation finished");
    }
}

/// Buffers everything it is told.  Handy in tests and for replay.
#[derive(Default)]
pub struct EventRecorder {
    pub events:    Vec<(Tick, FleetEvent)>,
    pub summaries: Vec<(Tick, TickSummary)>,
    pub snapshots: Vec<Tick>,
    pub ended_at:  Option<Tick>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[source] message` for every recorded event, in order.
    pub fn log_lines(&self) -> Vec<String> {
        self.events.iter().map(|(_, e)| e.log_line()).collect()
    }

    pub fn deadlocks_resolved(&self) -> usize {
        self.summaries.iter().map(|(_, s)| s.deadlocks_resolved).sum()
    }
}

impl FleetObserver for EventRecorder {
    fn on_event(&mut self, tick: Tick, event: &FleetEvent) {
        self.events.push((tick, event.clone()));
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.summaries.push((tick, *summary));
    }

    fn on_snapshot(&mut self, tick: Tick, _robots: &[Robot], _store: &ReservationStore) {
        self.snapshots.push(tick);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended_at = Some(final_tick);
    }
}
