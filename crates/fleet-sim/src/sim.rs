//! The `Sim` struct and its tick loop.

use fleet_core::{AgentId, Point, SimClock, SimConfig, Tick, VertexId};
use fleet_graph::{BfsRouter, Path, ReservationStore, Router};

use crate::manager::FleetManager;
use crate::observer::{FleetObserver, TickSummary};
use crate::snapshot::FleetSnapshot;
use crate::traffic::{ConflictPolicy, FirstWaitingOverride, LaneStatus, TrafficManager};
use crate::{SimError, SimResult};

/// The simulation runner.
///
/// `Sim<R, P>` is the single owner of the reservation store.  Every tick:
///
/// 1. `on_tick_start`.
/// 2. **Fleet**: each robot runs one state-machine step in registry order,
///    mutating the store through `&mut` borrows lent one at a time.
/// 3. **Resolver**: the conflict policy may revoke one lane.
/// 4. `on_tick_end` with the [`TickSummary`], then `on_snapshot` on the
///    configured interval.
/// 5. The clock advances.
///
/// Spawns, selections and task assignments can be issued between ticks;
/// their events carry the tick about to run.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router = BfsRouter, P: ConflictPolicy = FirstWaitingOverride> {
    pub config: SimConfig,
    pub clock:  SimClock,

    store:   ReservationStore,
    fleet:   FleetManager<R>,
    traffic: TrafficManager<P>,
}

impl<R: Router, P: ConflictPolicy> Sim<R, P> {
    pub(crate) fn from_parts(
        config:  SimConfig,
        store:   ReservationStore,
        router:  R,
        policy:  P,
    ) -> Self {
        Self {
            clock:   config.make_clock(),
            fleet:   FleetManager::new(config.clone(), router),
            traffic: TrafficManager::new(policy),
            store,
            config,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    pub fn fleet(&self) -> &FleetManager<R> {
        &self.fleet
    }

    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Owned view of every vertex, lane and robot at the current tick.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot::capture(self.now(), &self.store, self.fleet.robots(), self.fleet.selected())
    }

    pub fn lane_status(&self, from: VertexId, to: VertexId) -> SimResult<Option<LaneStatus>> {
        Ok(self.traffic.lane_status(from, to, self.fleet.robots(), &self.store)?)
    }

    /// Conflicts `agent` would meet along `path` right now.
    pub fn detect_path_conflicts(&self, agent: AgentId, path: &Path) -> SimResult<Vec<VertexId>> {
        Ok(self.traffic.detect_path_conflicts(agent, path, &self.store)?)
    }

    /// Conflicts along the rest of `agent`'s current path.
    pub fn remaining_path_conflicts(&self, agent: AgentId) -> SimResult<Vec<VertexId>> {
        let robot = self.fleet.robot(agent).ok_or(SimError::AgentNotFound(agent))?;
        let ahead = robot.path().get(robot.path_index()..).unwrap_or(&[]);
        let path = Path { vertices: ahead.to_vec() };
        self.detect_path_conflicts(agent, &path)
    }

    // ── Commands ──────────────────────────────────────────────────────────

    pub fn spawn<O: FleetObserver>(&mut self, vertex: VertexId, observer: &mut O) -> SimResult<Option<AgentId>> {
        let now = self.now();
        self.fleet.spawn(&mut self.store, vertex, now, observer)
    }

    pub fn select_nearest<O: FleetObserver>(
        &mut self,
        point:     Point,
        tolerance: f32,
        observer:  &mut O,
    ) -> Option<AgentId> {
        let now = self.now();
        self.fleet.select_nearest(point, tolerance, now, observer)
    }

    pub fn select<O: FleetObserver>(&mut self, agent: AgentId, observer: &mut O) -> SimResult<()> {
        let now = self.now();
        self.fleet.select(agent, now, observer)
    }

    /// Assign a task to the selected robot.
    pub fn assign_task<O: FleetObserver>(&mut self, destination: VertexId, observer: &mut O) -> SimResult<bool> {
        let now = self.now();
        self.fleet.assign_task(&self.store, destination, now, observer)
    }

    pub fn assign_task_to<O: FleetObserver>(
        &mut self,
        agent:       AgentId,
        destination: VertexId,
        observer:    &mut O,
    ) -> SimResult<bool> {
        let now = self.now();
        self.fleet.assign_task_to(&self.store, agent, destination, now, observer)
    }

    /// Set or clear the manual block on lane `from → to`.
    pub fn set_lane_blocked(&mut self, from: VertexId, to: VertexId, blocked: bool) -> SimResult<()> {
        Ok(self.store.set_lane_blocked(from, to, blocked)?)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: FleetObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.now() < self.config.end_tick() {
            self.tick(observer)?;
        }
        observer.on_sim_end(self.now());
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: FleetObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(observer)?;
        }
        Ok(())
    }

    /// Execute one tick and advance the clock.
    pub fn tick<O: FleetObserver>(&mut self, observer: &mut O) -> SimResult<TickSummary> {
        let now = self.now();
        observer.on_tick_start(now);

        self.fleet.tick(&mut self.store, self.config.tick_delta_secs, now, observer)?;
        let resolved = self
            .traffic
            .resolve_one_deadlock(self.fleet.robots(), &mut self.store, now, observer)?;

        let summary = TickSummary { deadlocks_resolved: resolved, ..self.fleet.summary() };
        observer.on_tick_end(now, &summary);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, self.fleet.robots(), &self.store);
        }

        self.clock.advance();
        Ok(summary)
    }
}
