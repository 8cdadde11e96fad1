//! The fleet registry: spawning, selection, task assignment and the per-tick
//! update of every robot.

use fleet_core::{AgentId, Point, SimConfig, Tick, VertexId};
use fleet_graph::{ReservationStore, Router};
use fleet_robot::{Robot, RobotState};

use crate::event::FleetEvent;
use crate::observer::{FleetObserver, TickSummary};
use crate::{SimError, SimResult};

/// Owns every robot, in registry (spawn) order.
///
/// Agent ids are allocated sequentially from 0, so `AgentId(n)` is the
/// `n`-th robot spawned and doubles as its index.  Robots are never removed.
pub struct FleetManager<R: Router> {
    robots:   Vec<Robot>,
    selected: Option<AgentId>,
    config:   SimConfig,
    router:   R,
}

impl<R: Router> FleetManager<R> {
    pub fn new(config: SimConfig, router: R) -> Self {
        Self {
            robots: Vec::new(),
            selected: None,
            config,
            router,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, agent: AgentId) -> Option<&Robot> {
        self.robots.get(agent.index())
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn selected(&self) -> Option<AgentId> {
        self.selected
    }

    /// `Robot N: <status>` line for every robot, in registry order.
    pub fn statuses(&self) -> Vec<(AgentId, String)> {
        self.robots.iter().map(|r| (r.id(), r.status_line())).collect()
    }

    /// State counts for the tick summary.  `deadlocks_resolved` is left 0.
    pub fn summary(&self) -> TickSummary {
        let mut s = TickSummary::default();
        for r in &self.robots {
            match r.state() {
                RobotState::Moving    => s.moving += 1,
                RobotState::Waiting   => s.waiting += 1,
                RobotState::Completed => s.completed += 1,
                RobotState::Idle | RobotState::Charging => {}
            }
        }
        s
    }

    // ── Spawning & selection ──────────────────────────────────────────────

    /// Place a new robot on `vertex`.
    ///
    /// Returns `Ok(None)` without touching any state if the vertex is
    /// occupied.  An unknown vertex is an error.
    pub fn spawn<O: FleetObserver>(
        &mut self,
        store:    &mut ReservationStore,
        vertex:   VertexId,
        tick:     Tick,
        observer: &mut O,
    ) -> SimResult<Option<AgentId>> {
        if store.vertex_occupant(vertex)?.is_some() {
            observer.on_event(tick, &FleetEvent::SpawnRejected { vertex });
            return Ok(None);
        }
        let n = self.robots.len();
        let agent = AgentId::try_from(n).map_err(|_| SimError::FleetFull(n))?;
        let robot = Robot::new(agent, vertex, store, &self.config)?;
        self.robots.push(robot);
        observer.on_event(tick, &FleetEvent::Spawned { agent, vertex });
        Ok(Some(agent))
    }

    /// Select the robot closest to `point`, if any lies strictly within
    /// `tolerance`.
    ///
    /// Equal distances keep the earlier robot.  A miss leaves the current
    /// selection as it was.
    pub fn select_nearest<O: FleetObserver>(
        &mut self,
        point:     Point,
        tolerance: f32,
        tick:      Tick,
        observer:  &mut O,
    ) -> Option<AgentId> {
        let mut best: Option<(AgentId, f32)> = None;
        for r in &self.robots {
            let d = r.position().distance(point);
            let limit = best.map_or(tolerance, |(_, bd)| bd);
            if d < limit {
                best = Some((r.id(), d));
            }
        }
        let (agent, _) = best?;
        self.selected = Some(agent);
        observer.on_event(tick, &FleetEvent::Selected { agent });
        Some(agent)
    }

    /// Select `agent` directly.
    pub fn select<O: FleetObserver>(
        &mut self,
        agent:    AgentId,
        tick:     Tick,
        observer: &mut O,
    ) -> SimResult<()> {
        if self.robot(agent).is_none() {
            return Err(SimError::AgentNotFound(agent));
        }
        self.selected = Some(agent);
        observer.on_event(tick, &FleetEvent::Selected { agent });
        Ok(())
    }

    // ── Task assignment ───────────────────────────────────────────────────

    /// Give the selected robot a task.  `Ok(false)` if nothing is selected or
    /// the robot refuses.
    pub fn assign_task<O: FleetObserver>(
        &mut self,
        store:       &ReservationStore,
        destination: VertexId,
        tick:        Tick,
        observer:    &mut O,
    ) -> SimResult<bool> {
        let Some(agent) = self.selected else {
            return Ok(false);
        };
        self.assign_task_to(store, agent, destination, tick, observer)
    }

    /// Give `agent` a task regardless of the selection.
    pub fn assign_task_to<O: FleetObserver>(
        &mut self,
        store:       &ReservationStore,
        agent:       AgentId,
        destination: VertexId,
        tick:        Tick,
        observer:    &mut O,
    ) -> SimResult<bool> {
        let robot = self
            .robots
            .get_mut(agent.index())
            .ok_or(SimError::AgentNotFound(agent))?;
        let outcome = robot.assign_task(destination, store, &self.router)?;
        let event = if outcome.is_accepted() {
            FleetEvent::TaskAssigned { agent, from: robot.current_vertex(), to: destination }
        } else {
            FleetEvent::TaskRejected { agent, to: destination, reason: outcome }
        };
        observer.on_event(tick, &event);
        Ok(outcome.is_accepted())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Update every robot once, in registry order.  Earlier robots win any
    /// reservation race within the tick.
    pub fn tick<O: FleetObserver>(
        &mut self,
        store:      &mut ReservationStore,
        delta_secs: f32,
        tick:       Tick,
        observer:   &mut O,
    ) -> SimResult<()> {
        for robot in &mut self.robots {
            let status = robot.update(store, delta_secs)?;
            if status.transition.is_some() {
                observer.on_event(tick, &FleetEvent::Status(status));
            }
        }
        Ok(())
    }
}
