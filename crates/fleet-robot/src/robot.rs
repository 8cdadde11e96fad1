//! The `Robot` struct and its per-tick state machine.

use std::fmt;

use fleet_core::{AgentId, ArrivalPolicy, Point, RobotColour, SimConfig, Step, VertexId};
use fleet_graph::{ReservationStore, Router};

use crate::{Assignment, RobotError, RobotResult, RobotState, StatusEvent, Transition};

/// One robot: identity, position, and progress along its current path.
///
/// All occupancy changes go through the [`ReservationStore`] passed to each
/// call; the robot keeps no reservation bookkeeping of its own beyond what
/// its state implies (a vertex when parked, a lane when `Moving`).
#[derive(Debug, Clone)]
pub struct Robot {
    id:     AgentId,
    colour: RobotColour,

    state:          RobotState,
    current_vertex: VertexId,

    /// Vertex sequence of the current task, start included.  Empty until the
    /// first assignment.
    path:          Vec<VertexId>,
    /// Index into `path` of `current_vertex`.
    path_index:    usize,
    target_vertex: Option<VertexId>,

    position:        Point,
    target_position: Point,

    /// Parked at the end of its lane, waiting for the vertex there.  Only
    /// ever set under `ArrivalPolicy::Gated`.
    awaiting_vertex: bool,

    move_speed:     f32,
    arrival_policy: ArrivalPolicy,
}

impl Robot {
    /// Create a robot on `start`, reserving the vertex.
    ///
    /// # Errors
    ///
    /// [`RobotError::Config`] if `config` fails validation (a non-positive
    /// `move_speed` would stall or corrupt motion);
    /// [`RobotError::VertexOccupied`] if another robot holds `start`;
    /// a graph error if `start` does not exist.
    pub fn new(
        id:     AgentId,
        start:  VertexId,
        store:  &mut ReservationStore,
        config: &SimConfig,
    ) -> RobotResult<Self> {
        config.validate()?;
        let position = store.graph().position(start)?;
        if !store.reserve_vertex(start, id)? {
            return Err(RobotError::VertexOccupied(start));
        }
        Ok(Self {
            id,
            colour:          RobotColour::for_agent(id),
            state:           RobotState::Idle,
            current_vertex:  start,
            path:            Vec::new(),
            path_index:      0,
            target_vertex:   None,
            position,
            target_position: position,
            awaiting_vertex: false,
            move_speed:      config.move_speed,
            arrival_policy:  config.arrival_policy,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId { self.id }
    pub fn colour(&self) -> RobotColour { self.colour }
    pub fn state(&self) -> RobotState { self.state }
    pub fn current_vertex(&self) -> VertexId { self.current_vertex }
    pub fn path(&self) -> &[VertexId] { &self.path }
    pub fn path_index(&self) -> usize { self.path_index }
    pub fn target_vertex(&self) -> Option<VertexId> { self.target_vertex }
    pub fn position(&self) -> Point { self.position }
    pub fn target_position(&self) -> Point { self.target_position }

    /// `true` while parked at a lane end waiting for the vertex (gated
    /// arrival).  Such a robot is `Waiting` but needs no lane.
    pub fn is_awaiting_vertex(&self) -> bool { self.awaiting_vertex }

    /// The next vertex on the path, if any remain.
    pub fn next_vertex(&self) -> Option<VertexId> {
        self.path.get(self.path_index + 1).copied()
    }

    /// Lane the robot believes it occupies: while `Moving`, or while parked
    /// at a lane end awaiting the vertex.
    ///
    /// This is the robot's own view.  If the conflict resolver revoked the
    /// lane, the store will disagree.
    pub fn held_lane(&self) -> Option<(VertexId, VertexId)> {
        let travelling = self.state == RobotState::Moving || self.awaiting_vertex;
        if !travelling {
            return None;
        }
        self.next_vertex().map(|next| (self.current_vertex, next))
    }

    /// Lane the robot needs next, if it is waiting on one.
    pub fn pending_lane(&self) -> Option<(VertexId, VertexId)> {
        if self.state != RobotState::Waiting || self.awaiting_vertex {
            return None;
        }
        self.next_vertex().map(|next| (self.current_vertex, next))
    }

    /// Human-readable status, e.g. `Robot 2: Moving to vertex 5`.
    pub fn status_line(&self) -> String {
        self.to_string()
    }

    // ── Task assignment ───────────────────────────────────────────────────

    /// Plan a path to `destination` and arm the state machine.
    ///
    /// Only accepted in `Idle` or `Completed`.  On acceptance the path,
    /// index and target are replaced and the state forced to `Idle`, so the
    /// robot starts moving on its next update.  A rejected assignment leaves
    /// the robot untouched.
    pub fn assign_task<R: Router>(
        &mut self,
        destination: VertexId,
        store:       &ReservationStore,
        router:      &R,
    ) -> RobotResult<Assignment> {
        if !self.state.accepts_task() {
            return Ok(Assignment::Busy(self.state));
        }
        let Some(path) = router.route(store.graph(), self.current_vertex, destination)? else {
            return Ok(Assignment::NoPath);
        };
        self.path = path.vertices;
        self.path_index = 0;
        self.target_vertex = Some(destination);
        self.state = RobotState::Idle;
        Ok(Assignment::Accepted)
    }

    // ── State machine ─────────────────────────────────────────────────────

    /// Run one state-machine step.
    ///
    /// `_delta_secs` is the nominal frame time.  It is accepted to match a
    /// real-time driver but motion always advances exactly `move_speed` per
    /// call.
    pub fn update(&mut self, store: &mut ReservationStore, _delta_secs: f32) -> RobotResult<StatusEvent> {
        let transition = match self.state {
            RobotState::Idle => {
                if store.graph().is_charger(self.current_vertex)? {
                    self.state = RobotState::Charging;
                    Some(Transition::StartedCharging)
                } else {
                    self.depart_or_finish(store)?
                }
            }
            RobotState::Charging => self.depart_or_finish(store)?,
            RobotState::Moving => self.advance(store)?,
            RobotState::Waiting => match self.next_vertex() {
                Some(next) if self.awaiting_vertex => self.arrive(store, next, true)?,
                Some(next) => self.try_depart(store, next, true)?,
                None => None,
            },
            RobotState::Completed => None,
        };

        Ok(StatusEvent {
            agent:  self.id,
            state:  self.state,
            vertex: self.current_vertex,
            transition,
        })
    }

    /// Idle/Charging branch: leave toward the next vertex, or finish a path
    /// that has no hops left.
    fn depart_or_finish(&mut self, store: &mut ReservationStore) -> RobotResult<Option<Transition>> {
        match self.next_vertex() {
            Some(next) => self.try_depart(store, next, false),
            None if self.target_vertex.is_some() && !self.path.is_empty() => {
                self.state = RobotState::Completed;
                Ok(Some(Transition::ReachedDestination))
            }
            None => Ok(None),
        }
    }

    fn try_depart(
        &mut self,
        store:    &mut ReservationStore,
        next:     VertexId,
        retrying: bool,
    ) -> RobotResult<Option<Transition>> {
        if store.reserve_lane(self.current_vertex, next, self.id)? {
            store.release_vertex(self.current_vertex, self.id)?;
            self.target_position = store.graph().position(next)?;
            self.state = RobotState::Moving;
            return Ok(Some(Transition::MovingTo(next)));
        }
        if retrying {
            // Busy-retry: no event until something changes.
            return Ok(None);
        }
        self.state = RobotState::Waiting;
        Ok(Some(Transition::WaitingForLane(next)))
    }

    fn advance(&mut self, store: &mut ReservationStore) -> RobotResult<Option<Transition>> {
        let Some(next) = self.next_vertex() else {
            return Ok(None);
        };
        match self.position.step_toward(self.target_position, self.move_speed) {
            Step::Advanced(p) => {
                self.position = p;
                Ok(None)
            }
            Step::Arrived => {
                self.position = self.target_position;
                self.arrive(store, next, false)
            }
        }
    }

    /// Complete the hop onto `next`.
    fn arrive(
        &mut self,
        store:    &mut ReservationStore,
        next:     VertexId,
        retrying: bool,
    ) -> RobotResult<Option<Transition>> {
        let reserved = store.reserve_vertex(next, self.id)?;
        if !reserved && self.arrival_policy == ArrivalPolicy::Gated {
            if retrying {
                return Ok(None);
            }
            self.state = RobotState::Waiting;
            self.awaiting_vertex = true;
            return Ok(Some(Transition::WaitingForVertex(next)));
        }

        let from = self.current_vertex;
        self.path_index += 1;
        store.release_lane(from, next, self.id)?;
        self.current_vertex = next;
        self.awaiting_vertex = false;

        if self.path_index + 1 == self.path.len() {
            self.state = RobotState::Completed;
            Ok(Some(Transition::ReachedDestination))
        } else {
            self.state = RobotState::Idle;
            Ok(Some(Transition::ArrivedAt(next)))
        }
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.id.0;
        let next = self.next_vertex().unwrap_or(self.current_vertex);
        match self.state {
            RobotState::Idle      => write!(f, "Robot {n}: Idle"),
            RobotState::Moving    => write!(f, "Robot {n}: Moving to vertex {next}"),
            RobotState::Waiting   => write!(f, "Robot {n}: Waiting to move to vertex {next}"),
            RobotState::Charging  => write!(f, "Robot {n}: Charging"),
            RobotState::Completed => write!(f, "Robot {n}: Task completed"),
        }
    }
}
