//! The conflict resolver.
//!
//! # Override policy
//!
//! Once per tick, after every robot has moved, the resolver may clear one
//! lane reservation to let a waiting robot through.  The default
//! [`FirstWaitingOverride`] takes the first `Waiting` robot in registry order
//! and, if the lane it needs is held by a different robot, revokes that lane.
//!
//! The dispossessed robot is not told.  It keeps moving along a lane the
//! store reports as free (or as held by the prioritised robot once that one
//! departs), so robot and store disagree about that lane until the
//! dispossessed robot arrives.  The override guarantees forward progress
//! for one robot per tick, not deadlock freedom.
//!
//! A robot parked at a lane end waiting for a vertex (gated arrival) needs
//! no lane and never triggers a revocation.

use fleet_core::{AgentId, Tick, VertexId};
use fleet_graph::{GraphResult, Path, ReservationStore};
use fleet_robot::{Robot, RobotState};

use crate::event::FleetEvent;
use crate::observer::FleetObserver;
use crate::SimResult;

// ── ConflictPolicy ────────────────────────────────────────────────────────────

/// A decision to revoke lane `from → to` in favour of `prioritized`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneOverride {
    pub prioritized: AgentId,
    pub from:        VertexId,
    pub to:          VertexId,
}

/// Chooses at most one lane reservation to override per tick.
pub trait ConflictPolicy: Send + Sync {
    fn choose(&self, robots: &[Robot], store: &ReservationStore) -> GraphResult<Option<LaneOverride>>;
}

/// Prioritise the first waiting robot in registry order.
///
/// There is no wait-duration tracking: "first" means lowest registry index,
/// not longest waiting.
#[derive(Copy, Clone, Debug, Default)]
pub struct FirstWaitingOverride;

impl ConflictPolicy for FirstWaitingOverride {
    fn choose(&self, robots: &[Robot], store: &ReservationStore) -> GraphResult<Option<LaneOverride>> {
        let Some(first) = robots.iter().find(|r| r.state() == RobotState::Waiting) else {
            return Ok(None);
        };
        let Some((from, to)) = first.pending_lane() else {
            return Ok(None);
        };
        match store.lane_occupant(from, to)? {
            Some(holder) if holder != first.id() => Ok(Some(LaneOverride {
                prioritized: first.id(),
                from,
                to,
            })),
            _ => Ok(None),
        }
    }
}

// ── LaneStatus ────────────────────────────────────────────────────────────────

/// Point-in-time view of one lane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneStatus {
    pub from:           VertexId,
    pub to:             VertexId,
    pub is_blocked:     bool,
    pub occupant:       Option<AgentId>,
    /// State of the occupant, if it is a registered robot.
    pub occupant_state: Option<RobotState>,
}

// ── TrafficManager ────────────────────────────────────────────────────────────

pub struct TrafficManager<P: ConflictPolicy> {
    policy: P,
}

impl Default for TrafficManager<FirstWaitingOverride> {
    fn default() -> Self {
        Self::new(FirstWaitingOverride)
    }
}

impl<P: ConflictPolicy> TrafficManager<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Vertices along `path` where `agent` would currently run into another
    /// robot: the lane into the vertex is held by someone else, or the
    /// vertex itself is.
    ///
    /// Each hop contributes its end vertex at most once.  Diagnostic only;
    /// nothing in the tick loop consults it.
    pub fn detect_path_conflicts(
        &self,
        agent: AgentId,
        path:  &Path,
        store: &ReservationStore,
    ) -> GraphResult<Vec<VertexId>> {
        let foreign = |occupant: Option<AgentId>| occupant.is_some_and(|o| o != agent);
        let mut conflicts = Vec::new();
        for (from, to) in path.hops() {
            let lane_taken = match store.graph().lane_between(from, to)? {
                Some(lane) => foreign(store.lane_occupancy()[lane.index()]),
                None => false,
            };
            if lane_taken || foreign(store.vertex_occupant(to)?) {
                conflicts.push(to);
            }
        }
        Ok(conflicts)
    }

    /// Apply the policy once.  Returns the number of reservations overridden
    /// (0 or 1).
    pub fn resolve_one_deadlock<O: FleetObserver>(
        &self,
        robots:   &[Robot],
        store:    &mut ReservationStore,
        tick:     Tick,
        observer: &mut O,
    ) -> SimResult<usize> {
        let Some(choice) = self.policy.choose(robots, store)? else {
            return Ok(0);
        };
        let Some(dispossessed) = store.revoke_lane(choice.from, choice.to)? else {
            return Ok(0);
        };
        observer.on_event(tick, &FleetEvent::DeadlockResolved {
            prioritized: choice.prioritized,
            dispossessed,
            from: choice.from,
            to: choice.to,
        });
        Ok(1)
    }

    /// Status of lane `from → to`; `Ok(None)` if the vertices exist but no
    /// such lane does.
    pub fn lane_status(
        &self,
        from:   VertexId,
        to:     VertexId,
        robots: &[Robot],
        store:  &ReservationStore,
    ) -> GraphResult<Option<LaneStatus>> {
        let Some(lane) = store.graph().lane_between(from, to)? else {
            return Ok(None);
        };
        let occupant = store.lane_occupancy()[lane.index()];
        let occupant_state = occupant
            .and_then(|a| robots.iter().find(|r| r.id() == a))
            .map(Robot::state);
        Ok(Some(LaneStatus {
            from,
            to,
            is_blocked: store.lane_blocks()[lane.index()],
            occupant,
            occupant_state,
        }))
    }
}
