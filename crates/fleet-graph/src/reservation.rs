//! The `ReservationStore` — exclusive vertex and lane occupancy.
//!
//! # Invariants
//!
//! - At most one agent occupies a vertex.
//! - At most one agent occupies a lane.
//!
//! Both are check-then-set operations.  They hold because the store is the
//! sole owner of the occupancy arrays and every mutation takes `&mut self`;
//! callers cannot interleave a check and a set from two places at once.
//!
//! [`revoke_lane`](ReservationStore::revoke_lane) is the one operation that
//! clears a reservation without the owner's consent.  It exists for the
//! conflict resolver and nothing else should call it.

use fleet_core::{AgentId, LaneId, VertexId};

use crate::network::NavGraph;
use crate::router::{BfsRouter, Path, Router};
use crate::{GraphError, GraphResult};

/// Navigation graph plus mutable occupancy.
pub struct ReservationStore {
    graph: NavGraph,

    /// Occupant of each vertex, indexed by `VertexId`.
    vertex_occupant: Vec<Option<AgentId>>,

    /// Occupant of each lane, indexed by `LaneId`.
    lane_occupant: Vec<Option<AgentId>>,

    /// Manual block flag, independent of occupancy.
    lane_blocked: Vec<bool>,
}

impl ReservationStore {
    /// Wrap `graph` with every vertex and lane free.
    pub fn new(graph: NavGraph) -> Self {
        Self {
            vertex_occupant: vec![None; graph.vertex_count()],
            lane_occupant:   vec![None; graph.lane_count()],
            lane_blocked:    vec![false; graph.lane_count()],
            graph,
        }
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    /// Minimum-hop path ignoring occupancy and blocks.  See [`BfsRouter`].
    pub fn shortest_path(&self, from: VertexId, to: VertexId) -> GraphResult<Option<Path>> {
        BfsRouter.route(&self.graph, from, to)
    }

    // ── Vertices ──────────────────────────────────────────────────────────

    /// Claim `v` for `agent` if nobody holds it.
    ///
    /// `Ok(false)` leaves the store untouched — including when `agent`
    /// already holds `v`.
    pub fn reserve_vertex(&mut self, v: VertexId, agent: AgentId) -> GraphResult<bool> {
        self.graph.check_vertex(v)?;
        let slot = &mut self.vertex_occupant[v.index()];
        if slot.is_some() {
            return Ok(false);
        }
        *slot = Some(agent);
        Ok(true)
    }

    /// Free `v` if `agent` holds it.  Returns whether anything changed.
    pub fn release_vertex(&mut self, v: VertexId, agent: AgentId) -> GraphResult<bool> {
        self.graph.check_vertex(v)?;
        let slot = &mut self.vertex_occupant[v.index()];
        if *slot == Some(agent) {
            *slot = None;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn vertex_occupant(&self, v: VertexId) -> GraphResult<Option<AgentId>> {
        self.graph.check_vertex(v)?;
        Ok(self.vertex_occupant[v.index()])
    }

    // ── Lanes ─────────────────────────────────────────────────────────────

    /// Claim lane `from → to` for `agent`.
    ///
    /// `Ok(false)` if no such lane exists, it is occupied, or it is manually
    /// blocked.  The occupancy of `to` is not consulted.
    pub fn reserve_lane(&mut self, from: VertexId, to: VertexId, agent: AgentId) -> GraphResult<bool> {
        let Some(lane) = self.graph.lane_between(from, to)? else {
            return Ok(false);
        };
        let i = lane.index();
        if self.lane_occupant[i].is_some() || self.lane_blocked[i] {
            return Ok(false);
        }
        self.lane_occupant[i] = Some(agent);
        Ok(true)
    }

    /// Free lane `from → to` if `agent` holds it.  Returns whether anything
    /// changed; a missing lane is a no-op.
    pub fn release_lane(&mut self, from: VertexId, to: VertexId, agent: AgentId) -> GraphResult<bool> {
        let Some(lane) = self.graph.lane_between(from, to)? else {
            return Ok(false);
        };
        let slot = &mut self.lane_occupant[lane.index()];
        if *slot == Some(agent) {
            *slot = None;
            return Ok(true);
        }
        Ok(false)
    }

    /// Clear lane `from → to` whoever holds it, returning the dispossessed
    /// agent.  The owner is not told.
    pub fn revoke_lane(&mut self, from: VertexId, to: VertexId) -> GraphResult<Option<AgentId>> {
        let lane = self.require_lane(from, to)?;
        Ok(self.lane_occupant[lane.index()].take())
    }

    /// Set or clear the manual block on lane `from → to`.
    ///
    /// Blocking does not evict a current occupant; it only refuses new
    /// reservations.
    pub fn set_lane_blocked(&mut self, from: VertexId, to: VertexId, blocked: bool) -> GraphResult<()> {
        let lane = self.require_lane(from, to)?;
        self.lane_blocked[lane.index()] = blocked;
        Ok(())
    }

    pub fn lane_occupant(&self, from: VertexId, to: VertexId) -> GraphResult<Option<AgentId>> {
        let lane = self.require_lane(from, to)?;
        Ok(self.lane_occupant[lane.index()])
    }

    pub fn is_lane_blocked(&self, from: VertexId, to: VertexId) -> GraphResult<bool> {
        let lane = self.require_lane(from, to)?;
        Ok(self.lane_blocked[lane.index()])
    }

    // ── Bulk read access (snapshots, output) ──────────────────────────────

    /// Occupants indexed by `VertexId`.
    pub fn vertex_occupancy(&self) -> &[Option<AgentId>] {
        &self.vertex_occupant
    }

    /// Occupants indexed by `LaneId`.
    pub fn lane_occupancy(&self) -> &[Option<AgentId>] {
        &self.lane_occupant
    }

    /// Block flags indexed by `LaneId`.
    pub fn lane_blocks(&self) -> &[bool] {
        &self.lane_blocked
    }

    pub fn occupied_vertex_count(&self) -> usize {
        self.vertex_occupant.iter().filter(|o| o.is_some()).count()
    }

    pub fn occupied_lane_count(&self) -> usize {
        self.lane_occupant.iter().filter(|o| o.is_some()).count()
    }

    fn require_lane(&self, from: VertexId, to: VertexId) -> GraphResult<LaneId> {
        self.graph
            .lane_between(from, to)?
            .ok_or(GraphError::LaneNotFound { from, to })
    }
}
