//! Owned, read-only views of the whole fleet for renderers and exporters.
//!
//! A [`FleetSnapshot`] copies everything a frame needs, so the consumer never
//! borrows the store or the robots.

use fleet_core::{AgentId, LaneId, Point, RobotColour, Tick, VertexId};
use fleet_graph::ReservationStore;
use fleet_robot::{Robot, RobotState};

#[derive(Clone, Debug, PartialEq)]
pub struct VertexView {
    pub id:         VertexId,
    pub name:       String,
    pub position:   Point,
    pub is_charger: bool,
    pub occupant:   Option<AgentId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaneView {
    pub id:          LaneId,
    pub from:        VertexId,
    pub to:          VertexId,
    pub speed_limit: f32,
    pub occupant:    Option<AgentId>,
    pub is_blocked:  bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RobotView {
    pub id:             AgentId,
    pub colour:         RobotColour,
    pub state:          RobotState,
    pub current_vertex: VertexId,
    pub position:       Point,
    pub target_vertex:  Option<VertexId>,
    /// Vertices still ahead, current vertex excluded.
    pub remaining_path: Vec<VertexId>,
    /// The lane the robot believes it holds.  May disagree with the lane
    /// views after a deadlock override.
    pub held_lane:      Option<(VertexId, VertexId)>,
    pub status:         String,
}

impl RobotView {
    pub fn of(robot: &Robot) -> Self {
        let ahead = robot.path().get(robot.path_index() + 1..).unwrap_or(&[]);
        Self {
            id:             robot.id(),
            colour:         robot.colour(),
            state:          robot.state(),
            current_vertex: robot.current_vertex(),
            position:       robot.position(),
            target_vertex:  robot.target_vertex(),
            remaining_path: ahead.to_vec(),
            held_lane:      robot.held_lane(),
            status:         robot.status_line(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FleetSnapshot {
    pub tick:     Tick,
    pub vertices: Vec<VertexView>,
    pub lanes:    Vec<LaneView>,
    pub robots:   Vec<RobotView>,
    pub selected: Option<AgentId>,
}

impl FleetSnapshot {
    pub fn capture(
        tick:     Tick,
        store:    &ReservationStore,
        robots:   &[Robot],
        selected: Option<AgentId>,
    ) -> Self {
        let g = store.graph();
        let vertex_occ = store.vertex_occupancy();
        let lane_occ = store.lane_occupancy();
        let blocks = store.lane_blocks();

        let vertices = g
            .vertex_ids()
            .map(|v| {
                let i = v.index();
                VertexView {
                    id:         v,
                    name:       g.vertex_name[i].clone(),
                    position:   g.vertex_pos[i],
                    is_charger: g.vertex_is_charger[i],
                    occupant:   vertex_occ[i],
                }
            })
            .collect();

        let lanes = g
            .lane_ids()
            .map(|l| {
                let i = l.index();
                LaneView {
                    id:          l,
                    from:        g.lane_from[i],
                    to:          g.lane_to[i],
                    speed_limit: g.lane_speed_limit[i],
                    occupant:    lane_occ[i],
                    is_blocked:  blocks[i],
                }
            })
            .collect();

        Self {
            tick,
            vertices,
            lanes,
            robots: robots.iter().map(RobotView::of).collect(),
            selected,
        }
    }

    pub fn robot(&self, agent: AgentId) -> Option<&RobotView> {
        self.robots.iter().find(|r| r.id == agent)
    }

    pub fn occupied_vertices(&self) -> impl Iterator<Item = &VertexView> + '_ {
        self.vertices.iter().filter(|v| v.occupant.is_some())
    }

    pub fn occupied_lanes(&self) -> impl Iterator<Item = &LaneView> + '_ {
        self.lanes.iter().filter(|l| l.occupant.is_some())
    }
}
