//! Plain data row types written by output backends.

use fleet_robot::{Robot, RobotState};
use fleet_sim::TickSummary;

/// One robot at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotSnapshotRow {
    pub tick:      u64,
    pub robot_id:  u32,
    pub state:     RobotState,
    /// The vertex the robot is at, or departed from while travelling.
    pub vertex:    u32,
    pub x:         f32,
    pub y:         f32,
    /// The lane the robot believes it holds; `None` while parked.
    pub lane_from: Option<u32>,
    pub lane_to:   Option<u32>,
}

impl RobotSnapshotRow {
    pub fn of(tick: u64, robot: &Robot) -> Self {
        let lane = robot.held_lane();
        let pos = robot.position();
        Self {
            tick,
            robot_id:  robot.id().0,
            state:     robot.state(),
            vertex:    robot.current_vertex().0,
            x:         pos.x,
            y:         pos.y,
            lane_from: lane.map(|(from, _)| from.0),
            lane_to:   lane.map(|(_, to)| to.0),
        }
    }
}

/// Fleet counts for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:               u64,
    pub moving:             u64,
    pub waiting:            u64,
    pub completed:          u64,
    pub deadlocks_resolved: u64,
}

impl TickSummaryRow {
    pub fn of(tick: u64, summary: &TickSummary) -> Self {
        Self {
            tick,
            moving:             summary.moving as u64,
            waiting:            summary.waiting as u64,
            completed:          summary.completed as u64,
            deadlocks_resolved: summary.deadlocks_resolved as u64,
        }
    }
}
