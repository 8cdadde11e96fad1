//! Robot states and the events a state-machine step produces.

use std::fmt;

use fleet_core::{AgentId, VertexId};

/// Motion state of a robot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RobotState {
    /// Parked on a vertex; re-evaluates its path every tick.
    #[default]
    Idle,
    /// Travelling along a reserved lane.
    Moving,
    /// Blocked on a lane reservation (or, under the gated arrival policy, on
    /// the vertex at the end of its lane).  Retries every tick.
    Waiting,
    /// Parked on a charger.  Leaves on the next tick if a path is pending.
    Charging,
    /// At the end of its path.  Only a new task moves it again.
    Completed,
}

impl RobotState {
    /// Lower-case label used in log lines and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            RobotState::Idle      => "idle",
            RobotState::Moving    => "moving",
            RobotState::Waiting   => "waiting",
            RobotState::Charging  => "charging",
            RobotState::Completed => "completed",
        }
    }

    /// `true` for states in which `assign_task` is accepted.
    #[inline]
    pub fn accepts_task(self) -> bool {
        matches!(self, RobotState::Idle | RobotState::Completed)
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened during one `update`, if anything worth logging.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    StartedCharging,
    /// Lane reserved; departing toward the vertex.
    MovingTo(VertexId),
    /// Lane to the vertex is occupied or blocked.
    WaitingForLane(VertexId),
    /// Reached the end of a lane and the vertex there is held by another
    /// robot (gated arrival only).
    WaitingForVertex(VertexId),
    /// Reached an intermediate path vertex.
    ArrivedAt(VertexId),
    ReachedDestination,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::StartedCharging     => f.write_str("started_charging"),
            Transition::MovingTo(v)         => write!(f, "moving_to_{v}"),
            Transition::WaitingForLane(v)   => write!(f, "waiting_for_lane_to_{v}"),
            Transition::WaitingForVertex(v) => write!(f, "waiting_for_vertex_{v}"),
            Transition::ArrivedAt(v)        => write!(f, "arrived_at_{v}"),
            Transition::ReachedDestination  => f.write_str("reached_destination"),
        }
    }
}

/// Result of one `Robot::update` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatusEvent {
    pub agent:      AgentId,
    /// State after the step.
    pub state:      RobotState,
    /// Vertex the robot considers itself at after the step.
    pub vertex:     VertexId,
    pub transition: Option<Transition>,
}

/// Outcome of `Robot::assign_task`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Assignment {
    /// Path planned; the robot starts on its next update.
    Accepted,
    /// The robot is mid-task or charging.
    Busy(RobotState),
    /// The destination is unreachable from the robot's vertex.
    NoPath,
}

impl Assignment {
    #[inline]
    pub fn is_accepted(self) -> bool {
        matches!(self, Assignment::Accepted)
    }
}
