//! Structured fleet events for the logging collaborator.
//!
//! Each event renders as `[source] message`, the line format of the fleet
//! log.  The tick is supplied separately by the observer callback.

use std::fmt;

use fleet_core::{AgentId, VertexId};
use fleet_robot::{Assignment, StatusEvent};

/// Who an event is attributed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventSource {
    System,
    Robot(AgentId),
    TrafficManager,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::System         => f.write_str("system"),
            EventSource::Robot(id)      => write!(f, "{id}"),
            EventSource::TrafficManager => f.write_str("traffic_manager"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FleetEvent {
    Spawned { agent: AgentId, vertex: VertexId },
    /// Spawn refused because the vertex is occupied.
    SpawnRejected { vertex: VertexId },
    Selected { agent: AgentId },
    TaskAssigned { agent: AgentId, from: VertexId, to: VertexId },
    TaskRejected { agent: AgentId, to: VertexId, reason: Assignment },
    /// A robot update that produced a transition.
    Status(StatusEvent),
    /// The conflict resolver cleared `from → to`, held by `dispossessed`, so
    /// `prioritized` can proceed.
    DeadlockResolved {
        prioritized:  AgentId,
        dispossessed: AgentId,
        from:         VertexId,
        to:           VertexId,
    },
}

impl FleetEvent {
    pub fn source(&self) -> EventSource {
        match self {
            FleetEvent::SpawnRejected { .. } => EventSource::System,
            FleetEvent::DeadlockResolved { .. } => EventSource::TrafficManager,
            FleetEvent::Spawned { agent, .. }
            | FleetEvent::Selected { agent }
            | FleetEvent::TaskAssigned { agent, .. }
            | FleetEvent::TaskRejected { agent, .. } => EventSource::Robot(*agent),
            FleetEvent::Status(s) => EventSource::Robot(s.agent),
        }
    }

    /// The full `[source] message` log line.
    pub fn log_line(&self) -> String {
        format!("[{}] {}", self.source(), self)
    }
}

impl fmt::Display for FleetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetEvent::Spawned { vertex, .. } => write!(f, "Spawned at vertex {vertex}"),
            FleetEvent::SpawnRejected { vertex } => {
                write!(f, "Cannot spawn robot at vertex {vertex}: Vertex occupied")
            }
            FleetEvent::Selected { .. } => f.write_str("Selected for task assignment"),
            FleetEvent::TaskAssigned { from, to, .. } => {
                write!(f, "Assigned navigation task from vertex {from} to {to}")
            }
            FleetEvent::TaskRejected { to, reason, .. } => {
                write!(f, "Failed to assign navigation task to vertex {to}")?;
                match reason {
                    Assignment::Busy(state) => write!(f, " (robot is {state})"),
                    Assignment::NoPath      => f.write_str(" (no path)"),
                    Assignment::Accepted    => Ok(()),
                }
            }
            FleetEvent::Status(s) => match s.transition {
                Some(t) => write!(f, "State: {}, Event: {t}", s.state),
                None    => write!(f, "State: {}", s.state),
            },
            FleetEvent::DeadlockResolved { prioritized, dispossessed, .. } => write!(
                f,
                "Resolving deadlock: Prioritizing robot {} over robot {}",
                prioritized.0, dispossessed.0
            ),
        }
    }
}
