use fleet_core::{AgentId, FleetError};
use fleet_graph::GraphError;
use fleet_robot::RobotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("{0}")]
    Config(#[from] FleetError),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("fleet is full: no agent id left for robot number {0}")]
    FleetFull(usize),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("robot error: {0}")]
    Robot(#[from] RobotError),
}

pub type SimResult<T> = Result<T, SimError>;
