use fleet_core::{FleetError, VertexId};
use fleet_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobotError {
    #[error("{0}")]
    Config(#[from] FleetError),

    #[error("cannot place robot on vertex {0}: vertex occupied")]
    VertexOccupied(VertexId),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type RobotResult<T> = Result<T, RobotError>;
