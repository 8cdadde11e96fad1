//! Graph-subsystem error type.

use thiserror::Error;

use fleet_core::VertexId;

/// Errors produced by `fleet-graph`.
///
/// Occupied or blocked resources are *not* errors — reserve calls report them
/// as `Ok(false)`.  These variants cover ids that do not exist and documents
/// that cannot be loaded.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {0} not found in graph")]
    VertexNotFound(VertexId),

    #[error("no lane from vertex {from} to vertex {to}")]
    LaneNotFound { from: VertexId, to: VertexId },

    #[error("graph document has no levels")]
    NoLevels,

    #[error("level {0:?} not found in graph document")]
    LevelNotFound(String),

    #[error("level {level:?}: {reason}")]
    MalformedLevel { level: String, reason: String },

    #[error("level {level:?}: malformed vertex #{index}: {reason}")]
    MalformedVertex { level: String, index: usize, reason: String },

    #[error("level {level:?}: malformed lane #{index}: {reason}")]
    MalformedLane { level: String, index: usize, reason: String },

    #[error("malformed graph document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
