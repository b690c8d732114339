use thiserror::Error;

use super::NodeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid topology: edge {from} -> {to} references unregistered node {missing}")]
    InvalidTopology {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("Node ID already exists: {0}")]
    DuplicateNode(NodeId),

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("No edge from {from} to {to}")]
    NoSuchEdge { from: NodeId, to: NodeId },

    #[error("Edge {from} -> {to} has no vehicle to release")]
    OccupancyUnderflow { from: NodeId, to: NodeId },
}
