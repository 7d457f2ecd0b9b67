//! Spatial-subsystem error type.

use thiserror::Error;

use ev_core::{EdgeId, NodeId};

/// Errors produced by `ev-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("configuration error: route requested from {from} without a destination")]
    NoDestination { from: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge {edge} from {from} to {to}: {reason}")]
    InvalidEdge {
        edge:   EdgeId,
        from:   NodeId,
        to:     NodeId,
        reason: &'static str,
    },

    #[error("invalid region: {0}")]
    InvalidRegion(String),
}

impl SpatialError {
    /// `true` for errors caused by caller configuration rather than topology.
    pub fn is_config(&self) -> bool {
        matches!(self, SpatialError::NoDestination { .. })
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
