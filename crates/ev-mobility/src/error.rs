use ev_agent::AgentError;
use ev_core::{AgentId, NodeId};
use ev_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("configuration error: agent {0} has no destination")]
    NoDestination(AgentId),

    #[error("agent {0} has not been placed on the network")]
    NotPlaced(AgentId),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl MobilityError {
    /// `true` for errors caused by caller configuration rather than topology.
    pub fn is_config(&self) -> bool {
        match self {
            MobilityError::NoDestination(_) => true,
            MobilityError::Routing(e)       => e.is_config(),
            _                               => false,
        }
    }
}

pub type MobilityResult<T> = Result<T, MobilityError>;
