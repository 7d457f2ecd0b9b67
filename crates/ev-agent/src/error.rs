use thiserror::Error;

use ev_core::AgentId;

use crate::AgentPhase;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} not found")]
    NotFound(AgentId),

    #[error("agent {agent}: illegal transition {from} -> {to}")]
    IllegalTransition {
        agent: AgentId,
        from:  AgentPhase,
        to:    AgentPhase,
    },
}

pub type AgentResult<T> = Result<T, AgentError>;
