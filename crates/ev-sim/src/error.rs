use ev_core::AgentId;
use ev_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// An unbounded run would never terminate.
    #[error("no horizon set and {count} agent(s) cannot reach a destination (first: {first})")]
    Unbounded { count: usize, first: AgentId },

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
