//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `EvError` where they need
//! to surface a core failure.

use thiserror::Error;

use crate::{AgentId, NodeId};

/// The top-level error type for `ev-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EvError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ev-core`.
pub type EvResult<T> = Result<T, EvError>;
