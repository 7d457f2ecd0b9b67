//! `ev-agent` — Structure-of-Arrays pedestrian storage for the evacuation
//! flow engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`phase`]   | `AgentPhase` lifecycle state machine                      |
//! | [`store`]   | `AgentStore` (SoA arrays), `PhaseCounts`                  |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                            |
//!
//! Movement state (route, link, position) lives in `ev-mobility`; this crate
//! only knows who each pedestrian is and where they are in their lifecycle.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.     |

pub mod error;
pub mod phase;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{AgentError, AgentResult};
pub use phase::AgentPhase;
pub use store::{AgentStore, PhaseCounts};
