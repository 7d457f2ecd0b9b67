//! `ev-mobility` — link queues, link selection, and agent movement.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`link`]    | `Link` — capacity/flow/velocity model with a bounded FIFO queue   |
//! | [`state`]   | `MovementState` — per-agent route position and interpolated `pos` |
//! | [`store`]   | `MobilityStore` — states, links, edge costs, node resident FIFOs  |
//! | [`engine`]  | `MobilityEngine<R>` — routing, admission, release, kinematics     |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                              |
//!
//! # Movement model (queued links)
//!
//! Every directed edge owns one [`Link`].  An agent waiting at a node is
//! admitted onto the cheapest outgoing link toward its next route node if the
//! link has room; it then stays queued until its travel time (frozen at
//! admission) has elapsed on the simulated clock and the link's discharge
//! limit for the step allows it out.  Released agents land in the target
//! node's resident FIFO, or are evacuated if that node is their destination.
//!
//! Positions are interpolated along the occupied link for telemetry only;
//! they never drive transitions.

pub mod engine;
pub mod error;
pub mod link;
pub mod state;
pub mod store;


pub use engine::{MobilityEngine, NodeOutcome};
pub use error::{MobilityError, MobilityResult};
pub use link::{Admission, Link, QueueEntry};
pub use state::MovementState;
pub use store::{EdgeState, MobilityStore, RouteStats};
