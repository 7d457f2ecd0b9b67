//! `ev-core` — foundational types for the evacuation flow engine.
//!
//! This crate is a dependency of every other `ev-*` crate.  It has no `ev-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`, `EdgeId`                             |
//! | [`geo`]     | planar `Point`, linear interpolation                      |
//! | [`time`]    | `Tick`, `SimClock` (logical clock `k·T`)                  |
//! | [`config`]  | `SimConfig`, `RoutePolicy`, `LinkParams`, flow constants  |
//! | [`rng`]     | `SimRng` (seeded, reproducible)                           |
//! | [`kind`]    | `AgentKind` category tag                                  |
//! | [`road`]    | `RoadClass` and its street width lookup                   |
//! | [`error`]   | `EvError`, `EvResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod road;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EvError, EvResult};
pub use geo::Point;
pub use ids::{AgentId, EdgeId, NodeId};
pub use kind::AgentKind;
pub use rng::SimRng;
pub use road::RoadClass;
pub use config::{LinkParams, RoutePolicy, SimConfig, MAX_CAPACITY, MAX_DENSITY, MAX_SPEED};
pub use time::{SimClock, Tick};
