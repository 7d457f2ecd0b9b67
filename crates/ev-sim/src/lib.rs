//! `ev-sim` — step loop orchestrator for the evacuation flow engine.
//!
//! # Step loop
//!
//! ```text
//! until terminated:
//!   ⓪ Hazard    — externally signalled deaths; periodic batch reroute.
//!   ① Advance   — every node with residents admits at most one agent onto
//!                 its chosen outgoing link (costs from the previous step).
//!   ② Update    — occupied or still-congested links recompute velocity and
//!                 travel time; the new times become edge costs.
//!   ③ Release   — every link discharges agents whose travel time elapsed;
//!                 each lands on the next node and immediately tries ① there.
//!   ④ Kinematics— interpolate in-transit positions (telemetry only).
//!   k += 1
//! ```
//!
//! Phase order is fixed: swapping ① and ② changes results.
//!
//! # Termination
//!
//! With a horizon `ST`, the run stops once `k >= ceil(ST / T)`.  Without
//! one, it stops when every agent is evacuated or dead; [`Sim::run`] refuses
//! to start an unbounded run while any active agent has no reachable
//! destination.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Runs phase ② and batched rerouting on Rayon's thread pool.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ev_core::SimConfig;
//! use ev_sim::{NoopObserver, SimBuilder};
//! use ev_spatial::DijkstraRouter;
//!
//! let mut sim = SimBuilder::new(config, network, DijkstraRouter)
//!     .population(records)
//!     .build()?;
//! sim.assign_destinations(|_, _| Some(shelter));
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod hazard;
pub mod observer;
pub mod sim;
pub mod summary;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use hazard::{HazardModel, NoHazard, ScheduledDeaths};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use summary::StepSummary;
