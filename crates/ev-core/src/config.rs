//! Run configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and handed to the simulation builder.

use crate::SimClock;

/// Free-flow walking speed [m/s].
pub const MAX_SPEED: f64 = 1.66;
/// Maximum pedestrian density [ped/m²].
pub const MAX_DENSITY: f64 = 5.4;
/// Maximum specific flow [ped/(m·s)].
pub const MAX_CAPACITY: f64 = 1.33;

// ── LinkParams ────────────────────────────────────────────────────────────────

/// Constants of the density–velocity model shared by every link.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkParams {
    pub max_speed:    f64,
    pub max_density:  f64,
    pub max_capacity: f64,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            max_speed:    MAX_SPEED,
            max_density:  MAX_DENSITY,
            max_capacity: MAX_CAPACITY,
        }
    }
}

impl LinkParams {
    /// `true` when every constant is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.max_speed, self.max_density, self.max_capacity]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// Free-flow travel time over `length_m` metres.
    #[inline]
    pub fn free_flow_secs(&self, length_m: f64) -> f64 {
        length_m / self.max_speed
    }
}

// ── RoutePolicy ───────────────────────────────────────────────────────────────

/// When agent routes are (re)computed as edge costs drift.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum RoutePolicy {
    /// Compute once on first need; keep it for the rest of the run.
    #[default]
    Once,
    /// Recompute every time the agent is considered for admission at a node.
    AtEveryNode,
    /// Recompute every active agent's route every `every_steps` steps.
    Periodic { every_steps: u64 },
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per step (`T`).
    pub step_secs: f64,

    /// Optional horizon in simulated seconds (`ST`).  `None` runs until every
    /// agent is evacuated or dead.
    pub horizon_secs: Option<f64>,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit per-edge and per-agent snapshots every N steps.  0 disables them.
    pub snapshot_interval_steps: u64,

    /// Route refresh policy.
    pub route_policy: RoutePolicy,

    /// Density–velocity constants applied to every link.
    pub link_params: LinkParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_secs:               1.0,
            horizon_secs:            None,
            seed:                    0,
            snapshot_interval_steps: 1,
            route_policy:            RoutePolicy::Once,
            link_params:             LinkParams::default(),
        }
    }
}

impl SimConfig {
    /// The step count at which a horizon-bounded run stops (`k >= ST / T`).
    pub fn horizon_steps(&self) -> Option<u64> {
        self.horizon_secs.map(|st| self.make_clock().steps_for_secs(st))
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.step_secs)
    }

    /// Describe the first invalid setting, if any.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.step_secs.is_finite() && self.step_secs > 0.0) {
            return Err(format!("step_secs must be positive, got {}", self.step_secs));
        }
        if let Some(st) = self.horizon_secs {
            if !(st.is_finite() && st > 0.0) {
                return Err(format!("horizon_secs must be positive, got {st}"));
            }
        }
        if let RoutePolicy::Periodic { every_steps: 0 } = self.route_policy {
            return Err("periodic route refresh needs every_steps > 0".into());
        }
        if !self.link_params.is_valid() {
            return Err(format!("link parameters must be positive: {:?}", self.link_params));
        }
        Ok(())
    }
}
