//! `ev-spatial` — street network, region queries, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `StreetNetwork` (CSR + R-tree), `StreetNetworkBuilder`      |
//! | [`region`]  | `Polygon`, `Region` — point-in-polygon membership           |
//! | [`costs`]   | `EdgeCosts` — current travel time of every edge             |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                   |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | `Router::route_many` fans out over Rayon.                 |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |

pub mod costs;
pub mod error;
pub mod network;
pub mod region;
pub mod router;

#[cfg(test)]
mod tests;

pub use costs::EdgeCosts;
pub use error::{SpatialError, SpatialResult};
pub use network::{StreetNetwork, StreetNetworkBuilder};
pub use region::{Polygon, Region};
pub use router::{DijkstraRouter, Route, Router};
