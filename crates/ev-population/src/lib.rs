//! `ev-population` — turns population records into seeded agents.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`record`]  | `PopulationRecord` — `(label, quantity, region)`           |
//! | [`loader`]  | CSV loader for population records                          |
//! | [`seeder`]  | `PopulationSeeder`, `SeedPlan`, `SeedGroup`                |
//! | [`error`]   | `PopulationError`, `PopulationResult<T>`                   |
//!
//! # Seeding rule
//!
//! For each record the seeder finds the node set `S` inside the region,
//! splits `quantity` agents into `K = min(quantity, |S|)` groups whose sizes
//! differ by at most one, and assigns every group a distinct node of `S`:
//! by index when `|S| <= quantity`, otherwise by seeded sampling without
//! replacement.  Records whose region holds no node are skipped.

pub mod error;
pub mod loader;
pub mod record;
pub mod seeder;

#[cfg(test)]
mod tests;

pub use error::{PopulationError, PopulationResult};
pub use loader::{load_records_csv, load_records_reader};
pub use record::PopulationRecord;
pub use seeder::{PopulationSeeder, SeedGroup, SeedPlan};
