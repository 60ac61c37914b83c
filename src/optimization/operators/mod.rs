//! Per-round LoTFWA operators: explosion, guided mutation, elitist selection,
//! deadline-aware restart and amplitude control.

pub mod amplitude;
pub mod explosion;
pub mod mutation;
pub mod restart;
pub mod selection;

pub use amplitude::adapt_amplitude;
pub use explosion::{explode, map_into_bounds};
pub use mutation::{SparkBatch, guidance_vector, guided_mutation};
pub use restart::{restart_members, restart_slots, stagnation_mask};
pub use selection::select_best;

/// Minimum fitness drop that counts as an improvement
pub const IMPROVE_EPS: f64 = 1e-8;
