//! Loser-out tournament fireworks algorithm (LoTFWA) for bounded,
//! derivative-free minimization under a fixed evaluation budget.
//!
//! ```
//! use lotfwa::{FireworksConfig, LoTFWA, NoopCallback, ObjectiveFn, SearchSpace, Solver};
//!
//! let space = SearchSpace::uniform(3, -5.0, 5.0).unwrap();
//! let sphere = ObjectiveFn::new(|x: &[f64]| x.iter().map(|v| v * v).sum());
//!
//! let mut solver = LoTFWA::new(FireworksConfig::for_space(&space, 3_000))
//!     .unwrap()
//!     .with_seed(7);
//! let result = solver.solve(&space, &sphere, &mut NoopCallback).unwrap();
//! assert!(result.best_fitness < 1.0);
//! ```

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod core;
pub mod optimization;
#[cfg(feature = "python")]
mod optimizer;

pub use crate::core::*;
pub use crate::optimization::*;
#[cfg(feature = "python")]
pub use crate::optimizer::{OptimizationResult, Optimizer};

#[cfg(feature = "python")]
#[pymodule]
fn lotfwa(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Optimizer>()?;
    m.add_class::<OptimizationResult>()?;
    Ok(())
}
