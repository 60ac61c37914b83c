mod lotfwa;
pub mod traits;

pub use lotfwa::{FireworksRun, LoTFWA, RoundOutcome};
pub use traits::{
    OptimizationCallback, RoundReport, Solver, SolverResult, TimedResult, solve_timed,
};
