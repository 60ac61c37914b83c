pub mod callback;
pub mod operators;
pub mod problem;
pub mod solvers;

pub use callback::{HistoryCallback, NoopCallback, RoundRecord};
pub use operators::SparkBatch;
pub use problem::{Evaluator, ObjectiveFn};
pub use solvers::{FireworksRun, LoTFWA, RoundOutcome};
pub use solvers::{
    OptimizationCallback, RoundReport, Solver, SolverResult, TimedResult, solve_timed,
};
