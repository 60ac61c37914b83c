use crate::core::{Population, Result, SearchSpace};
use crate::optimization::problem::Evaluator;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub best_fitness: f64,
    pub best_position: Vec<f64>,
    pub iterations: usize,
    /// Evaluations charged against the budget (rounds only)
    pub num_eval: usize,
    /// Every evaluation issued, initial population included
    pub cost_evals: usize,
    pub restarts: usize,
}

impl SolverResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Snapshot handed to callbacks once a round is finalized
#[derive(Debug)]
pub struct RoundReport<'a> {
    pub iteration: usize,
    pub num_eval: usize,
    pub best_fitness: f64,
    pub best_position: &'a [f64],
    pub restarted: &'a [usize],
    pub population: &'a Population,
}

/// Callback interface for optimization progress
pub trait OptimizationCallback {
    /// Called after every round; an error aborts the run
    fn on_round(&mut self, report: &RoundReport<'_>) -> std::result::Result<(), String>;

    /// Check if optimization should stop early (only consulted between rounds)
    fn should_stop(&self) -> bool {
        false
    }
}

/// Solver interface - takes a domain, an evaluator and a callback
pub trait Solver {
    fn name(&self) -> &str;

    fn solve(
        &mut self,
        space: &SearchSpace,
        evaluator: &dyn Evaluator,
        callback: &mut dyn OptimizationCallback,
    ) -> Result<SolverResult>;
}

/// Solver output together with the wall time it took
#[derive(Clone, Debug)]
pub struct TimedResult {
    pub result: SolverResult,
    pub elapsed: Duration,
}

/// Run a solver under a wall clock. Timing stays out of the solver itself.
pub fn solve_timed<S: Solver + ?Sized>(
    solver: &mut S,
    space: &SearchSpace,
    evaluator: &dyn Evaluator,
    callback: &mut dyn OptimizationCallback,
) -> Result<TimedResult> {
    let begin = Instant::now();
    let result = solver.solve(space, evaluator, callback)?;
    Ok(TimedResult {
        result,
        elapsed: begin.elapsed(),
    })
}
