//! Python-facing optimizer (feature `python`)

use crate::core::{FireworksConfig, FireworksError, SearchSpace};
use crate::optimization::{Evaluator, HistoryCallback, LoTFWA, solve_timed};
use pyo3::exceptions::{PyKeyboardInterrupt, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::cell::RefCell;

fn to_py_err(err: FireworksError) -> PyErr {
    match err {
        FireworksError::InvalidConfig(_) | FireworksError::InvalidSearchSpace(_) => {
            PyValueError::new_err(err.to_string())
        }
        FireworksError::Interrupted(_) => PyKeyboardInterrupt::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Another subscriber may already be installed by the host process
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Wraps a Python callable `f(list[float]) -> float`.
///
/// The first Python exception raised while scoring (a pending Ctrl+C
/// included) is kept so it can be re-raised unchanged once the solver returns.
struct PyObjective {
    objective: PyObject,
    raised: RefCell<Option<PyErr>>,
}

impl PyObjective {
    fn new(objective: PyObject) -> Self {
        Self {
            objective,
            raised: RefCell::new(None),
        }
    }

    fn keep(&self, err: PyErr) -> String {
        let message = err.to_string();
        self.raised.borrow_mut().get_or_insert(err);
        message
    }

    fn take_raised(&self) -> Option<PyErr> {
        self.raised.borrow_mut().take()
    }
}

impl Evaluator for PyObjective {
    fn evaluate(&self, positions: &[Vec<f64>]) -> std::result::Result<Vec<f64>, String> {
        Python::with_gil(|py| {
            py.check_signals().map_err(|e| self.keep(e))?;

            positions
                .iter()
                .map(|p| {
                    self.objective
                        .call1(py, (p.clone(),))
                        .and_then(|value| value.bind(py).extract::<f64>())
                        .map_err(|e| self.keep(e))
                })
                .collect()
        })
    }
}

#[pyclass]
#[derive(Clone, Debug)]
pub struct OptimizationResult {
    #[pyo3(get)]
    pub best_fitness: f64,
    #[pyo3(get)]
    pub best_position: Vec<f64>,
    #[pyo3(get)]
    pub iterations: usize,
    #[pyo3(get)]
    pub num_eval: usize,
    #[pyo3(get)]
    pub cost_evals: usize,
    #[pyo3(get)]
    pub restarts: usize,
    #[pyo3(get)]
    pub elapsed_secs: f64,
}

#[pymethods]
impl OptimizationResult {
    fn __repr__(&self) -> String {
        format!(
            "OptimizationResult(best_fitness={:.6e}, iterations={}, num_eval={}, \
             elapsed_secs={:.3})",
            self.best_fitness,
            self.iterations,
            self.num_eval,
            self.elapsed_secs
        )
    }
}

#[pyclass]
pub struct Optimizer {
    #[pyo3(get, set)]
    pub max_eval: usize,
    #[pyo3(get, set)]
    pub fw_size: usize,
    #[pyo3(get, set)]
    pub sp_size: usize,
    #[pyo3(get, set)]
    pub init_amp: f64,
    #[pyo3(get, set)]
    pub gm_ratio: f64,
    #[pyo3(get, set)]
    pub seed: Option<u64>,
    #[pyo3(get, set)]
    pub verbose: bool,
}

#[pymethods]
impl Optimizer {
    #[new]
    #[pyo3(signature = (
        max_eval,
        fw_size=5,
        sp_size=300,
        init_amp=200.0,
        gm_ratio=0.2,
        seed=None,
        verbose=false
    ))]
    fn new(
        max_eval: usize,
        fw_size: usize,
        sp_size: usize,
        init_amp: f64,
        gm_ratio: f64,
        seed: Option<u64>,
        verbose: bool,
    ) -> Self {
        Self {
            max_eval,
            fw_size,
            sp_size,
            init_amp,
            gm_ratio,
            seed,
            verbose,
        }
    }

    /// Minimize `objective` over the box [lower, upper]
    fn optimize(
        &self,
        objective: PyObject,
        lower: Vec<f64>,
        upper: Vec<f64>,
        py: Python,
    ) -> PyResult<Py<OptimizationResult>> {
        if self.verbose {
            init_logging();
        }

        let space = SearchSpace::from_vectors(&lower, &upper).map_err(to_py_err)?;
        let config = FireworksConfig::new(self.max_eval)
            .with_fw_size(self.fw_size)
            .with_sp_size(self.sp_size)
            .with_init_amp(self.init_amp)
            .with_gm_ratio(self.gm_ratio);

        let mut solver = LoTFWA::new(config).map_err(to_py_err)?;
        if let Some(seed) = self.seed {
            solver = solver.with_seed(seed);
        }

        let evaluator = PyObjective::new(objective);
        let mut callback = HistoryCallback::new();
        if self.verbose {
            callback = callback.with_logging(10);
        }

        let timed = solve_timed(&mut solver, &space, &evaluator, &mut callback)
            .map_err(|err| evaluator.take_raised().unwrap_or_else(|| to_py_err(err)))?;

        if self.verbose {
            callback.log_summary();
        }

        let result = timed.result;
        Py::new(
            py,
            OptimizationResult {
                best_fitness: result.best_fitness,
                best_position: result.best_position,
                iterations: result.iterations,
                num_eval: result.num_eval,
                cost_evals: result.cost_evals,
                restarts: result.restarts,
                elapsed_secs: timed.elapsed.as_secs_f64(),
            },
        )
    }
}
