use super::traits::{OptimizationCallback, RoundReport, Solver, SolverResult};
use crate::core::{
    Firework, FireworksConfig, FireworksError, Population, Result, SearchSpace, compare_fitness,
};
use crate::optimization::operators::{
    SparkBatch, adapt_amplitude, explode, guided_mutation, restart_members, restart_slots,
    select_best, stagnation_mask,
};
use crate::optimization::problem::{Evaluator, evaluate_checked};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Loser-out tournament fireworks algorithm.
///
/// Keeps `fw_size` fireworks, explodes each into an equal share of `sp_size`
/// sparks every round, adds one guided-mutation spark per firework, keeps the
/// best candidate per slot, and restarts fireworks predicted to lose the race
/// to the current best before the budget runs out.
pub struct LoTFWA {
    config: FireworksConfig,
    seed: Option<u64>,
}

impl LoTFWA {
    /// Validates the configuration up front
    pub fn new(config: FireworksConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, seed: None })
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &FireworksConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Sample and evaluate the initial population without running any round
    pub fn start<'a>(
        &self,
        space: &'a SearchSpace,
        evaluator: &'a dyn Evaluator,
    ) -> Result<FireworksRun<'a>> {
        FireworksRun::init(self.config.clone(), space, evaluator, self.make_rng())
    }
}

impl Solver for LoTFWA {
    fn name(&self) -> &str {
        "LoTFWA"
    }

    fn solve(
        &mut self,
        space: &SearchSpace,
        evaluator: &dyn Evaluator,
        callback: &mut dyn OptimizationCallback,
    ) -> Result<SolverResult> {
        let mut run = self.start(space, evaluator)?;

        while !run.is_done() {
            let outcome = run.step()?;
            callback
                .on_round(&run.report(&outcome.restarted))
                .map_err(FireworksError::Interrupted)?;

            if callback.should_stop() {
                info!(iteration = run.num_iter(), "stopped by callback");
                break;
            }
        }

        let result = run.into_result();
        info!(
            best_fitness = result.best_fitness,
            iterations = result.iterations,
            num_eval = result.num_eval,
            restarts = result.restarts,
            "LoTFWA finished"
        );
        Ok(result)
    }
}

/// What one round did, for inspection between steps
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    pub iteration: usize,
    /// Slot fitnesses entering the round
    pub fitness_before: Vec<f64>,
    /// Slot fitnesses after selection, before restarts
    pub fitness_selected: Vec<f64>,
    pub restarted: Vec<usize>,
    /// Evaluations charged to the budget by this round
    pub evaluations: usize,
}

/// A single LoTFWA run: built by `init`, advanced with `step` until `is_done`
pub struct FireworksRun<'a> {
    config: FireworksConfig,
    space: &'a SearchSpace,
    evaluator: &'a dyn Evaluator,
    rng: StdRng,
    population: Population,
    max_iter: usize,
    num_iter: usize,
    num_eval: usize,
    cost_evals: usize,
    restarts: usize,
    best_position: Vec<f64>,
    best_fitness: f64,
}

impl<'a> FireworksRun<'a> {
    pub fn init(
        config: FireworksConfig,
        space: &'a SearchSpace,
        evaluator: &'a dyn Evaluator,
        mut rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;

        let positions: Vec<Vec<f64>> = (0..config.fw_size())
            .map(|_| space.sample_uniform(&mut rng))
            .collect();
        let fitness = evaluate_checked(evaluator, &positions)?;

        let population = Population::new(
            positions
                .into_iter()
                .zip(fitness)
                .map(|(position, fitness)| Firework {
                    position,
                    fitness,
                    amplitude: config.init_amp(),
                })
                .collect(),
        );

        let (best_position, best_fitness) = population
            .best()
            .map(|fw| (fw.position.clone(), fw.fitness))
            .unwrap_or_else(|| (Vec::new(), f64::INFINITY));

        let max_iter = config.max_iter();
        info!(
            dim = space.dim(),
            fw_size = config.fw_size(),
            sp_size = config.sp_size(),
            init_amp = config.init_amp(),
            gm_ratio = config.gm_ratio(),
            max_eval = config.max_eval(),
            max_iter,
            "starting LoTFWA run"
        );

        Ok(Self {
            cost_evals: config.fw_size(),
            config,
            space,
            evaluator,
            rng,
            population,
            max_iter,
            num_iter: 0,
            num_eval: 0,
            restarts: 0,
            best_position,
            best_fitness,
        })
    }

    /// Budget exhausted; only checked between rounds
    pub fn is_done(&self) -> bool {
        self.num_eval >= self.config.max_eval()
    }

    /// Explode, mutate, select, restart, adapt amplitudes, charge the budget
    pub fn step(&mut self) -> Result<RoundOutcome> {
        let space = self.space;
        let evaluator = self.evaluator;
        let num_sparks = self.config.spark_allocation();
        let gm_ratio = self.config.gm_ratio();

        // Per-slot generators derived in slot order keep parallel runs reproducible
        let mut slot_rngs: Vec<StdRng> = (0..self.population.len())
            .map(|_| StdRng::seed_from_u64(self.rng.r#gen()))
            .collect();

        let members = self.population.members();

        let explosions: Vec<Vec<Vec<f64>>> = members
            .par_iter()
            .zip(slot_rngs.par_iter_mut())
            .zip(num_sparks.par_iter())
            .map(|((fw, rng), &n)| explode(fw, n, space, rng))
            .collect();
        let batches = evaluate_grouped(evaluator, explosions)?;

        let mutations: Vec<Vec<f64>> = members
            .par_iter()
            .zip(batches.par_iter())
            .zip(slot_rngs.par_iter_mut())
            .map(|((fw, batch), rng)| guided_mutation(fw, batch, gm_ratio, space, rng))
            .collect();
        let mutation_fitness = evaluate_checked(evaluator, &mutations)?;

        let mut next: Vec<Firework> = members
            .iter()
            .zip(&batches)
            .zip(mutations.iter().zip(&mutation_fitness))
            .map(|((fw, batch), (m_pos, &m_fit))| {
                let (position, fitness) = select_best(
                    (fw.position.as_slice(), fw.fitness),
                    batch,
                    (m_pos.as_slice(), m_fit),
                );
                Firework {
                    position,
                    fitness,
                    amplitude: fw.amplitude,
                }
            })
            .collect();

        let fitness_before = self.population.fitnesses();
        let fitness_selected: Vec<f64> = next.iter().map(|fw| fw.fitness).collect();

        let remaining = self.max_iter as f64 - self.num_iter as f64;
        let mask = stagnation_mask(&fitness_before, &fitness_selected, remaining);
        let restarted = restart_slots(&mask);

        for ((fw, &before), &after) in next
            .iter_mut()
            .zip(&fitness_before)
            .zip(&fitness_selected)
        {
            fw.amplitude = adapt_amplitude(fw.amplitude, before, after);
        }

        // Restart resets amplitude, overriding the update above for those slots
        restart_members(
            &mut next,
            &restarted,
            space,
            evaluator,
            self.config.init_amp(),
            &mut self.rng,
        )?;

        let evaluations = num_sparks.iter().sum::<usize>() + next.len() + restarted.len();
        self.num_iter += 1;
        self.num_eval += evaluations;
        self.cost_evals += evaluations;
        self.restarts += restarted.len();
        self.population = Population::new(next);

        if let Some(best) = self.population.best() {
            if compare_fitness(best.fitness, self.best_fitness) == Ordering::Less {
                self.best_fitness = best.fitness;
                self.best_position = best.position.clone();
            }
        }

        debug!(
            iteration = self.num_iter,
            num_eval = self.num_eval,
            best_fitness = self.best_fitness,
            restarts = restarted.len(),
            "round complete"
        );

        Ok(RoundOutcome {
            iteration: self.num_iter,
            fitness_before,
            fitness_selected,
            restarted,
            evaluations,
        })
    }

    pub fn report<'r>(&'r self, restarted: &'r [usize]) -> RoundReport<'r> {
        RoundReport {
            iteration: self.num_iter,
            num_eval: self.num_eval,
            best_fitness: self.best_fitness,
            best_position: &self.best_position,
            restarted,
            population: &self.population,
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn num_iter(&self) -> usize {
        self.num_iter
    }

    pub fn num_eval(&self) -> usize {
        self.num_eval
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn best_position(&self) -> &[f64] {
        &self.best_position
    }

    pub fn into_result(self) -> SolverResult {
        SolverResult {
            best_fitness: self.best_fitness,
            best_position: self.best_position,
            iterations: self.num_iter,
            num_eval: self.num_eval,
            cost_evals: self.cost_evals,
            restarts: self.restarts,
        }
    }
}

/// Score several spark groups in one evaluator call and split the results back
fn evaluate_grouped(
    evaluator: &dyn Evaluator,
    groups: Vec<Vec<Vec<f64>>>,
) -> Result<Vec<SparkBatch>> {
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    let flat: Vec<Vec<f64>> = groups.into_iter().flatten().collect();
    let fitness = evaluate_checked(evaluator, &flat)?;

    let mut positions = flat.into_iter();
    let mut fitness = fitness.into_iter();
    Ok(sizes
        .into_iter()
        .map(|n| SparkBatch {
            positions: positions.by_ref().take(n).collect(),
            fitness: fitness.by_ref().take(n).collect(),
        })
        .collect())
}
