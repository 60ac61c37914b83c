use super::solvers::traits::{OptimizationCallback, RoundReport};
use crate::core::Population;
use tracing::info;

/// Callback that ignores progress
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCallback;

impl OptimizationCallback for NoopCallback {
    fn on_round(&mut self, _report: &RoundReport<'_>) -> Result<(), String> {
        Ok(())
    }
}

/// Round result for tracking optimization progress
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub iteration: usize,
    pub num_eval: usize,
    pub best_fitness: f64,
    pub best_position: Vec<f64>,
    pub restarted: Vec<usize>,
    pub population: Population,
}

/// Records every round and optionally logs progress or caps the round count
#[derive(Debug, Default)]
pub struct HistoryCallback {
    log_every: Option<usize>,
    max_rounds: Option<usize>,
    rounds_seen: usize,
    history: Vec<RoundRecord>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an `info!` line every `every` rounds
    pub fn with_logging(mut self, every: usize) -> Self {
        self.log_every = Some(every.max(1));
        self
    }

    /// Stop after `rounds` rounds even if budget remains
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Get round history
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn total_restarts(&self) -> usize {
        self.history.iter().map(|r| r.restarted.len()).sum()
    }

    /// Log a one-line summary of the recorded run
    pub fn log_summary(&self) {
        match self.history.last() {
            Some(last) => info!(
                rounds = self.history.len(),
                num_eval = last.num_eval,
                best_fitness = last.best_fitness,
                restarts = self.total_restarts(),
                "optimization summary"
            ),
            None => info!("optimization summary: no rounds recorded"),
        }
    }
}

impl OptimizationCallback for HistoryCallback {
    fn on_round(&mut self, report: &RoundReport<'_>) -> Result<(), String> {
        self.rounds_seen += 1;

        self.history.push(RoundRecord {
            iteration: report.iteration,
            num_eval: report.num_eval,
            best_fitness: report.best_fitness,
            best_position: report.best_position.to_vec(),
            restarted: report.restarted.to_vec(),
            population: report.population.clone(),
        });

        if let Some(every) = self.log_every {
            if report.iteration % every == 0 {
                info!(
                    iteration = report.iteration,
                    num_eval = report.num_eval,
                    best_fitness = report.best_fitness,
                    restarts = report.restarted.len(),
                    "progress"
                );
            }
        }

        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.max_rounds
            .is_some_and(|max_rounds| self.rounds_seen >= max_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Firework;

    fn report_for<'a>(
        iteration: usize,
        population: &'a Population,
        restarted: &'a [usize],
    ) -> RoundReport<'a> {
        RoundReport {
            iteration,
            num_eval: iteration * 10,
            best_fitness: 1.0 / iteration as f64,
            best_position: &population.members()[0].position,
            restarted,
            population,
        }
    }

    #[test]
    fn records_and_caps_rounds() {
        let population = Population::new(vec![Firework {
            position: vec![0.0],
            fitness: 1.0,
            amplitude: 1.0,
        }]);
        let mut callback = HistoryCallback::new().with_max_rounds(2).with_logging(1);

        callback.on_round(&report_for(1, &population, &[0])).unwrap();
        assert!(!callback.should_stop());
        callback.on_round(&report_for(2, &population, &[])).unwrap();
        assert!(callback.should_stop());

        assert_eq!(callback.history().len(), 2);
        assert_eq!(callback.history()[1].num_eval, 20);
        assert_eq!(callback.total_restarts(), 1);
        callback.log_summary();
    }

    #[test]
    fn noop_never_stops() {
        assert!(!NoopCallback.should_stop());
    }
}
