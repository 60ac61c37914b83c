use crate::core::{FireworksError, Result, sanitize_fitness};
use rayon::prelude::*;

/// Black-box objective scored in batches.
///
/// Must return exactly one fitness per position, in the same order. Calls are
/// expensive (they are what the budget counts), so the solver batches every
/// candidate of a phase into a single call.
pub trait Evaluator {
    fn evaluate(&self, positions: &[Vec<f64>]) -> std::result::Result<Vec<f64>, String>;
}

/// Adapts a per-point closure into a batched evaluator scored with rayon
pub struct ObjectiveFn<F> {
    objective: F,
}

impl<F> ObjectiveFn<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    pub fn new(objective: F) -> Self {
        Self { objective }
    }
}

impl<F> Evaluator for ObjectiveFn<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn evaluate(&self, positions: &[Vec<f64>]) -> std::result::Result<Vec<f64>, String> {
        Ok(positions
            .par_iter()
            .map(|p| (self.objective)(p.as_slice()))
            .collect())
    }
}

/// Score a batch, enforce the length contract and sanitize non-finite values
pub(crate) fn evaluate_checked(
    evaluator: &dyn Evaluator,
    positions: &[Vec<f64>],
) -> Result<Vec<f64>> {
    if positions.is_empty() {
        return Ok(Vec::new());
    }

    let raw = evaluator
        .evaluate(positions)
        .map_err(FireworksError::Evaluator)?;

    if raw.len() != positions.len() {
        return Err(FireworksError::EvaluationCount {
            expected: positions.len(),
            got: raw.len(),
        });
    }

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            if !f.is_finite() {
                tracing::warn!(index = i, fitness = f, "non-finite fitness treated as worst");
            }
            sanitize_fitness(f)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Truncating;

    impl Evaluator for Truncating {
        fn evaluate(&self, positions: &[Vec<f64>]) -> std::result::Result<Vec<f64>, String> {
            Ok(vec![0.0; positions.len().saturating_sub(1)])
        }
    }

    struct Failing;

    impl Evaluator for Failing {
        fn evaluate(&self, _: &[Vec<f64>]) -> std::result::Result<Vec<f64>, String> {
            Err("simulator crashed".into())
        }
    }

    #[test]
    fn closure_preserves_order() {
        let sphere = ObjectiveFn::new(|x: &[f64]| x.iter().map(|v| v * v).sum());
        let points: Vec<Vec<f64>> = (0..100).map(|i| vec![i as f64, 1.0]).collect();
        let fits = evaluate_checked(&sphere, &points).unwrap();
        for (i, f) in fits.iter().enumerate() {
            assert_eq!(*f, (i * i) as f64 + 1.0);
        }
    }

    #[test]
    fn non_finite_becomes_worst() {
        let nan = ObjectiveFn::new(|x: &[f64]| if x[0] > 0.0 { f64::NAN } else { x[0] });
        let fits = evaluate_checked(&nan, &[vec![1.0], vec![-1.0]]).unwrap();
        assert_eq!(fits, vec![f64::INFINITY, -1.0]);
    }

    #[test]
    fn contract_violations_are_errors() {
        assert!(matches!(
            evaluate_checked(&Truncating, &[vec![0.0], vec![1.0]]),
            Err(FireworksError::EvaluationCount { expected: 2, got: 1 })
        ));
        assert!(matches!(
            evaluate_checked(&Failing, &[vec![0.0]]),
            Err(FireworksError::Evaluator(_))
        ));
        assert!(evaluate_checked(&Failing, &[]).unwrap().is_empty());
    }
}
