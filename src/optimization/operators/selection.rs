use super::mutation::SparkBatch;
use crate::core::compare_fitness;
use std::cmp::Ordering;

/// Elitist per-slot selection over {current, explosion sparks, mutation}.
///
/// Candidates are scanned in that order and only a strictly lower fitness
/// replaces the incumbent, so the current position wins exact ties.
pub fn select_best(
    current: (&[f64], f64),
    batch: &SparkBatch,
    mutation: (&[f64], f64),
) -> (Vec<f64>, f64) {
    let candidates = std::iter::once(current)
        .chain(
            batch
                .positions
                .iter()
                .map(Vec::as_slice)
                .zip(batch.fitness.iter().copied()),
        )
        .chain(std::iter::once(mutation));

    let mut best = current;
    for candidate in candidates.skip(1) {
        if compare_fitness(candidate.1, best.1) == Ordering::Less {
            best = candidate;
        }
    }

    (best.0.to_vec(), best.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(fitness: &[f64]) -> SparkBatch {
        SparkBatch {
            positions: (0..fitness.len()).map(|i| vec![i as f64 + 1.0]).collect(),
            fitness: fitness.to_vec(),
        }
    }

    #[test]
    fn mutation_can_win() {
        let (pos, fit) = select_best((&[0.0], 5.0), &batch(&[6.0, 3.0, 4.0]), (&[42.0], 2.0));
        assert_eq!(fit, 2.0);
        assert_eq!(pos, vec![42.0]);
    }

    #[test]
    fn best_spark_wins() {
        let (pos, fit) = select_best((&[0.0], 5.0), &batch(&[6.0, 3.0, 4.0]), (&[42.0], 4.5));
        assert_eq!(fit, 3.0);
        assert_eq!(pos, vec![2.0]);
    }

    #[test]
    fn current_position_wins_ties() {
        let (pos, fit) = select_best((&[0.0], 3.0), &batch(&[3.0, 3.0]), (&[42.0], 3.0));
        assert_eq!(fit, 3.0);
        assert_eq!(pos, vec![0.0]);

        // Earliest spark wins among equal sparks
        let (pos, _) = select_best((&[0.0], 9.0), &batch(&[3.0, 3.0]), (&[42.0], 3.0));
        assert_eq!(pos, vec![1.0]);
    }

    #[test]
    fn nan_never_selected() {
        let (pos, fit) = select_best(
            (&[0.0], f64::NAN),
            &batch(&[f64::NAN, 7.0]),
            (&[42.0], f64::NAN),
        );
        assert_eq!(fit, 7.0);
        assert_eq!(pos, vec![2.0]);
    }
}
