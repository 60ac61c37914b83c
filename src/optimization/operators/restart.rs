use super::IMPROVE_EPS;
use crate::core::{Firework, Result, SearchSpace, argmin_fitness};
use crate::optimization::problem::{Evaluator, evaluate_checked};
use rand::Rng;

/// Flag fireworks whose improvement rate cannot close the gap to the current
/// best within the remaining rounds.
///
/// Slot `i` is flagged when it improved by more than the tolerance this round
/// and `improve * remaining_iters < n_fits[i] - min(n_fits)`.
pub fn stagnation_mask(fits: &[f64], n_fits: &[f64], remaining_iters: f64) -> Vec<bool> {
    let min_fit = match argmin_fitness(n_fits) {
        Some(idx) => n_fits[idx],
        None => return Vec::new(),
    };

    fits.iter()
        .zip(n_fits)
        .map(|(&before, &after)| {
            let improve = before - after;
            improve > IMPROVE_EPS && improve * remaining_iters < after - min_fit
        })
        .collect()
}

/// Slot indices flagged in `mask`
pub fn restart_slots(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &flag)| flag.then_some(i))
        .collect()
}

/// Re-seed exactly the listed slots: fresh uniform position, one batched
/// evaluation, amplitude back to `init_amp`
pub fn restart_members<R: Rng + ?Sized>(
    members: &mut [Firework],
    slots: &[usize],
    space: &SearchSpace,
    evaluator: &dyn Evaluator,
    init_amp: f64,
    rng: &mut R,
) -> Result<()> {
    if slots.is_empty() {
        return Ok(());
    }

    let positions: Vec<Vec<f64>> = slots.iter().map(|_| space.sample_uniform(rng)).collect();
    let fitness = evaluate_checked(evaluator, &positions)?;

    for ((&slot, position), fitness) in slots.iter().zip(positions).zip(fitness) {
        tracing::trace!(slot, fitness, "restarting firework");
        members[slot] = Firework {
            position,
            fitness,
            amplitude: init_amp,
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::problem::ObjectiveFn;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn slow_improver_is_restarted() {
        let mask = stagnation_mask(&[10.0, 10.0], &[9.999, 9.0], 5.0);
        assert_eq!(mask, vec![true, false]);
        assert_eq!(restart_slots(&mask), vec![0]);
    }

    #[test]
    fn non_improving_slot_is_kept() {
        // No improvement means no extrapolation at all, however large the gap
        let mask = stagnation_mask(&[50.0, 1.0], &[50.0, 0.5], 1.0);
        assert_eq!(mask, vec![false, false]);
    }

    #[test]
    fn fast_improver_is_kept() {
        let mask = stagnation_mask(&[10.0, 5.0], &[8.0, 4.0], 3.0);
        // slot 0: 2.0 * 3 = 6.0 >= 8.0 - 4.0
        assert_eq!(mask, vec![false, false]);
    }

    #[test]
    fn infinite_fitness_does_not_flag() {
        let mask = stagnation_mask(&[f64::INFINITY, 3.0], &[f64::INFINITY, 2.0], 10.0);
        assert_eq!(mask, vec![false, false]);
    }

    #[test]
    fn only_listed_slots_are_replaced() {
        let space = SearchSpace::uniform(2, -1.0, 1.0).unwrap();
        let evaluator = ObjectiveFn::new(|x: &[f64]| x[0] + 100.0);
        let original: Vec<Firework> = (0..4)
            .map(|i| Firework {
                position: vec![0.5, 0.5],
                fitness: i as f64,
                amplitude: 0.01,
            })
            .collect();
        let mut members = original.clone();
        let mut rng = StdRng::seed_from_u64(11);

        restart_members(&mut members, &[1, 3], &space, &evaluator, 2.0, &mut rng).unwrap();

        assert_eq!(members[0], original[0]);
        assert_eq!(members[2], original[2]);
        for &slot in &[1, 3] {
            assert_eq!(members[slot].amplitude, 2.0);
            assert!(space.contains(&members[slot].position));
            assert_eq!(members[slot].fitness, members[slot].position[0] + 100.0);
        }
    }
}
