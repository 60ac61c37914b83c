use crate::core::{Firework, SearchSpace};
use rand::Rng;

/// Resample every coordinate not strictly inside (min, max) uniformly over
/// [min, max]. Unlike clamping this keeps boundary mass from piling up.
pub fn map_into_bounds<R: Rng + ?Sized>(point: &mut [f64], space: &SearchSpace, rng: &mut R) {
    for (x, &(min, max)) in point.iter_mut().zip(space.bounds()) {
        if !(*x > min && *x < max) {
            *x = rng.gen_range(min..=max);
        }
    }
}

/// Scatter `num_sparks` points around a firework, each coordinate offset by
/// U(-1, 1) * amplitude, then mapped back into the domain
pub fn explode<R: Rng + ?Sized>(
    firework: &Firework,
    num_sparks: usize,
    space: &SearchSpace,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    (0..num_sparks)
        .map(|_| {
            let mut spark: Vec<f64> = firework
                .position
                .iter()
                .map(|&x| x + rng.gen_range(-1.0_f64..=1.0) * firework.amplitude)
                .collect();
            map_into_bounds(&mut spark, space, rng);
            spark
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn firework(position: Vec<f64>, amplitude: f64) -> Firework {
        Firework {
            position,
            fitness: 0.0,
            amplitude,
        }
    }

    #[test]
    fn sparks_stay_within_amplitude() {
        let space = SearchSpace::uniform(3, -100.0, 100.0).unwrap();
        let fw = firework(vec![1.0, -2.0, 3.0], 0.5);
        let mut rng = StdRng::seed_from_u64(1);

        let sparks = explode(&fw, 50, &space, &mut rng);
        assert_eq!(sparks.len(), 50);
        for spark in &sparks {
            for (s, c) in spark.iter().zip(&fw.position) {
                assert!((s - c).abs() <= 0.5);
            }
        }
    }

    #[test]
    fn boundary_coordinate_is_resampled_not_clamped() {
        let space = SearchSpace::uniform(1, 0.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        // Exactly on the bound counts as outside
        let mut point = vec![1.0];
        map_into_bounds(&mut point, &space, &mut rng);
        assert!(space.contains(&point));

        let mut resampled = Vec::new();
        for _ in 0..200 {
            let mut p = vec![5.0];
            map_into_bounds(&mut p, &space, &mut rng);
            resampled.push(p[0]);
        }
        assert!(resampled.iter().any(|&x| x < 0.5));
        assert!(resampled.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn interior_coordinates_untouched() {
        let space = SearchSpace::uniform(2, -1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let mut point = vec![0.25, 2.0];
        map_into_bounds(&mut point, &space, &mut rng);
        assert_eq!(point[0], 0.25);
        assert!(point[1] >= -1.0 && point[1] <= 1.0);
    }

    proptest! {
        #[test]
        fn prop_sparks_always_in_bounds(
            seed in any::<u64>(),
            center in -50.0_f64..50.0,
            amplitude in 1e-6_f64..1e4,
            n in 1_usize..40,
        ) {
            let space = SearchSpace::uniform(4, -10.0, 10.0).unwrap();
            let fw = firework(vec![center.clamp(-10.0, 10.0); 4], amplitude);
            let mut rng = StdRng::seed_from_u64(seed);
            for spark in explode(&fw, n, &space, &mut rng) {
                prop_assert!(space.contains(&spark));
            }
        }
    }
}
