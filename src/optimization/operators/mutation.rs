use super::explosion::map_into_bounds;
use crate::core::{Firework, SearchSpace, compare_fitness};
use rand::Rng;

/// Explosion output of one firework for one round
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparkBatch {
    pub positions: Vec<Vec<f64>>,
    pub fitness: Vec<f64>,
}

impl SparkBatch {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn centroid(batch: &SparkBatch, indices: &[usize], dim: usize) -> Vec<f64> {
    let mut mean = vec![0.0; dim];
    for &idx in indices {
        for (m, x) in mean.iter_mut().zip(&batch.positions[idx]) {
            *m += x;
        }
    }
    let count = indices.len() as f64;
    mean.iter_mut().for_each(|m| *m /= count);
    mean
}

/// Mean of the best `m` sparks minus mean of the worst `m`,
/// with m = max(1, floor(gm_ratio * n)). Zero vector for an empty batch.
pub fn guidance_vector(batch: &SparkBatch, gm_ratio: f64, dim: usize) -> Vec<f64> {
    let n = batch.len();
    if n == 0 {
        return vec![0.0; dim];
    }

    let m = ((gm_ratio * n as f64).floor() as usize).clamp(1, n);

    // Stable sort keeps equal-fitness sparks in generation order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare_fitness(batch.fitness[a], batch.fitness[b]));

    let best = centroid(batch, &order[..m], dim);
    let worst = centroid(batch, &order[n - m..], dim);

    best.iter().zip(&worst).map(|(b, w)| b - w).collect()
}

/// Single directed candidate: firework position shifted by the guidance vector
pub fn guided_mutation<R: Rng + ?Sized>(
    firework: &Firework,
    batch: &SparkBatch,
    gm_ratio: f64,
    space: &SearchSpace,
    rng: &mut R,
) -> Vec<f64> {
    let delta = guidance_vector(batch, gm_ratio, space.dim());
    let mut candidate: Vec<f64> = firework
        .position
        .iter()
        .zip(&delta)
        .map(|(x, d)| x + d)
        .collect();
    map_into_bounds(&mut candidate, space, rng);
    candidate
}
