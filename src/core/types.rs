use super::error::{FireworksError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ===== FITNESS HELPERS =====

/// Map any non-finite fitness to +inf so it loses every min-based comparison
#[inline]
pub fn sanitize_fitness(fitness: f64) -> f64 {
    if fitness.is_finite() {
        fitness
    } else {
        f64::INFINITY
    }
}

/// Ascending fitness order with NaN sorted last
#[inline]
pub fn compare_fitness(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Index of the lowest fitness, earliest index on ties
pub fn argmin_fitness(fitness: &[f64]) -> Option<usize> {
    fitness
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &f)| match best {
            Some((_, b)) if compare_fitness(f, b) != Ordering::Less => best,
            _ => Some((i, f)),
        })
        .map(|(i, _)| i)
}

// ===== SEARCH SPACE =====

/// Widest per-dimension range a uniform draw can span without overflowing
pub const MAX_WIDTH: f64 = f64::MAX / 2.0;

/// Box-bounded continuous domain, immutable once built
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchSpace {
    bounds: Vec<(f64, f64)>,
}

impl SearchSpace {
    /// Build from per-dimension (min, max) pairs
    pub fn new(bounds: Vec<(f64, f64)>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(FireworksError::InvalidSearchSpace(
                "search space needs at least one dimension".into(),
            ));
        }

        for (i, &(min, max)) in bounds.iter().enumerate() {
            if !min.is_finite() || !max.is_finite() {
                return Err(FireworksError::InvalidSearchSpace(format!(
                    "dimension {} has non-finite bounds ({}, {})",
                    i, min, max
                )));
            }
            if min >= max {
                return Err(FireworksError::InvalidSearchSpace(format!(
                    "dimension {}: lower bound {} must be below upper bound {}",
                    i, min, max
                )));
            }
            if !(max - min <= MAX_WIDTH) {
                return Err(FireworksError::InvalidSearchSpace(format!(
                    "dimension {}: width of ({}, {}) is too large to sample",
                    i, min, max
                )));
            }
        }

        Ok(Self { bounds })
    }

    /// Build from separate lower and upper bound vectors
    pub fn from_vectors(lower: &[f64], upper: &[f64]) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(FireworksError::InvalidSearchSpace(format!(
                "lower has {} dimensions but upper has {}",
                lower.len(),
                upper.len()
            )));
        }
        Self::new(lower.iter().copied().zip(upper.iter().copied()).collect())
    }

    /// Same bounds on every dimension
    pub fn uniform(dim: usize, min: f64, max: f64) -> Result<Self> {
        Self::new(vec![(min, max); dim])
    }

    pub fn dim(&self) -> usize {
        self.bounds.len()
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub fn lower(&self) -> Vec<f64> {
        self.bounds.iter().map(|&(min, _)| min).collect()
    }

    pub fn upper(&self) -> Vec<f64> {
        self.bounds.iter().map(|&(_, max)| max).collect()
    }

    /// Widest (max - min) across dimensions
    pub fn max_range(&self) -> f64 {
        self.bounds
            .iter()
            .map(|&(min, max)| max - min)
            .fold(0.0, f64::max)
    }

    /// Inclusive bounds check
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(&self.bounds)
                .all(|(&x, &(min, max))| x >= min && x <= max)
    }

    /// Draw one point uniformly over the box
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.bounds
            .iter()
            .map(|&(min, max)| rng.gen_range(min..=max))
            .collect()
    }
}

// ===== POPULATION =====

/// One firework: a position, its fitness and its explosion amplitude
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Firework {
    pub position: Vec<f64>,
    pub fitness: f64,
    pub amplitude: f64,
}

/// Fixed-size ordered set of fireworks; slot index is identity across rounds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Population {
    members: Vec<Firework>,
}

impl Population {
    pub fn new(members: Vec<Firework>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Firework] {
        &self.members
    }

    pub fn fitnesses(&self) -> Vec<f64> {
        self.members.iter().map(|fw| fw.fitness).collect()
    }

    /// Lowest-fitness member, earliest slot on ties
    pub fn best(&self) -> Option<&Firework> {
        argmin_fitness(&self.fitnesses()).map(|i| &self.members[i])
    }
}
