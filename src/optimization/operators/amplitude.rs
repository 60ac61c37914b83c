use super::IMPROVE_EPS;

pub const AMP_GROWTH: f64 = 1.2;
pub const AMP_SHRINK: f64 = 0.9;

/// Floor that keeps explosions from degenerating to a single point
pub const MIN_AMPLITUDE: f64 = 1e-12;

/// Grow the amplitude after a real improvement, shrink it otherwise
pub fn adapt_amplitude(amplitude: f64, fitness_before: f64, fitness_after: f64) -> f64 {
    let factor = if fitness_after < fitness_before - IMPROVE_EPS {
        AMP_GROWTH
    } else {
        AMP_SHRINK
    };

    let next = amplitude * factor;
    if next.is_nan() {
        MIN_AMPLITUDE
    } else {
        next.clamp(MIN_AMPLITUDE, f64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_on_improvement() {
        assert!((adapt_amplitude(10.0, 5.0, 4.0) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn shrinks_on_stall_or_tiny_gain() {
        assert!((adapt_amplitude(10.0, 5.0, 5.0) - 9.0).abs() < 1e-12);
        assert!((adapt_amplitude(10.0, 5.0, 5.0 - 1e-10) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn never_collapses_or_overflows() {
        assert_eq!(adapt_amplitude(MIN_AMPLITUDE, 1.0, 1.0), MIN_AMPLITUDE);
        assert_eq!(adapt_amplitude(f64::MAX, 1.0, 0.0), f64::MAX);
        assert_eq!(adapt_amplitude(f64::NAN, 1.0, 0.0), MIN_AMPLITUDE);

        let mut amp = 1.0;
        for _ in 0..10_000 {
            amp = adapt_amplitude(amp, 1.0, 1.0);
        }
        assert!(amp > 0.0);
    }
}
