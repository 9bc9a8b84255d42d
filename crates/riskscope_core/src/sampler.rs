//! Gaussian sampling for the scenario simulator.
//!
//! Samplers take the random source as `&mut R where R: Rng + ?Sized`, so a
//! caller can drive them with a seeded generator in tests and an
//! entropy-seeded one in production.

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Algorithm used to turn uniform draws into standard normal draws
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GaussianMethod {
    /// Box-Muller transform, one uniform pair per sample
    #[default]
    BoxMuller,
    /// `rand_distr::StandardNormal` (ziggurat)
    Ziggurat,
}

impl GaussianMethod {
    /// Draw one standard normal value
    pub fn standard_normal<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            GaussianMethod::BoxMuller => box_muller(rng),
            GaussianMethod::Ziggurat => StandardNormal.sample(rng),
        }
    }

    /// Draw one value from `N(mean, std_dev)`
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R, mean: f64, std_dev: f64) -> f64 {
        mean + self.standard_normal(rng) * std_dev
    }
}

/// Standard normal draw via the Box-Muller transform:
/// `z = sqrt(-2 ln u1) * cos(2 pi u2)`.
///
/// `u1` is taken from (0, 1] so the logarithm is always finite.
pub fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::stats::{mean, std_dev};

    fn draws(method: GaussianMethod, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..n).map(|_| method.standard_normal(&mut rng)).collect()
    }

    #[test]
    fn test_box_muller_is_finite() {
        assert!(draws(GaussianMethod::BoxMuller, 10_000, 1)
            .iter()
            .all(|z| z.is_finite()));
    }

    #[test]
    fn test_box_muller_moments() {
        let samples = draws(GaussianMethod::BoxMuller, 100_000, 7);
        assert!(mean(&samples).abs() < 0.02, "mean {}", mean(&samples));
        assert!((std_dev(&samples) - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_ziggurat_moments() {
        let samples = draws(GaussianMethod::Ziggurat, 100_000, 7);
        assert!(mean(&samples).abs() < 0.02);
        assert!((std_dev(&samples) - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_same_seed_same_draws() {
        assert_eq!(
            draws(GaussianMethod::BoxMuller, 50, 42),
            draws(GaussianMethod::BoxMuller, 50, 42)
        );
    }

    #[test]
    fn test_zero_std_dev_returns_mean() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(GaussianMethod::BoxMuller.sample(&mut rng, 0.12, 0.0), 0.12);
        }
    }

    #[test]
    fn test_sample_scales_and_shifts() {
        let mut rng = SmallRng::seed_from_u64(11);
        let samples: Vec<f64> = (0..100_000)
            .map(|_| GaussianMethod::BoxMuller.sample(&mut rng, 0.07, 0.15))
            .collect();
        assert!((mean(&samples) - 0.07).abs() < 0.005);
        assert!((std_dev(&samples) - 0.15).abs() < 0.005);
    }
}
