//! Random variables underpin stochastic transition delays.  Common
//! continuous distributions, with their common parameterizations, are
//! wrapped in the `Continuous` enum.  Deterministic delays are expressed
//! through `Delay::Constant` rather than a degenerate distribution.

use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::{Beta, Exp, Gamma, LogNormal, Normal, Triangular, Uniform, Weibull};
use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Continuous {
    Beta { alpha: f64, beta: f64 },
    Exp { lambda: f64 },
    Gamma { shape: f64, scale: f64 },
    LogNormal { mu: f64, sigma: f64 },
    Normal { mean: f64, std_dev: f64 },
    /// A normal distribution conditioned on non-negative values.  Negative
    /// variates are rejected and resampled, so `mean` must be non-negative.
    TruncatedNormal { mean: f64, std_dev: f64 },
    Triangular { min: f64, max: f64, mode: f64 },
    /// Range is inclusive of min, exclusive of max: [min, max)
    Uniform { min: f64, max: f64 },
    Weibull { shape: f64, scale: f64 },
}

impl Continuous {
    /// An exponential distribution parameterized by its mean rather than its
    /// rate.
    pub fn exp_with_mean(mean: f64) -> Self {
        Continuous::Exp { lambda: 1.0 / mean }
    }

    /// A uniform distribution given as a center and a maximum deviation from
    /// that center.
    pub fn uniform_around(center: f64, deviation: f64) -> Self {
        Continuous::Uniform {
            min: center - deviation,
            max: center + deviation,
        }
    }

    /// The generation of random variates drives stochastic behaviors during
    /// simulation execution.  This function requires the random number
    /// generator of the simulation, and produces a f64 random variate.
    pub fn random_variate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SimulationError> {
        match self {
            Continuous::Beta { alpha, beta } => Ok(Beta::new(*alpha, *beta)?.sample(rng)),
            Continuous::Exp { lambda } => Ok(Exp::new(*lambda)?.sample(rng)),
            Continuous::Gamma { shape, scale } => Ok(Gamma::new(*shape, *scale)?.sample(rng)),
            Continuous::LogNormal { mu, sigma } => Ok(LogNormal::new(*mu, *sigma)?.sample(rng)),
            Continuous::Normal { mean, std_dev } => Ok(Normal::new(*mean, *std_dev)?.sample(rng)),
            Continuous::TruncatedNormal { mean, std_dev } => {
                if !(*mean >= 0.0) {
                    return Err(SimulationError::InvalidModelConfiguration(format![
                        "truncated normal mean must be non-negative, found {}",
                        mean
                    ]));
                }
                let normal = Normal::new(*mean, *std_dev)?;
                loop {
                    let variate = normal.sample(rng);
                    if variate >= 0.0 {
                        return Ok(variate);
                    }
                }
            }
            Continuous::Triangular { min, max, mode } => {
                Ok(Triangular::new(*min, *max, *mode)?.sample(rng))
            }
            Continuous::Uniform { min, max } => {
                if !(min < max) {
                    return Err(SimulationError::InvalidModelConfiguration(format![
                        "uniform range [{}, {}) is empty",
                        min, max
                    ]));
                }
                Ok(Uniform::new(*min, *max).sample(rng))
            }
            Continuous::Weibull { shape, scale } => Ok(Weibull::new(*scale, *shape)?.sample(rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_pcg::Pcg64Mcg;

    fn empirical_mean(variable: &Continuous, sample_size: usize) -> f64 {
        let mut rng = Pcg64Mcg::new(42);
        (0..sample_size)
            .map(|_| variable.random_variate(&mut rng).unwrap())
            .sum::<f64>()
            / (sample_size as f64)
    }

    fn chi_square(
        variable: &Continuous,
        bin_mapping_fn: fn(f64) -> usize,
        expected_counts: &[usize],
    ) -> f64 {
        let mut class_counts = vec![0; expected_counts.len()];
        let mut rng = Pcg64Mcg::new(42);
        let sample_size = expected_counts.iter().sum();
        (0..sample_size).for_each(|_| {
            class_counts[bin_mapping_fn(variable.random_variate(&mut rng).unwrap())] += 1
        });
        class_counts.iter().zip(expected_counts.iter()).fold(
            0.0,
            |acc, (class_count, expected_count)| {
                let f_class_count = *class_count as f64;
                let f_expected_count = *expected_count as f64;
                acc + (f_class_count - f_expected_count).powi(2) / f_expected_count
            },
        )
    }

    #[test]
    fn exponential_samples_match_expectation() {
        let mean = empirical_mean(&Continuous::Exp { lambda: 7.0 }, 10000);
        let expected = 1.0 / 7.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn exponential_with_mean_uses_the_reciprocal_rate() {
        let mean = empirical_mean(&Continuous::exp_with_mean(0.75), 10000);
        assert!((mean - 0.75).abs() / 0.75 < 0.025);
    }

    #[test]
    fn gamma_samples_match_expectation() {
        let variable = Continuous::Gamma {
            shape: 7.0,
            scale: 11.0,
        };
        let mean = empirical_mean(&variable, 10000);
        let expected = 77.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn truncated_normal_is_never_negative() {
        let variable = Continuous::TruncatedNormal {
            mean: 0.5,
            std_dev: 0.25,
        };
        let mut rng = Pcg64Mcg::new(42);
        assert!((0..10000).all(|_| variable.random_variate(&mut rng).unwrap() >= 0.0));
    }

    #[test]
    fn truncated_normal_rejects_negative_mean() {
        let variable = Continuous::TruncatedNormal {
            mean: -1.0,
            std_dev: 0.25,
        };
        let mut rng = Pcg64Mcg::new(42);
        assert!(matches!(
            variable.random_variate(&mut rng),
            Err(SimulationError::InvalidModelConfiguration(_))
        ));
    }

    #[test]
    fn triangular_samples_chi_square() {
        fn bins_mapping(variate: f64) -> usize {
            ((variate - 5.0) / 5.0) as usize
        }
        let variable = Continuous::Triangular {
            min: 5.0,
            max: 25.0,
            mode: 15.0,
        };
        // 4 classes/bins - each of width 5
        let expected_counts: [usize; 4] = [125, 375, 375, 125];
        // At a significance level of 0.01, and with n-1=3 degrees of freedom, the chi square critical
        // value for this scenario is 11.345
        assert![chi_square(&variable, bins_mapping, &expected_counts) < 11.345];
    }

    #[test]
    fn uniform_around_center_chi_square() {
        fn bins_mapping(variate: f64) -> usize {
            ((variate - 0.2) * 10.0) as usize
        }
        let variable = Continuous::uniform_around(0.6, 0.4);
        // Constant bin counts over [0.2, 1.0), due to uniformity of distribution
        let expected_counts: [usize; 8] = [1000; 8];
        // At a significance level of 0.01, and with n-1=7 degrees of freedom, the chi square critical
        // value for this scenario is 18.475
        assert![chi_square(&variable, bins_mapping, &expected_counts) < 18.475];
    }

    #[test]
    fn empty_uniform_range_is_rejected() {
        let mut rng = Pcg64Mcg::new(42);
        let variable = Continuous::Uniform { min: 1.0, max: 1.0 };
        assert!(variable.random_variate(&mut rng).is_err());
    }
}
