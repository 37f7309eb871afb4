//! The output analysis module provides the statistics gathered while a net
//! runs and the tools for analyzing them afterwards.  Within a run, every
//! place and transition carries a `TimeWeightedMean`, and a net reports
//! `Metrics` computed from designated `Observable`s, optionally streaming
//! them into a `SnapshotSink`.  Across runs, independent replications are
//! analyzed with the `IndependentSample`.

use num_traits::Float;
use serde::{Deserialize, Serialize};

pub mod metrics;
pub mod snapshot;
pub mod t_scores;
pub mod time_weighted;

pub use self::metrics::{Metrics, Observable};
pub use self::snapshot::{CsvSnapshotWriter, Snapshot, SnapshotLog, SnapshotSink};
pub use self::time_weighted::TimeWeightedMean;
use crate::utils::errors::SimulationError;

fn sum<T: Float>(points: &[T]) -> T
where
    f64: Into<T>,
{
    points.iter().fold(0.0.into(), |sum, point| sum + *point)
}

/// This function calculates the sample mean from a set of points - a simple
/// arithmetic mean.
fn sample_mean<T: Float>(points: &[T]) -> Result<T, SimulationError>
where
    f64: Into<T>,
{
    if points.is_empty() {
        return Err(SimulationError::PrerequisiteCalcError);
    }
    Ok(sum(points) / usize_to_float(points.len())?)
}

/// This function calculates the unbiased sample variance, given a set of
/// points and the sample mean.  A single point has zero variance.
fn sample_variance<T: Float>(points: &[T], mean: &T) -> Result<T, SimulationError>
where
    f64: Into<T>,
{
    if points.len() < 2 {
        return Ok(0.0.into());
    }
    Ok(points
        .iter()
        .fold(0.0.into(), |acc, point| acc + (*point - *mean).powi(2))
        / usize_to_float(points.len() - 1)?)
}

/// This function converts a usize to a Float, with an associated
/// `SimulationError` returned for failed conversions
fn usize_to_float<T: Float>(unconv: usize) -> Result<T, SimulationError> {
    T::from(unconv).ok_or(SimulationError::FloatConvError)
}

/// The confidence interval provides an upper and lower estimate on a given
/// output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceInterval<T: Float> {
    lower: T,
    upper: T,
}

impl<T: Float> ConfidenceInterval<T>
where
    f64: Into<T>,
{
    pub fn lower(&self) -> T {
        self.lower
    }

    pub fn upper(&self) -> T {
        self.upper
    }

    pub fn half_width(&self) -> T {
        (self.upper - self.lower) / 2.0.into()
    }

    pub fn contains(&self, value: T) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// The independent sample is for independent, identically-distributed (IID)
/// samples, such as one output metric collected from independent
/// replications of a net, each with its own random number stream.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct IndependentSample<T> {
    points: Vec<T>,
    mean: T,
    variance: T,
}

impl<T: Float> IndependentSample<T>
where
    f64: Into<T>,
{
    /// This constructor method creates an `IndependentSample` from a vector
    /// of floating point values.
    pub fn post(points: Vec<T>) -> Result<IndependentSample<T>, SimulationError> {
        let mean = sample_mean(&points)?;
        let variance = sample_variance(&points, &mean)?;
        Ok(IndependentSample {
            points,
            mean,
            variance,
        })
    }

    /// Calculate the two-sided confidence interval of the mean, at
    /// significance level `alpha`.
    pub fn confidence_interval_mean(
        &self,
        alpha: T,
    ) -> Result<ConfidenceInterval<T>, SimulationError> {
        if self.points.len() == 1 {
            return Ok(ConfidenceInterval {
                lower: self.mean,
                upper: self.mean,
            });
        }
        let points_len: T = usize_to_float(self.points.len())?;
        let half_width = t_scores::t_score(alpha, self.points.len() - 1)? * self.variance.sqrt()
            / points_len.sqrt();
        Ok(ConfidenceInterval {
            lower: self.mean - half_width,
            upper: self.mean + half_width,
        })
    }

    pub fn points(&self) -> &[T] {
        &self.points
    }

    /// Return the sample mean.
    pub fn point_estimate_mean(&self) -> T {
        self.mean
    }

    /// Return the sample variance.
    pub fn variance(&self) -> T {
        self.variance
    }
}
