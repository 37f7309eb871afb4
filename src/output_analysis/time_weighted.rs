use serde::{Deserialize, Serialize};

/// An online, time-weighted mean of a piecewise-constant quantity.  Each
/// update covers the interval `[t0, t1)`, measured from the start of the
/// statistics window, during which the quantity held `value`.  Starting
/// from a mean of zero at time zero, the accumulated value equals
/// `(Σ value_i · Δt_i) / t1` without storing any history.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeWeightedMean {
    mean: f64,
}

impl TimeWeightedMean {
    /// Fold the interval `[t0, t1)` into the mean.  An update ending at
    /// `t1 = 0` carries no weight and is a no-op.
    pub fn update(&mut self, value: f64, t0: f64, t1: f64) {
        if t1 != 0.0 {
            self.mean += (value - self.mean) * (t1 - t0) / t1;
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Forget all history, so the next update starts a new window at time
    /// zero.
    pub fn reset(&mut self) {
        self.mean = 0.0;
    }
}
