use serde::{Deserialize, Serialize};

use crate::output_analysis::TimeWeightedMean;
use crate::utils::errors::SimulationError;

/// A place holds a non-negative number of tokens.  Depending on the net, the
/// tokens model customers waiting in a queue, idle servers, free queue
/// slots, or a running count of completed or lost customers.  The place
/// also accumulates the time-weighted mean of its marking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    name: String,
    tokens: u64,
    #[serde(default)]
    mean_marking: TimeWeightedMean,
}

impl Place {
    pub fn new(name: impl Into<String>, tokens: u64) -> Self {
        Self {
            name: name.into(),
            tokens,
            mean_marking: TimeWeightedMean::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    /// Overwrite the marking, e.g. to clear a counter at the end of a
    /// warm-up.
    pub fn set_tokens(&mut self, tokens: u64) {
        self.tokens = tokens;
    }

    pub fn mean_marking(&self) -> f64 {
        self.mean_marking.mean()
    }

    pub(crate) fn add_tokens(&mut self, weight: u64) {
        self.tokens += weight;
    }

    pub(crate) fn remove_tokens(&mut self, weight: u64) -> Result<(), SimulationError> {
        self.tokens = self.tokens.checked_sub(weight).ok_or_else(|| {
            SimulationError::InternalConsistency(format![
                "place {} holds {} tokens, {} requested",
                self.name, self.tokens, weight
            ])
        })?;
        Ok(())
    }

    pub(crate) fn update_stats(&mut self, t0: f64, t1: f64) {
        self.mean_marking.update(self.tokens as f64, t0, t1);
    }

    pub(crate) fn reset_stats(&mut self) {
        self.mean_marking.reset();
    }
}
