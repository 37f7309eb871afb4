use serde::{Deserialize, Serialize};

use crate::input_modeling::dynamic_rng::{default_rng, DynRng};

/// The simulator state shared by every node of a net: the random number
/// generator used for conflict resolution and delay sampling, and the
/// simulation clock.  Each `Net` owns its own `Services`, so independent
/// nets never share a clock or a random stream.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    #[serde(skip, default = "default_rng")]
    pub(crate) global_rng: DynRng,
    pub(crate) current_time: f64,
    pub(crate) next_time: f64,
    /// The simulation time at which the current statistics window began.
    pub(crate) statistics_origin: f64,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            global_rng: default_rng(),
            current_time: 0.0,
            next_time: 0.0,
            statistics_origin: 0.0,
        }
    }
}

impl Services {
    pub fn set_global_rng(&mut self, rng: DynRng) {
        self.global_rng = rng;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    pub fn statistics_origin(&self) -> f64 {
        self.statistics_origin
    }

    /// Simulated time elapsed since the statistics window began.
    pub fn statistics_elapsed(&self) -> f64 {
        self.current_time - self.statistics_origin
    }
}
