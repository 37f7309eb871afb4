//! Replicated simulation experiments.  Every replication builds a fresh net,
//! seeds it with its own random stream, and runs it for the same warm-up
//! and duration.  The metrics of the replications are independent samples,
//! summarized with confidence intervals.

use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::output_analysis::{ConfidenceInterval, IndependentSample, SnapshotSink};
use crate::simulator::Net;
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub replications: usize,
    pub duration: f64,
    #[serde(default)]
    pub warmup: f64,
    /// Seed of the first replication; replication `i` uses `seed + i`.
    #[serde(default)]
    pub seed: u64,
}

/// Per-metric samples over the replications of an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSummary {
    samples: IndexMap<String, IndependentSample<f64>>,
}

impl ExperimentSummary {
    pub fn sample(&self, metric: &str) -> Option<&IndependentSample<f64>> {
        self.samples.get(metric)
    }

    pub fn samples(&self) -> &IndexMap<String, IndependentSample<f64>> {
        &self.samples
    }

    pub fn confidence_intervals(
        &self,
        alpha: f64,
    ) -> Result<IndexMap<String, ConfidenceInterval<f64>>, SimulationError> {
        self.samples
            .iter()
            .map(|(metric, sample)| Ok((metric.clone(), sample.confidence_interval_mean(alpha)?)))
            .collect()
    }
}

impl Experiment {
    pub fn new(replications: usize, duration: f64) -> Self {
        Self {
            replications,
            duration,
            warmup: 0.0,
            seed: 0,
        }
    }

    pub fn with_warmup(mut self, warmup: f64) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn replication_net<F>(&self, replication: usize, build: &mut F) -> Result<Net, SimulationError>
    where
        F: FnMut() -> Result<Net, SimulationError>,
    {
        Ok(build()?.with_seed(self.seed.wrapping_add(replication as u64)))
    }

    /// Run every replication and collect each metric into an
    /// `IndependentSample`.
    pub fn run<F>(&self, mut build: F) -> Result<ExperimentSummary, SimulationError>
    where
        F: FnMut() -> Result<Net, SimulationError>,
    {
        if self.replications == 0 {
            return Err(SimulationError::InvalidModelConfiguration(String::from(
                "an experiment needs at least one replication",
            )));
        }
        let mut columns: IndexMap<String, Vec<f64>> = IndexMap::new();
        for replication in 0..self.replications {
            let mut net = self.replication_net(replication, &mut build)?;
            let metrics = net.run_for(self.duration, self.warmup)?;
            info!(
                "replication {} of {} finished at time {}",
                replication + 1,
                self.replications,
                net.current_time()
            );
            metrics
                .into_iter()
                .for_each(|(metric, value)| columns.entry(metric).or_default().push(value));
        }
        let samples = columns
            .into_iter()
            .map(|(metric, points)| Ok((metric, IndependentSample::post(points)?)))
            .collect::<Result<IndexMap<_, _>, SimulationError>>()?;
        Ok(ExperimentSummary { samples })
    }

    /// Run every replication with periodic snapshots, each into the sink
    /// returned by `sink_for(replication)`.
    pub fn run_with_snapshots<F, G, S>(
        &self,
        interval: f64,
        mut build: F,
        mut sink_for: G,
    ) -> Result<(), SimulationError>
    where
        F: FnMut() -> Result<Net, SimulationError>,
        G: FnMut(usize) -> Result<S, SimulationError>,
        S: SnapshotSink,
    {
        for replication in 0..self.replications {
            let mut net = self.replication_net(replication, &mut build)?;
            let sink = sink_for(replication)?;
            net.run_with_snapshots(self.duration, interval, self.warmup, sink)?;
            info!(
                "replication {} of {} snapshotted",
                replication + 1,
                self.replications
            );
        }
        Ok(())
    }
}
