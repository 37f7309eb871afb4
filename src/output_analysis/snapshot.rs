use std::io::Write;

use serde::{Deserialize, Serialize};

use super::Metrics;
use crate::utils::errors::SimulationError;

/// The metrics of a net at one point of its statistics window.  `elapsed`
/// is measured from the start of the window, i.e. after any warm-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub elapsed: f64,
    pub metrics: Metrics,
}

/// Receives the periodic snapshots of `Net::run_with_snapshots`.
pub trait SnapshotSink {
    fn emit(&mut self, elapsed: f64, metrics: &Metrics) -> Result<(), SimulationError>;
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for &mut S {
    fn emit(&mut self, elapsed: f64, metrics: &Metrics) -> Result<(), SimulationError> {
        (**self).emit(elapsed, metrics)
    }
}

/// An in-memory sink, retaining every snapshot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SnapshotLog {
    snapshots: Vec<Snapshot>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }

    /// The time series of one metric, for output analysis.
    pub fn series(&self, metric: &str) -> Vec<f64> {
        self.snapshots
            .iter()
            .filter_map(|snapshot| snapshot.metrics.get(metric).copied())
            .collect()
    }
}

impl SnapshotSink for SnapshotLog {
    fn emit(&mut self, elapsed: f64, metrics: &Metrics) -> Result<(), SimulationError> {
        self.snapshots.push(Snapshot {
            elapsed,
            metrics: metrics.clone(),
        });
        Ok(())
    }
}

/// Writes snapshots as CSV: a header of `elapsed` and the metric names,
/// written with the first snapshot, then one row per snapshot.
pub struct CsvSnapshotWriter<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvSnapshotWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            header_written: false,
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, SimulationError> {
        self.writer
            .into_inner()
            .map_err(|error| SimulationError::IOError(error.into_error()))
    }
}

impl CsvSnapshotWriter<std::fs::File> {
    /// Create, or truncate, the file at `path`.
    pub fn create<P: AsRef<std::path::Path>>(path: P) -> Result<Self, SimulationError> {
        Ok(Self::new(std::fs::File::create(path)?))
    }
}

impl<W: Write> SnapshotSink for CsvSnapshotWriter<W> {
    fn emit(&mut self, elapsed: f64, metrics: &Metrics) -> Result<(), SimulationError> {
        if !self.header_written {
            self.writer.write_record(
                std::iter::once("elapsed").chain(metrics.keys().map(String::as_str)),
            )?;
            self.header_written = true;
        }
        self.writer.write_record(
            std::iter::once(elapsed.to_string()).chain(metrics.values().map(f64::to_string)),
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
