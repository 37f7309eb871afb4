use std::f64::INFINITY;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Place, PlaceId};
use crate::input_modeling::Delay;
use crate::output_analysis::TimeWeightedMean;
use crate::utils::errors::SimulationError;

/// A weighted arc between a transition and a place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    pub place: PlaceId,
    pub weight: u64,
}

/// The absolute completion times of the in-flight firings of a transition.
/// Duplicates are meaningful: two firings completing at the same instant
/// are two entries.  Nets are small enough that a flat, unordered vector
/// with linear scans beats any ordered structure.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingCompletions(Vec<f64>);

impl PendingCompletions {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The earliest completion time, or infinity when nothing is in flight.
    pub fn next(&self) -> f64 {
        self.0.iter().fold(INFINITY, |min, time| f64::min(min, *time))
    }

    pub fn contains(&self, time: f64) -> bool {
        self.0.iter().any(|pending| *pending == time)
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    fn push(&mut self, time: f64) {
        self.0.push(time);
    }

    /// Remove a single instance of `time`, returning whether one was found.
    fn remove_one(&mut self, time: f64) -> bool {
        match self.0.iter().position(|pending| *pending == time) {
            Some(index) => {
                self.0.swap_remove(index);
                true
            }
            None => false,
        }
    }
}

fn default_probability() -> f64 {
    1.0
}

/// A transition consumes tokens from its input places when it fires, and
/// produces tokens into its output places once its delay has elapsed.  Any
/// number of firings may be in flight at once, each with its own sampled
/// delay, so a single transition can model a multi-server resource.
///
/// Among simultaneously enabled transitions, a higher `priority` always
/// wins.  Ties are broken randomly, in proportion to `probability`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    name: String,
    #[serde(default)]
    inputs: Vec<Arc>,
    #[serde(default)]
    outputs: Vec<Arc>,
    #[serde(default)]
    priority: i32,
    #[serde(default = "default_probability")]
    probability: f64,
    #[serde(default)]
    delay: Delay,
    #[serde(default)]
    pending: PendingCompletions,
    #[serde(default)]
    mean_load: TimeWeightedMean,
}

impl Transition {
    /// A transition with no arcs, priority 0, probability 1, and an
    /// immediate delay.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            priority: 0,
            probability: default_probability(),
            delay: Delay::Immediate,
            pending: PendingCompletions::default(),
            mean_load: TimeWeightedMean::default(),
        }
    }

    pub fn with_delay(mut self, delay: impl Into<Delay>) -> Self {
        self.delay = delay.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Add an input arc.  Adding a second arc from the same place replaces
    /// the weight of the first.
    pub fn input(mut self, place: PlaceId, weight: u64) -> Self {
        set_arc(&mut self.inputs, place, weight);
        self
    }

    /// Add an output arc.  Adding a second arc to the same place replaces
    /// the weight of the first.
    pub fn output(mut self, place: PlaceId, weight: u64) -> Self {
        set_arc(&mut self.outputs, place, weight);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Arc] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Arc] {
        &self.outputs
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn pending(&self) -> &PendingCompletions {
        &self.pending
    }

    /// The time-weighted mean number of in-flight firings.
    pub fn mean_load(&self) -> f64 {
        self.mean_load.mean()
    }

    /// A transition is enabled when every input place holds at least the
    /// weight of its arc.
    pub fn enabled(&self, places: &[Place]) -> bool {
        self.inputs
            .iter()
            .all(|arc| places[arc.place.0].tokens() >= arc.weight)
    }

    /// The earliest pending completion time, or infinity.
    pub fn next_completion_time(&self) -> f64 {
        self.pending.next()
    }

    /// Start one firing at `time`: sample a delay, consume the input tokens,
    /// and schedule the completion.  Returns the scheduled completion time.
    ///
    /// The caller is expected to have checked `enabled`.  Firing a disabled
    /// transition, or sampling a negative or non-finite delay, fails without
    /// touching the marking.
    pub fn fire_input<R: Rng + ?Sized>(
        &mut self,
        places: &mut [Place],
        time: f64,
        rng: &mut R,
    ) -> Result<f64, SimulationError> {
        if !self.enabled(places) {
            return Err(SimulationError::InternalConsistency(format![
                "transition {} fired while disabled",
                self.name
            ]));
        }
        let delay = self.delay.sample(rng)?;
        if !(delay >= 0.0 && delay.is_finite()) {
            return Err(SimulationError::InvalidDelay {
                transition: self.name.clone(),
                delay,
            });
        }
        self.inputs
            .iter()
            .try_for_each(|arc| places[arc.place.0].remove_tokens(arc.weight))?;
        let completion = time + delay;
        self.pending.push(completion);
        Ok(completion)
    }

    /// Complete every in-flight firing scheduled for exactly `time`,
    /// producing the output tokens once per firing.  Returns the number of
    /// firings completed.
    pub fn fire_outputs_at(&mut self, places: &mut [Place], time: f64) -> usize {
        let mut completed = 0;
        while self.pending.remove_one(time) {
            self.outputs
                .iter()
                .for_each(|arc| places[arc.place.0].add_tokens(arc.weight));
            completed += 1;
        }
        completed
    }

    pub(crate) fn update_stats(&mut self, t0: f64, t1: f64) {
        self.mean_load.update(self.pending.len() as f64, t0, t1);
    }

    pub(crate) fn reset_stats(&mut self) {
        self.mean_load.reset();
    }
}

fn set_arc(arcs: &mut Vec<Arc>, place: PlaceId, weight: u64) {
    match arcs.iter_mut().find(|arc| arc.place == place) {
        Some(arc) => arc.weight = weight,
        None => arcs.push(Arc { place, weight }),
    }
}
