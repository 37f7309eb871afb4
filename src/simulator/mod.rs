//! The simulator module provides the mechanics to execute a timed Petri net
//! via discrete event simulation.  A `Net` owns its places, transitions,
//! clock and random number generator, and alternates between two phases:
//!
//! * Conflict resolution: enabled transitions fire, one at a time, until
//!   none is enabled.  The highest priority always wins, and ties are
//!   broken randomly in proportion to the transition probabilities.
//! * Time advance: the clock jumps to the earliest pending completion,
//!   statistics are accumulated over the elapsed interval, and every
//!   firing due at the new time completes.
//!
//! `Net` and `WebNet` are used for Rust- and npm-based projects,
//! respectively.  Nets are built programmatically with `add_place` and
//! `add_transition`, or declaratively from a JSON/YAML `NetConfig`.

use std::f64::INFINITY;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use crate::input_modeling::{seeded_rng, DynRng};
use crate::models::{Place, PlaceId, Transition, TransitionId};
use crate::output_analysis::metrics::default_metrics;
use crate::output_analysis::{Metrics, Observable, SnapshotSink};
use crate::utils::errors::SimulationError;
use crate::utils::{set_panic_hook, weighted_choice};

pub mod config;
pub mod services;
pub mod web;

pub use self::config::NetConfig;
pub use self::services::Services;
pub use self::web::Net as WebNet;

/// The `Net` struct is the core of petrisim, and includes everything needed
/// to run a simulation - places, transitions, the designated observables,
/// and a random number generator.  Places and transitions live in dense
/// arenas; their insertion order is the enumeration order of the event
/// loop.
///
/// A serialized net is a snapshot of its arenas, statistics and clock.
/// Deserialization replays the snapshot through `add_place`,
/// `add_transition`, `observe` and `reset_on_warmup`, so a snapshot with
/// dangling indices is rejected instead of producing a net that panics.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Net {
    places: Vec<Place>,
    transitions: Vec<Transition>,
    observables: IndexMap<String, Observable>,
    warmup_resets: Vec<PlaceId>,
    services: Services,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetSnapshot {
    places: Vec<Place>,
    transitions: Vec<Transition>,
    #[serde(default)]
    observables: IndexMap<String, Observable>,
    #[serde(default)]
    warmup_resets: Vec<PlaceId>,
    #[serde(default)]
    services: Services,
}

impl NetSnapshot {
    fn restore(self) -> Result<Net, SimulationError> {
        let mut net = Net::post(self.places, self.transitions)?;
        self.observables
            .into_iter()
            .try_for_each(|(name, observable)| net.observe(name, observable))?;
        self.warmup_resets
            .into_iter()
            .try_for_each(|place| net.reset_on_warmup(place))?;
        net.services = self.services;
        Ok(net)
    }
}

impl<'de> Deserialize<'de> for Net {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NetSnapshot::deserialize(deserializer)?
            .restore()
            .map_err(de::Error::custom)
    }
}

impl Net {
    /// This constructor method creates a net from ordered places and
    /// transitions, with the transitions already wired to the places by
    /// index.
    pub fn post(places: Vec<Place>, transitions: Vec<Transition>) -> Result<Self, SimulationError> {
        set_panic_hook();
        let mut net = Self::default();
        places
            .into_iter()
            .try_for_each(|place| net.add_place(place).map(|_| ()))?;
        transitions
            .into_iter()
            .try_for_each(|transition| net.add_transition(transition).map(|_| ()))?;
        Ok(net)
    }

    /// A JSON `NetConfig` interface to `post`.
    pub fn from_json(config: &str) -> Result<Self, SimulationError> {
        serde_json::from_str::<NetConfig>(config)?.build()
    }

    /// A YAML `NetConfig` interface to `post`.
    pub fn from_yaml(config: &str) -> Result<Self, SimulationError> {
        serde_yaml::from_str::<NetConfig>(config)?.build()
    }

    /// Reseed the random number generator, for reproducible replications.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.services.set_global_rng(seeded_rng(seed));
        self
    }

    pub fn with_rng(mut self, rng: DynRng) -> Self {
        self.services.set_global_rng(rng);
        self
    }

    /// Append a place.  Place names must be unique within the net.
    pub fn add_place(&mut self, place: Place) -> Result<PlaceId, SimulationError> {
        if self.places.iter().any(|other| other.name() == place.name()) {
            return Err(SimulationError::InvalidModelConfiguration(format![
                "duplicate place {}",
                place.name()
            ]));
        }
        self.places.push(place);
        Ok(PlaceId(self.places.len() - 1))
    }

    /// Append a transition.  It needs at least one input arc, its arcs must
    /// refer to places already in the net with positive weights, and its
    /// probability must be a finite, non-negative number.
    pub fn add_transition(
        &mut self,
        transition: Transition,
    ) -> Result<TransitionId, SimulationError> {
        if self
            .transitions
            .iter()
            .any(|other| other.name() == transition.name())
        {
            return Err(SimulationError::InvalidModelConfiguration(format![
                "duplicate transition {}",
                transition.name()
            ]));
        }
        // Always enabled, so conflict resolution would never end
        if transition.inputs().is_empty() {
            return Err(SimulationError::InvalidModelConfiguration(format![
                "transition {} has no input arcs",
                transition.name()
            ]));
        }
        if !(transition.probability() >= 0.0 && transition.probability().is_finite()) {
            return Err(SimulationError::InvalidModelConfiguration(format![
                "transition {} has an invalid probability of {}",
                transition.name(),
                transition.probability()
            ]));
        }
        transition
            .inputs()
            .iter()
            .chain(transition.outputs().iter())
            .try_for_each(|arc| {
                if arc.place.0 >= self.places.len() {
                    Err(SimulationError::PlaceNotFound(format!["#{}", arc.place.0]))
                } else if arc.weight == 0 {
                    Err(SimulationError::InvalidModelConfiguration(format![
                        "transition {} has a zero weight arc to place {}",
                        transition.name(),
                        self.places[arc.place.0].name()
                    ]))
                } else {
                    Ok(())
                }
            })?;
        self.transitions.push(transition);
        Ok(TransitionId(self.transitions.len() - 1))
    }

    /// Designate a metric.  Once any metric is designated, `metrics` reports
    /// exactly the designated ones, in designation order.  A `MeanLoad` needs
    /// a positive, finite number of servers.
    pub fn observe(
        &mut self,
        name: impl Into<String>,
        observable: Observable,
    ) -> Result<(), SimulationError> {
        let name = name.into();
        if let Observable::MeanLoad { servers, .. } = observable {
            if !(servers > 0.0 && servers.is_finite()) {
                return Err(SimulationError::InvalidModelConfiguration(format![
                    "metric {} is observed over {} servers",
                    name, servers
                ]));
            }
        }
        observable.places().iter().try_for_each(|place| {
            self.place(*place).map(|_| ())
        })?;
        observable
            .transitions()
            .iter()
            .try_for_each(|transition| self.transition(*transition).map(|_| ()))?;
        self.observables.insert(name, observable);
        Ok(())
    }

    /// Designate a counter place, zeroed whenever a statistics window
    /// begins, e.g. a count of served or lost customers.
    pub fn reset_on_warmup(&mut self, place: PlaceId) -> Result<(), SimulationError> {
        self.place(place)?;
        if !self.warmup_resets.contains(&place) {
            self.warmup_resets.push(place);
        }
        Ok(())
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn place(&self, id: PlaceId) -> Result<&Place, SimulationError> {
        self.places
            .get(id.0)
            .ok_or_else(|| SimulationError::PlaceNotFound(format!["#{}", id.0]))
    }

    pub fn transition(&self, id: TransitionId) -> Result<&Transition, SimulationError> {
        self.transitions
            .get(id.0)
            .ok_or_else(|| SimulationError::TransitionNotFound(format!["#{}", id.0]))
    }

    pub fn place_id(&self, name: &str) -> Result<PlaceId, SimulationError> {
        self.places
            .iter()
            .position(|place| place.name() == name)
            .map(PlaceId)
            .ok_or_else(|| SimulationError::PlaceNotFound(name.to_string()))
    }

    pub fn transition_id(&self, name: &str) -> Result<TransitionId, SimulationError> {
        self.transitions
            .iter()
            .position(|transition| transition.name() == name)
            .map(TransitionId)
            .ok_or_else(|| SimulationError::TransitionNotFound(name.to_string()))
    }

    /// Mutable access to a place marking, for setting up a scenario between
    /// runs.
    pub fn place_mut(&mut self, id: PlaceId) -> Result<&mut Place, SimulationError> {
        self.places
            .get_mut(id.0)
            .ok_or_else(|| SimulationError::PlaceNotFound(format!["#{}", id.0]))
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// An accessor method for the simulation clock.
    pub fn current_time(&self) -> f64 {
        self.services.current_time()
    }

    /// The earliest pending completion, as of the last time advance.
    pub fn next_time(&self) -> f64 {
        self.services.next_time()
    }

    /// The sum of every place marking.  Tokens consumed by in-flight
    /// firings are not counted until the firings complete.
    pub fn total_tokens(&self) -> u64 {
        self.places.iter().map(Place::tokens).sum()
    }

    /// The number of firings in flight, over every transition.
    pub fn in_flight(&self) -> usize {
        self.transitions
            .iter()
            .map(|transition| transition.pending().len())
            .sum()
    }

    /// The current metrics: the designated observables, or the default mean
    /// loads and markings when none were designated.
    pub fn metrics(&self) -> Metrics {
        if self.observables.is_empty() {
            return default_metrics(&self.places, &self.transitions);
        }
        self.observables
            .iter()
            .map(|(name, observable)| {
                (
                    name.clone(),
                    observable.evaluate(&self.places, &self.transitions),
                )
            })
            .collect()
    }

    /// Start a fresh statistics window at the current time: every running
    /// mean restarts from zero, and every counter designated with
    /// `reset_on_warmup` is emptied.  Runs call this at the end of a
    /// warm-up; callers may also call it to discard history by hand.
    pub fn begin_statistics_window(&mut self) {
        let now = self.services.current_time;
        debug!("statistics window begins at {}", now);
        self.services.statistics_origin = now;
        self.places.iter_mut().for_each(Place::reset_stats);
        self.transitions
            .iter_mut()
            .for_each(Transition::reset_stats);
        let places = &mut self.places;
        self.warmup_resets
            .iter()
            .for_each(|place| places[place.0].set_tokens(0));
    }

    /// Run for `duration` time units and return the metrics.
    ///
    /// With a positive `warmup`, the net first runs that long without
    /// statistics and then opens a fresh statistics window, so the metrics
    /// cover exactly `duration`.  Without a warm-up, the run continues the
    /// current window: the means keep accumulating from its start, which is
    /// time zero for a fresh net, and designated counters keep their tokens.
    pub fn run_for(&mut self, duration: f64, warmup: f64) -> Result<Metrics, SimulationError> {
        validate_span(duration)?;
        validate_span(warmup)?;
        self.warm_up(warmup)?;
        let horizon = self.services.current_time + duration;
        self.simulate_until(horizon, true)?;
        Ok(self.metrics())
    }

    /// Like `run_for`, but hand the metrics to `sink` every `interval` time
    /// units of the run.  The means are never reset between snapshots, and
    /// each snapshot is stamped with the time elapsed since the statistics
    /// window began.
    pub fn run_with_snapshots<S: SnapshotSink>(
        &mut self,
        duration: f64,
        interval: f64,
        warmup: f64,
        mut sink: S,
    ) -> Result<Metrics, SimulationError> {
        validate_span(duration)?;
        validate_span(warmup)?;
        if !(interval > 0.0 && interval.is_finite()) {
            return Err(SimulationError::InvalidInterval);
        }
        self.warm_up(warmup)?;
        let start = self.services.current_time;
        let tolerance = interval * 1.0e-9;
        let mut step = 1;
        loop {
            let offset = interval * step as f64;
            if offset > duration + tolerance {
                break;
            }
            self.simulate_until(start + offset, true)?;
            let elapsed = self.services.statistics_elapsed();
            debug!("snapshot at {} of the statistics window", elapsed);
            sink.emit(elapsed, &self.metrics())?;
            step += 1;
        }
        self.simulate_until(start + duration, true)?;
        Ok(self.metrics())
    }

    fn warm_up(&mut self, warmup: f64) -> Result<(), SimulationError> {
        if warmup > 0.0 {
            let horizon = self.services.current_time + warmup;
            self.simulate_until(horizon, false)?;
            debug!("warm-up ends at {}", horizon);
            self.begin_statistics_window();
        }
        Ok(())
    }

    /// The event loop.  Each iteration resolves every instantaneous
    /// conflict, advances the clock to the next completion (never past
    /// `horizon`), and completes the firings due at the new time.
    fn simulate_until(&mut self, horizon: f64, collect: bool) -> Result<(), SimulationError> {
        while self.services.current_time < horizon {
            self.resolve_conflicts()?;
            let next_time = self
                .transitions
                .iter()
                .fold(INFINITY, |min, transition| {
                    f64::min(min, transition.next_completion_time())
                });
            if next_time == INFINITY {
                return Err(SimulationError::Deadlock {
                    time: self.services.current_time,
                });
            }
            self.services.next_time = next_time;
            let step_end = f64::min(next_time, horizon);
            if collect {
                self.update_stats(step_end);
            }
            self.services.current_time = step_end;
            if step_end == next_time {
                self.complete_firings(next_time);
            }
        }
        Ok(())
    }

    /// Fire enabled transitions until none is enabled.  The enabled set is
    /// recomputed after every firing.
    fn resolve_conflicts(&mut self) -> Result<(), SimulationError> {
        loop {
            let places = &self.places;
            let enabled: Vec<usize> = (0..self.transitions.len())
                .filter(|index| self.transitions[*index].enabled(places))
                .collect();
            let top_priority = match enabled
                .iter()
                .map(|index| self.transitions[*index].priority())
                .max()
            {
                Some(priority) => priority,
                None => return Ok(()),
            };
            let candidates: Vec<(f64, usize)> = enabled
                .into_iter()
                .filter(|index| self.transitions[*index].priority() == top_priority)
                .map(|index| (self.transitions[index].probability(), index))
                .collect();
            let time = self.services.current_time;
            let chosen = match weighted_choice(&candidates, &mut *self.services.global_rng) {
                Ok(index) => *index,
                Err(SimulationError::WeightedError(_)) => {
                    return Err(SimulationError::ZeroWeightConflict { time })
                }
                Err(error) => return Err(error),
            };
            let completion = self.transitions[chosen].fire_input(
                &mut self.places,
                time,
                &mut *self.services.global_rng,
            )?;
            trace!(
                "{} fired at {}, completes at {}",
                self.transitions[chosen].name(),
                time,
                completion
            );
        }
    }

    fn complete_firings(&mut self, time: f64) {
        let places = &mut self.places;
        self.transitions.iter_mut().for_each(|transition| {
            let completed = transition.fire_outputs_at(&mut places[..], time);
            if completed > 0 {
                trace!("{} completed {} firing(s) at {}", transition.name(), completed, time);
            }
        });
    }

    /// Accumulate the state held over `[current_time, step_end)`, in the
    /// frame of the statistics window.
    fn update_stats(&mut self, step_end: f64) {
        let origin = self.services.statistics_origin;
        let t0 = self.services.current_time - origin;
        let t1 = step_end - origin;
        self.places
            .iter_mut()
            .for_each(|place| place.update_stats(t0, t1));
        self.transitions
            .iter_mut()
            .for_each(|transition| transition.update_stats(t0, t1));
    }
}

fn validate_span(span: f64) -> Result<(), SimulationError> {
    if span >= 0.0 && span.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::InvalidInterval)
    }
}
