use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{Place, PlaceId, Transition, TransitionId};

/// Metric name to value, in the order the metrics were designated.
pub type Metrics = IndexMap<String, f64>;

fn single_server() -> f64 {
    1.0
}

/// A quantity of a net that is reported as a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Observable {
    /// Time-weighted mean marking of a place, e.g. a mean queue length.
    MeanMarking { place: PlaceId },
    /// Current marking of a place, e.g. a count of served customers.
    Marking { place: PlaceId },
    /// Time-weighted mean number of in-flight firings of a transition,
    /// divided by the number of servers it represents.  For a transition
    /// guarded by server tokens, this is the server utilization.
    MeanLoad {
        transition: TransitionId,
        #[serde(default = "single_server")]
        servers: f64,
    },
    /// Total marking of the numerator places over the total marking of the
    /// denominator places, e.g. a loss probability.  Zero while the
    /// denominator is empty.
    Share {
        numerator: Vec<PlaceId>,
        denominator: Vec<PlaceId>,
    },
}

impl Observable {
    pub fn evaluate(&self, places: &[Place], transitions: &[Transition]) -> f64 {
        match self {
            Observable::MeanMarking { place } => places[place.0].mean_marking(),
            Observable::Marking { place } => places[place.0].tokens() as f64,
            Observable::MeanLoad {
                transition,
                servers,
            } => transitions[transition.0].mean_load() / servers,
            Observable::Share {
                numerator,
                denominator,
            } => {
                let total = |ids: &[PlaceId]| -> u64 {
                    ids.iter().map(|place| places[place.0].tokens()).sum()
                };
                match total(&denominator[..]) {
                    0 => 0.0,
                    denominator_total => total(&numerator[..]) as f64 / denominator_total as f64,
                }
            }
        }
    }

    pub(crate) fn places(&self) -> Vec<PlaceId> {
        match self {
            Observable::MeanMarking { place } | Observable::Marking { place } => vec![*place],
            Observable::MeanLoad { .. } => Vec::new(),
            Observable::Share {
                numerator,
                denominator,
            } => numerator.iter().chain(denominator.iter()).copied().collect(),
        }
    }

    pub(crate) fn transitions(&self) -> Vec<TransitionId> {
        match self {
            Observable::MeanLoad { transition, .. } => vec![*transition],
            _ => Vec::new(),
        }
    }
}

/// The metrics reported for a net without designated observables: the mean
/// load of every transition, then the mean and current marking of every
/// place.
pub fn default_metrics(places: &[Place], transitions: &[Transition]) -> Metrics {
    let mut metrics = Metrics::new();
    transitions.iter().for_each(|transition| {
        metrics.insert(
            format!["Transition {} mean load", transition.name()],
            transition.mean_load(),
        );
    });
    places.iter().for_each(|place| {
        metrics.insert(
            format!["Place {} mean marking", place.name()],
            place.mean_marking(),
        );
        metrics.insert(
            format!["Place {} current marking", place.name()],
            place.tokens() as f64,
        );
    });
    metrics
}
