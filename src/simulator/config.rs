use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Net;
use crate::input_modeling::Delay;
use crate::models::{Place, PlaceId, Transition};
use crate::output_analysis::Observable;
use crate::utils::errors::SimulationError;

fn unit_weight() -> u64 {
    1
}

fn default_probability() -> f64 {
    1.0
}

fn single_server() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceConfig {
    pub name: String,
    #[serde(default)]
    pub tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcConfig {
    pub place: String,
    #[serde(default = "unit_weight")]
    pub weight: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionConfig {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<ArcConfig>,
    #[serde(default)]
    pub outputs: Vec<ArcConfig>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_probability")]
    pub probability: f64,
    #[serde(default)]
    pub delay: Delay,
}

/// An `Observable`, referring to places and transitions by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObservableConfig {
    MeanMarking {
        place: String,
    },
    Marking {
        place: String,
    },
    MeanLoad {
        transition: String,
        #[serde(default = "single_server")]
        servers: f64,
    },
    Share {
        numerator: Vec<String>,
        denominator: Vec<String>,
    },
}

/// The declarative description of a net.  Arcs, metrics and warm-up
/// resets refer to places and transitions by name; `build` resolves the
/// names into arena indices.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetConfig {
    pub places: Vec<PlaceConfig>,
    pub transitions: Vec<TransitionConfig>,
    #[serde(default)]
    pub metrics: IndexMap<String, ObservableConfig>,
    #[serde(default)]
    pub warmup_resets: Vec<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetConfig {
    pub fn build(self) -> Result<Net, SimulationError> {
        let mut net = Net::default();
        self.places
            .into_iter()
            .try_for_each(|place| net.add_place(Place::new(place.name, place.tokens)).map(|_| ()))?;
        self.transitions
            .into_iter()
            .try_for_each(|config| -> Result<(), SimulationError> {
                let mut transition = Transition::new(config.name)
                    .with_priority(config.priority)
                    .with_probability(config.probability)
                    .with_delay(config.delay);
                for arc in config.inputs.iter() {
                    transition = transition.input(net.place_id(&arc.place)?, arc.weight);
                }
                for arc in config.outputs.iter() {
                    transition = transition.output(net.place_id(&arc.place)?, arc.weight);
                }
                net.add_transition(transition)?;
                Ok(())
            })?;
        self.metrics
            .into_iter()
            .try_for_each(|(name, observable)| -> Result<(), SimulationError> {
                let observable = resolve(&net, observable)?;
                net.observe(name, observable)
            })?;
        self.warmup_resets
            .iter()
            .try_for_each(|name| -> Result<(), SimulationError> {
                let place = net.place_id(name)?;
                net.reset_on_warmup(place)
            })?;
        Ok(match self.seed {
            Some(seed) => net.with_seed(seed),
            None => net,
        })
    }
}

fn resolve(net: &Net, observable: ObservableConfig) -> Result<Observable, SimulationError> {
    let place_ids = |names: &[String]| -> Result<Vec<PlaceId>, SimulationError> {
        names.iter().map(|name| net.place_id(name)).collect()
    };
    Ok(match observable {
        ObservableConfig::MeanMarking { place } => Observable::MeanMarking {
            place: net.place_id(&place)?,
        },
        ObservableConfig::Marking { place } => Observable::Marking {
            place: net.place_id(&place)?,
        },
        ObservableConfig::MeanLoad {
            transition,
            servers,
        } => Observable::MeanLoad {
            transition: net.transition_id(&transition)?,
            servers,
        },
        ObservableConfig::Share {
            numerator,
            denominator,
        } => Observable::Share {
            numerator: place_ids(&numerator[..])?,
            denominator: place_ids(&denominator[..])?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_SERVER: &str = r#"
places:
  - name: source
    tokens: 1
  - name: queue
  - name: idle
    tokens: 1
  - name: served
transitions:
  - name: arrive
    inputs: [{place: source}]
    outputs: [{place: source}, {place: queue}]
    delay:
      random:
        exp:
          lambda: 1.0
  - name: serve
    inputs: [{place: queue}, {place: idle}]
    outputs: [{place: idle}, {place: served}]
    delay:
      constant:
        value: 0.5
metrics:
  queue:
    meanMarking:
      place: queue
  utilization:
    meanLoad:
      transition: serve
warmupResets: [served]
seed: 7
"#;

    #[test]
    fn yaml_config_resolves_names() {
        let net = Net::from_yaml(SINGLE_SERVER).unwrap();
        assert_eq!(net.places().len(), 4);
        assert_eq!(net.transitions().len(), 2);
        let serve = net.transition(net.transition_id("serve").unwrap()).unwrap();
        assert_eq!(serve.inputs().len(), 2);
        assert_eq!(serve.inputs()[1].place, net.place_id("idle").unwrap());
        let binding = net.metrics();
        let names: Vec<&String> = binding.keys().collect();
        assert_eq!(names, vec!["queue", "utilization"]);
    }

    #[test]
    fn unknown_place_is_reported_by_name() {
        let config = r#"{
            "places": [{"name": "p"}],
            "transitions": [{"name": "t", "inputs": [{"place": "missing"}]}]
        }"#;
        match Net::from_json(config) {
            Err(SimulationError::PlaceNotFound(name)) => assert_eq!(name, "missing"),
            other => panic!("expected a missing place, found {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn duplicate_places_are_rejected() {
        let config = r#"{"places": [{"name": "p"}, {"name": "p"}], "transitions": []}"#;
        assert!(matches!(
            Net::from_json(config),
            Err(SimulationError::InvalidModelConfiguration(_))
        ));
    }

    #[test]
    fn zero_weight_arcs_are_rejected() {
        let config = r#"{
            "places": [{"name": "p"}],
            "transitions": [{"name": "t", "outputs": [{"place": "p", "weight": 0}]}]
        }"#;
        assert!(matches!(
            Net::from_json(config),
            Err(SimulationError::InvalidModelConfiguration(_))
        ));
    }
}
