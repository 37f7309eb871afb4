use petrisim::output_analysis::{Metrics, Snapshot};
use petrisim::simulator::WebNet;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

const CLOCKED_SERVER: &str = r#"
{
    "places": [
        {"name": "clock", "tokens": 1},
        {"name": "queue", "tokens": 4},
        {"name": "idle", "tokens": 1},
        {"name": "served"}
    ],
    "transitions": [
        {
            "name": "tick",
            "inputs": [{"place": "clock"}],
            "outputs": [{"place": "clock"}],
            "delay": {"constant": {"value": 1.0}}
        },
        {
            "name": "serve",
            "inputs": [{"place": "queue"}, {"place": "idle"}],
            "outputs": [{"place": "idle"}, {"place": "served"}],
            "delay": {"constant": {"value": 2.0}}
        }
    ],
    "metrics": {
        "queue": {"meanMarking": {"place": "queue"}},
        "served": {"marking": {"place": "served"}},
        "utilization": {"meanLoad": {"transition": "serve"}}
    }
}"#;

#[test]
#[wasm_bindgen_test]
fn json_net_runs_deterministically() {
    let mut net = WebNet::post_json(CLOCKED_SERVER).unwrap();
    let metrics: Metrics = serde_json::from_str(&net.run_for_json(8.0, 0.0).unwrap()).unwrap();
    // Queue of 3, 2, 1, 0 over consecutive service times of 2
    assert!((metrics["queue"] - 1.5).abs() < 1.0e-12);
    assert_eq!(metrics["served"], 4.0);
    assert!((metrics["utilization"] - 1.0).abs() < 1.0e-12);
    assert_eq!(net.current_time(), 8.0);
}

#[test]
#[wasm_bindgen_test]
fn yaml_net_snapshots_as_json() {
    let config = r#"
places:
  - name: clock
    tokens: 1
  - name: ticks
transitions:
  - name: tick
    inputs: [{place: clock}]
    outputs: [{place: clock}, {place: ticks}]
    delay:
      constant:
        value: 1.0
metrics:
  ticks:
    marking:
      place: ticks
"#;
    let mut net = WebNet::post_yaml(config).unwrap();
    let snapshots: Vec<Snapshot> =
        serde_json::from_str(&net.run_with_snapshots_json(6.0, 2.0, 0.0).unwrap()).unwrap();
    let ticks: Vec<f64> = snapshots
        .iter()
        .map(|snapshot| snapshot.metrics["ticks"])
        .collect();
    assert_eq!(ticks, vec![2.0, 4.0, 6.0]);
}

#[test]
#[wasm_bindgen_test]
fn net_state_is_exported() {
    let mut net = WebNet::post_json(CLOCKED_SERVER).unwrap();
    net.run_for_json(3.0, 0.0).unwrap();
    let state: serde_json::Value = serde_json::from_str(&net.get_json().unwrap()).unwrap();
    assert_eq!(state["places"][3]["tokens"], 1);
    assert!(net.get_yaml().unwrap().contains("serve"));
    let metrics: Metrics = serde_json::from_str(&net.metrics_json().unwrap()).unwrap();
    assert_eq!(metrics.keys().collect::<Vec<_>>(), vec!["queue", "served", "utilization"]);
    assert_eq!(net.core().place(net.core().place_id("queue").unwrap()).unwrap().tokens(), 2);
}
