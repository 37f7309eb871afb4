use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::output_analysis::SnapshotLog;
use crate::utils::errors::SimulationError;
use crate::utils::set_panic_hook;

use super::Net as CoreNet;

fn to_js(error: SimulationError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// The web `Net` provides JS/WASM-compatible interfaces to the core `Net`
/// struct.  For additional insight on these methods, refer to the
/// associated core `Net` methods.  Configurations, metrics and snapshots
/// cross the boundary as JSON or YAML strings, and errors are returned as
/// string `JsValue`s.
#[wasm_bindgen]
pub struct Net {
    net: CoreNet,
}

#[wasm_bindgen]
impl Net {
    /// A JS/WASM interface for `Net::from_json`.
    pub fn post_json(config: &str) -> Result<Net, JsValue> {
        set_panic_hook();
        Ok(Self {
            net: CoreNet::from_json(config).map_err(to_js)?,
        })
    }

    /// A JS/WASM interface for `Net::from_yaml`.
    pub fn post_yaml(config: &str) -> Result<Net, JsValue> {
        set_panic_hook();
        Ok(Self {
            net: CoreNet::from_yaml(config).map_err(to_js)?,
        })
    }

    /// Get a JSON representation of the full net state, including markings,
    /// in-flight firings and accumulated statistics.
    pub fn get_json(&self) -> Result<String, JsValue> {
        serde_json::to_string_pretty(&self.net).map_err(|error| to_js(error.into()))
    }

    /// Get a YAML representation of the full net state.
    pub fn get_yaml(&self) -> Result<String, JsValue> {
        serde_yaml::to_string(&self.net).map_err(|error| to_js(error.into()))
    }

    /// An interface to `Net.current_time`.
    pub fn current_time(&self) -> f64 {
        self.net.current_time()
    }

    /// A JS/WASM interface for `Net.metrics`, which converts the metric
    /// names to a JavaScript Array.
    pub fn metric_names_js(&self) -> Array {
        self.net
            .metrics()
            .keys()
            .map(|name| JsValue::from_str(name))
            .collect()
    }

    /// A JS/WASM interface for `Net.metrics`, as a JSON object.
    pub fn metrics_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.net.metrics()).map_err(|error| to_js(error.into()))
    }

    /// A JS/WASM interface for `Net.run_for`, which converts the returned
    /// metrics to a JSON object.
    pub fn run_for_json(&mut self, duration: f64, warmup: f64) -> Result<String, JsValue> {
        let metrics = self.net.run_for(duration, warmup).map_err(to_js)?;
        serde_json::to_string(&metrics).map_err(|error| to_js(error.into()))
    }

    /// A JS/WASM interface for `Net.run_with_snapshots`, which converts the
    /// emitted snapshots to a JSON array.
    pub fn run_with_snapshots_json(
        &mut self,
        duration: f64,
        interval: f64,
        warmup: f64,
    ) -> Result<String, JsValue> {
        let mut log = SnapshotLog::new();
        self.net
            .run_with_snapshots(duration, interval, warmup, &mut log)
            .map_err(to_js)?;
        serde_json::to_string(log.snapshots()).map_err(|error| to_js(error.into()))
    }
}

impl Net {
    /// The wrapped core net, for Rust-side inspection.
    pub fn core(&self) -> &CoreNet {
        &self.net
    }
}
