//! Pipelines are described declaratively, in YAML or JSON, and assembled
//! into a runnable `Simulation` by `pipeline::build`.
//!
//! ```yaml
//! name: Single channel
//! seed: 7
//! generator:
//!   name: arrivals
//!   intervalMin: 1.0
//!   intervalMax: 3.0
//! stages:
//!   - queue: line
//!     processor: clerk
//!     serviceMin: 1.0
//!     serviceMax: 2.5
//! termination:
//!   type: completions
//!   count: 100
//! ```

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// A generator feeding one or more stages in series.  The generator takes
/// the source role; the processor named by `sink` (by default the last
/// one) takes the sink role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub generator: GeneratorConfig,
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub sink: Option<String>,
    pub termination: Termination,
    /// Upper bound on the ticks of any run; exceeding it is an error.
    #[serde(default)]
    pub tick_limit: Option<u64>,
    #[serde(default)]
    pub store_records: bool,
}

fn default_seed() -> u64 {
    42
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub name: String,
    pub interval_min: f64,
    pub interval_max: f64,
    #[serde(default = "one")]
    pub batch_min: usize,
    #[serde(default = "one")]
    pub batch_max: usize,
}

/// A queue and the processor that serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    pub queue: String,
    pub processor: String,
    pub service_min: f64,
    pub service_max: f64,
}

/// When a run stops: after a fixed number of ticks, or once a number of
/// transacts have been generated and all of them completed at the sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Termination {
    Ticks { ticks: u64 },
    Completions { count: usize },
}

impl PipelineConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_yaml(&self) -> Result<String, SimulationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The name of the processor holding the sink role.
    pub fn sink_name(&self) -> Option<&str> {
        match &self.sink {
            Some(sink) => Some(sink.as_str()),
            None => self.stages.last().map(|stage| stage.processor.as_str()),
        }
    }
}
