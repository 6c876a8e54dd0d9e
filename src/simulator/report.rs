use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::DeviceReport;
use crate::utils::errors::SimulationError;

/// The state of a whole simulation: its name, the elapsed model time, and
/// a report per device in advancement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub name: String,
    pub ticks: u64,
    pub devices: Vec<DeviceReport>,
}

impl Report {
    pub fn device(&self, name: &str) -> Option<&DeviceReport> {
        self.devices.iter().find(|device| device.name() == name)
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Modeling Time Units: {}", self.ticks)?;
        writeln!(f)?;
        for device in &self.devices {
            writeln!(f, "{}", device)?;
        }
        Ok(())
    }
}
