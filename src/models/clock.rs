use serde::{Deserialize, Serialize};

use super::DeviceRecord;

/// The identity and model time shared by every device: an immutable name,
/// the number of ticks advanced so far, and the optional record log.
/// Concrete devices compose a `Clock` rather than re-implementing the
/// counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clock {
    name: String,
    ticks: u64,
    #[serde(default)]
    store_records: bool,
    #[serde(default)]
    records: Vec<DeviceRecord>,
}

impl Clock {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ticks: 0,
            store_records: false,
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Count one unit of model time.  This is the only way the tick counter
    /// changes.
    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn set_store_records(&mut self, store_records: bool) {
        self.store_records = store_records;
    }

    pub fn record(&mut self, action: &str, subject: String) {
        if self.store_records {
            self.records.push(DeviceRecord {
                tick: self.ticks,
                action: String::from(action),
                subject,
            });
        }
    }

    pub fn records(&self) -> &Vec<DeviceRecord> {
        &self.records
    }
}
