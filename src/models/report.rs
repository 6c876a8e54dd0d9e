use std::fmt;

use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a device's statistics, as returned by
/// `Reportable::report`.  Reports serialize with a `type` tag, and render
/// as an underlined text block through `Display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceReport {
    Generator(GeneratorReport),
    Queue(QueueReport),
    Processor(ProcessorReport),
    Custom(CustomReport),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorReport {
    pub name: String,
    pub ticks: u64,
    pub generated: usize,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueReport {
    pub name: String,
    pub ticks: u64,
    pub length: usize,
    pub max_length: usize,
    pub average_length: f64,
    pub enqueued: usize,
    pub min_wait: Option<u64>,
    pub max_wait: u64,
    pub average_wait: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorReport {
    pub name: String,
    pub ticks: u64,
    pub completed: usize,
    pub busy_time: f64,
    pub idle_time: f64,
    pub utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReport {
    pub name: String,
    pub ticks: u64,
    pub status: String,
}

impl DeviceReport {
    pub fn name(&self) -> &str {
        match self {
            DeviceReport::Generator(report) => &report.name,
            DeviceReport::Queue(report) => &report.name,
            DeviceReport::Processor(report) => &report.name,
            DeviceReport::Custom(report) => &report.name,
        }
    }
}

fn heading(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    writeln!(f, "{}:", name)?;
    writeln!(f, "{}", "-".repeat(name.chars().count() + 1))
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, self.name())?;
        match self {
            DeviceReport::Generator(report) => {
                writeln!(f, "Transactions Generated: {}", report.generated)
            }
            DeviceReport::Queue(report) => {
                writeln!(f, "Current Length: {}", report.length)?;
                writeln!(f, "Max Length:     {}", report.max_length)?;
                writeln!(f, "Average Length: {:.3}", report.average_length)?;
                match report.min_wait {
                    Some(min_wait) => writeln!(f, "Min Time:       {}", min_wait)?,
                    None => writeln!(f, "Min Time:       -")?,
                }
                writeln!(f, "Max Time:       {}", report.max_wait)?;
                writeln!(f, "Average Time:   {:.3}", report.average_wait)
            }
            DeviceReport::Processor(report) => {
                writeln!(f, "Transactions Processed: {}", report.completed)?;
                writeln!(f, "Busy Time:              {:.3}", report.busy_time)?;
                writeln!(f, "Idle Time:              {:.3}", report.idle_time)?;
                writeln!(f, "Utilization Rate:       {:.3}", report.utilization)
            }
            DeviceReport::Custom(report) => writeln!(f, "Status: {}", report.status),
        }
    }
}
