use super::{DeviceRecord, DeviceReport};
use crate::utils::errors::SimulationError;

/// The `Device` trait defines everything required for a device to operate
/// within the fixed-increment simulation.  Every device is advanced exactly
/// once per tick with `advance`, and exposes its immutable `name` and the
/// number of ticks it has been advanced.
pub trait Device {
    fn name(&self) -> &str;
    fn ticks(&self) -> u64;
    fn advance(&mut self) -> Result<(), SimulationError>;
}

/// The additional status, reporting, and record-keeping methods of
/// `Reportable` provide improved simulation reasoning, reporting, and
/// debugging, but do not impact simulation execution or results.
pub trait Reportable {
    fn status(&self) -> String;
    fn report(&self) -> DeviceReport;
    fn records(&self) -> &Vec<DeviceRecord>;
}

/// A `ReportableDevice` has the tick-driven behavior of trait `Device` and
/// the status reporting and record keeping mechanisms of trait
/// `Reportable`.
pub trait ReportableDevice: Device + Reportable {}
