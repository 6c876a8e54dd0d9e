//! The simulator module provides the mechanics to orchestrate devices via
//! fixed-increment time stepping.  Every step advances every device exactly
//! once, in the order the devices were added, and counts one unit of global
//! time.  Devices interact only through the notifications the driver
//! subscribes to - the `pipeline` module wires the standard generator,
//! queue, and processor pipeline this way.
//!
//! Two termination policies are supported: a fixed number of ticks
//! (`step_n`), or a fixed number of transacts generated by the source role
//! and completed at the sink role (`step_until_completed`).

use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;

use log::{info, warn};

use crate::input_modeling::UniformRNG;
use crate::models::{DeviceRecord, DeviceReport, Generator, Processor, ReportableDevice};
use crate::utils::errors::SimulationError;

pub mod config;
pub mod pipeline;
pub mod replications;
pub mod report;
pub mod services;

pub use self::config::{GeneratorConfig, PipelineConfig, StageConfig, Termination};
pub use self::replications::replicate;
pub use self::report::Report;
pub use self::services::Services;

/// A shared handle to a device owned by a simulation.
pub type DeviceHandle<D> = Rc<RefCell<D>>;

/// Mutably borrow a device, failing instead of panicking when the device is
/// re-entered while it is already being advanced.
pub(crate) fn acquire<D: ?Sized>(device: &RefCell<D>) -> Result<RefMut<'_, D>, SimulationError> {
    device.try_borrow_mut().map_err(|_| {
        SimulationError::IllegalState(String::from(
            "a device was re-entered while it was already in use",
        ))
    })
}

/// The `Simulation` struct is the core of ticksim, and includes everything
/// needed to run a simulation - devices in advancement order, the source
/// and sink roles, and the shared services.
pub struct Simulation {
    name: String,
    devices: Vec<DeviceHandle<dyn ReportableDevice>>,
    source: Option<DeviceHandle<Generator>>,
    sink: Option<DeviceHandle<Processor>>,
    termination: Option<Termination>,
    tick_limit: Option<u64>,
    services: Services,
}

impl Simulation {
    pub fn new(name: String, services: Services) -> Self {
        Self {
            name,
            devices: Vec::new(),
            source: None,
            sink: None,
            termination: None,
            tick_limit: None,
            services,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variate source to hand to devices of this simulation.
    pub fn uniform_rng(&self) -> UniformRNG {
        self.services.uniform_rng()
    }

    /// An accessor method for the simulation global time, in ticks.
    pub fn global_time(&self) -> u64 {
        self.services.global_time()
    }

    /// Take ownership of a device, appending it to the advancement order,
    /// and return a handle for wiring notifications and reading statistics.
    pub fn add_device<D: ReportableDevice + 'static>(&mut self, device: D) -> DeviceHandle<D> {
        let handle = Rc::new(RefCell::new(device));
        self.devices.push(handle.clone());
        handle
    }

    pub fn set_source(&mut self, source: DeviceHandle<Generator>) {
        self.source = Some(source);
    }

    pub fn set_sink(&mut self, sink: DeviceHandle<Processor>) {
        self.sink = Some(sink);
    }

    pub fn source(&self) -> Option<DeviceHandle<Generator>> {
        self.source.clone()
    }

    pub fn sink(&self) -> Option<DeviceHandle<Processor>> {
        self.sink.clone()
    }

    pub fn set_termination(&mut self, termination: Termination) {
        self.termination = Some(termination);
    }

    /// Cap the global time any stepping method may reach.
    pub fn set_tick_limit(&mut self, tick_limit: Option<u64>) {
        self.tick_limit = tick_limit;
    }

    fn find(&self, name: &str) -> Result<&DeviceHandle<dyn ReportableDevice>, SimulationError> {
        self.devices
            .iter()
            .find(|device| device.borrow().name() == name)
            .ok_or_else(|| SimulationError::DeviceNotFound(name.to_string()))
    }

    /// This method provides a mechanism for getting the status of any
    /// device in a simulation, by name.
    pub fn get_status(&self, name: &str) -> Result<String, SimulationError> {
        Ok(self.find(name)?.borrow().status())
    }

    pub fn get_report(&self, name: &str) -> Result<DeviceReport, SimulationError> {
        Ok(self.find(name)?.borrow().report())
    }

    pub fn get_records(&self, name: &str) -> Result<Vec<DeviceRecord>, SimulationError> {
        Ok(self.find(name)?.borrow().records().clone())
    }

    /// Reports for every device, in advancement order.
    pub fn report(&self) -> Report {
        Report {
            name: self.name.clone(),
            ticks: self.global_time(),
            devices: self
                .devices
                .iter()
                .map(|device| device.borrow().report())
                .collect(),
        }
    }

    /// The simulation step is foundational for a fixed-increment
    /// simulation.  This method advances every device once, in order,
    /// including all notifications the devices fire, and then counts one
    /// tick of global time.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        if let Some(limit) = self.tick_limit {
            if self.global_time() >= limit {
                warn!("{} reached its tick limit of {}", self.name, limit);
                return Err(SimulationError::TickLimitExceeded(limit));
            }
        }
        self.devices
            .iter()
            .try_for_each(|device| acquire(device)?.advance())?;
        self.services.set_global_time(self.global_time() + 1);
        Ok(())
    }

    /// This method executes the specified number of simulation steps, `n`.
    pub fn step_n(&mut self, n: u64) -> Result<(), SimulationError> {
        (0..n).try_for_each(|_| self.step())
    }

    /// Run until `count` more transacts have been generated by the source
    /// and `count` more have completed at the sink.  The source is disabled
    /// from its own arrival notification once it has generated `count`
    /// transacts, so no further work enters the pipeline while the last
    /// transacts drain through.  The source is re-enabled at the start of
    /// every such run, so runs can follow one another.
    pub fn step_until_completed(&mut self, count: usize) -> Result<(), SimulationError> {
        let source = self.source.clone().ok_or(SimulationError::RoleNotFound("source"))?;
        let sink = self.sink.clone().ok_or(SimulationError::RoleNotFound("sink"))?;
        let target = {
            let mut source = acquire(&source)?;
            source.set_enabled(true);
            source.generated() + count
        };
        let arrivals = acquire(&source)?.on_arrival(move |generator: &mut Generator, _| {
            if generator.generated() >= target {
                generator.set_enabled(false);
            }
            Ok(())
        });
        let remaining = Rc::new(Cell::new(count));
        let outstanding = remaining.clone();
        let completions = acquire(&sink)?.on_completed(move |_, finished| {
            outstanding.set(outstanding.get().saturating_sub(finished));
            Ok(())
        });
        let mut outcome = Ok(());
        while remaining.get() > 0 {
            outcome = self.step();
            if outcome.is_err() {
                break;
            }
        }
        acquire(&source)?.unsubscribe(arrivals);
        acquire(&sink)?.unsubscribe_completed(completions);
        outcome
    }

    /// Apply the configured termination policy.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        let termination = self.termination.ok_or_else(|| {
            SimulationError::IllegalState(format!["{} has no termination policy", self.name])
        })?;
        info!("Running {} with {:?}", self.name, termination);
        let outcome = match termination {
            Termination::Ticks { ticks } => self.step_n(ticks),
            Termination::Completions { count } => self.step_until_completed(count),
        };
        info!("{} stopped after {} ticks", self.name, self.global_time());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Device, Queue};

    #[test]
    fn step_advances_every_device_once() -> Result<(), SimulationError> {
        let mut simulation = Simulation::new(String::from("sim"), Services::from_seed(1));
        let queue = simulation.add_device(Queue::new(String::from("line")));
        let processor = simulation.add_device(Processor::manual(String::from("cpu")));
        simulation.step_n(7)?;
        assert_eq!(simulation.global_time(), 7);
        assert_eq!(queue.borrow().ticks(), 7);
        assert_eq!(processor.borrow().ticks(), 7);
        Ok(())
    }

    #[test]
    fn lookups_by_name() -> Result<(), SimulationError> {
        let mut simulation = Simulation::new(String::from("sim"), Services::default());
        simulation.add_device(Queue::new(String::from("line")));
        assert_eq!(simulation.get_status("line")?, "Empty");
        assert!(matches!(
            simulation.get_status("nowhere"),
            Err(SimulationError::DeviceNotFound(_))
        ));
        assert_eq!(simulation.report().devices.len(), 1);
        Ok(())
    }

    #[test]
    fn completion_policy_needs_roles() {
        let mut simulation = Simulation::new(String::from("sim"), Services::default());
        assert!(matches!(
            simulation.step_until_completed(3),
            Err(SimulationError::RoleNotFound("source"))
        ));
        assert!(simulation.run().is_err());
    }

    #[test]
    fn tick_limit_stops_runaway_runs() -> Result<(), SimulationError> {
        let mut simulation = Simulation::new(String::from("sim"), Services::default());
        let source = simulation.add_device(Generator::single(
            String::from("arrivals"),
            1.0,
            1.0,
            simulation.uniform_rng(),
        )?);
        // Nothing is ever seized, so nothing ever completes
        let sink = simulation.add_device(Processor::manual(String::from("cpu")));
        simulation.set_source(source.clone());
        simulation.set_sink(sink);
        simulation.set_tick_limit(Some(25));
        assert!(matches!(
            simulation.step_until_completed(1),
            Err(SimulationError::TickLimitExceeded(25))
        ));
        assert_eq!(simulation.global_time(), 25);
        assert_eq!(source.borrow().generated(), 1);
        assert!(!source.borrow().is_enabled());
        Ok(())
    }

    #[test]
    fn reentering_a_device_is_an_error() -> Result<(), SimulationError> {
        let mut simulation = Simulation::new(String::from("sim"), Services::default());
        let processor = simulation.add_device(Processor::manual(String::from("cpu")));
        let same = processor.clone();
        processor.borrow_mut().on_idle(move |_| {
            acquire(&same)?;
            Ok(())
        });
        assert!(matches!(
            simulation.step(),
            Err(SimulationError::IllegalState(_))
        ));
        Ok(())
    }
}
