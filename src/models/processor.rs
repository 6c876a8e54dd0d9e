use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::model_trait::{Device, Reportable, ReportableDevice};
use super::notify::{Subscribers, SubscriptionId};
use super::{DeviceRecord, DeviceReport, ProcessorReport};
use crate::input_modeling::UniformRNG;
use crate::utils::check_bounds;
use crate::utils::errors::SimulationError;

/// The processor is a single, exclusive service slot.  A batch of transacts
/// seizes it for a duration - explicit, or drawn uniformly from
/// `[service_min, service_max)` - and holds it until that much model time
/// has elapsed.  Busy time is accounted fractionally, so a 2.5 tick job
/// contributes exactly 2.5 ticks of busy time.
///
/// On completion the processor notifies its `on_completed` subscribers with
/// the batch size, then its `on_idle` subscribers.  Idle subscribers are
/// also notified on every tick the processor spends idle.  Subscribers may
/// seize the processor again from inside either notification; a seizure
/// made while the finishing tick is still being accounted counts the rest
/// of that tick as busy.
#[derive(Debug)]
pub struct Processor {
    clock: Clock,
    service_min: f64,
    service_max: f64,
    uniform_rng: UniformRNG,
    state: State,
    on_completed: Subscribers<Processor, usize>,
    on_idle: Subscribers<Processor, ()>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct State {
    phase: Phase,
    until_completion: f64,
    in_service: usize,
    completed: usize,
    busy_time: f64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            until_completion: 0.0,
            in_service: 0,
            completed: 0,
            busy_time: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
enum Phase {
    Idle,
    Busy,
}

impl Processor {
    /// Create a processor whose `seize` draws service times from
    /// `[service_min, service_max)`, with `0 <= service_min <= service_max`.
    pub fn new(
        name: String,
        service_min: f64,
        service_max: f64,
        uniform_rng: UniformRNG,
    ) -> Result<Self, SimulationError> {
        check_bounds("service time", service_min, service_max)?;
        if service_min < 0.0 || !service_max.is_finite() {
            return Err(SimulationError::IllegalArgument(format![
                "processor {} needs a non-negative, finite service time (min {}, max {})",
                name, service_min, service_max
            ]));
        }
        Ok(Self {
            clock: Clock::new(name),
            service_min,
            service_max,
            uniform_rng,
            state: State::default(),
            on_completed: Subscribers::default(),
            on_idle: Subscribers::default(),
        })
    }

    /// A processor without a service time distribution, for use with
    /// explicit durations only (`seize_for` and `seize_batch`).
    pub fn manual(name: String) -> Self {
        Self {
            clock: Clock::new(name),
            service_min: 0.0,
            service_max: 0.0,
            uniform_rng: UniformRNG::default(),
            state: State::default(),
            on_completed: Subscribers::default(),
            on_idle: Subscribers::default(),
        }
    }

    pub fn store_records(mut self, store_records: bool) -> Self {
        self.clock.set_store_records(store_records);
        self
    }

    /// Subscribe to completions.  The handler receives the processor and
    /// the number of transacts that finished.
    pub fn on_completed<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut Processor, usize) -> Result<(), SimulationError> + 'static,
    {
        self.on_completed.subscribe(handler)
    }

    /// Subscribe to idleness.  The handler runs right after each completion
    /// and on every tick the processor is idle.
    pub fn on_idle<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut Processor) -> Result<(), SimulationError> + 'static,
    {
        let mut handler = handler;
        self.on_idle
            .subscribe(move |processor: &mut Processor, _| handler(processor))
    }

    pub fn unsubscribe_completed(&mut self, id: SubscriptionId) {
        self.on_completed.unsubscribe(id);
    }

    pub fn unsubscribe_idle(&mut self, id: SubscriptionId) {
        self.on_idle.unsubscribe(id);
    }

    /// Seize the processor for one transact, with a service time drawn from
    /// the configured bounds.
    pub fn seize(&mut self) -> Result<(), SimulationError> {
        let duration = self
            .uniform_rng
            .uniform_real(self.service_min, self.service_max)?;
        self.seize_batch(1, duration)
    }

    /// Seize the processor for one transact, for `duration` ticks.
    pub fn seize_for(&mut self, duration: f64) -> Result<(), SimulationError> {
        self.seize_batch(1, duration)
    }

    /// Seize the processor for `count` transacts, served together for
    /// `duration` ticks.  The duration is added to any residual service
    /// time rather than replacing it.
    pub fn seize_batch(&mut self, count: usize, duration: f64) -> Result<(), SimulationError> {
        if self.is_busy() {
            return Err(SimulationError::IllegalState(format![
                "processor {} is already serving {} transacts",
                self.clock.name(),
                self.state.in_service
            ]));
        }
        if count == 0 {
            return Err(SimulationError::IllegalArgument(format![
                "processor {} cannot seize an empty batch",
                self.clock.name()
            ]));
        }
        if !(duration > 0.0) || !duration.is_finite() {
            return Err(SimulationError::IllegalArgument(format![
                "processor {} needs a positive, finite service time, not {}",
                self.clock.name(),
                duration
            ]));
        }
        self.state.phase = Phase::Busy;
        self.state.in_service = count;
        self.state.until_completion += duration;
        debug!(
            "{} seized for {} transacts over {:.3} ticks at tick {}",
            self.clock.name(),
            count,
            duration,
            self.clock.ticks()
        );
        self.clock.record("Seize", count.to_string());
        Ok(())
    }

    fn release(&mut self) -> Result<(), SimulationError> {
        if !self.is_busy() {
            return Err(SimulationError::IllegalState(format![
                "processor {} cannot release while idle",
                self.clock.name()
            ]));
        }
        let finished = self.state.in_service;
        self.state.completed += finished;
        self.state.in_service = 0;
        self.state.phase = Phase::Idle;
        debug!(
            "{} completed {} transacts at tick {}",
            self.clock.name(),
            finished,
            self.clock.ticks()
        );
        self.clock.record("Release", finished.to_string());
        Subscribers::dispatch(self, |processor| &mut processor.on_completed, finished)?;
        self.notify_idle()
    }

    fn notify_idle(&mut self) -> Result<(), SimulationError> {
        Subscribers::dispatch(self, |processor| &mut processor.on_idle, ())
    }

    pub fn is_busy(&self) -> bool {
        self.state.phase == Phase::Busy
    }

    /// The number of transacts currently in service.
    pub fn in_service(&self) -> usize {
        self.state.in_service
    }

    /// The remaining service time of the current batch.
    pub fn until_completion(&self) -> f64 {
        self.state.until_completion
    }

    /// The cumulative number of transacts served to completion.
    pub fn completed(&self) -> usize {
        self.state.completed
    }

    pub fn busy_time(&self) -> f64 {
        self.state.busy_time
    }

    pub fn idle_time(&self) -> f64 {
        self.clock.ticks() as f64 - self.state.busy_time
    }

    /// The fraction of elapsed ticks spent busy, 0 before the first tick.
    pub fn utilization(&self) -> f64 {
        if self.clock.ticks() != 0 {
            self.state.busy_time / self.clock.ticks() as f64
        } else {
            0.0
        }
    }
}

impl Device for Processor {
    fn name(&self) -> &str {
        self.clock.name()
    }

    fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    fn advance(&mut self) -> Result<(), SimulationError> {
        self.clock.tick();
        if !self.is_busy() {
            trace!("{} is idle at tick {}", self.clock.name(), self.clock.ticks());
            return self.notify_idle();
        }
        let remaining = self.state.until_completion;
        if remaining <= 1.0 {
            self.state.busy_time += remaining;
            self.state.until_completion = 0.0;
            self.release()?;
            if self.is_busy() {
                // Re-seized before the tick ended
                self.state.busy_time += 1.0 - remaining;
            }
        } else {
            self.state.busy_time += 1.0;
            self.state.until_completion -= 1.0;
        }
        Ok(())
    }
}

impl Reportable for Processor {
    fn status(&self) -> String {
        match self.state.phase {
            Phase::Busy => format!["Processing {}", self.state.in_service],
            Phase::Idle => String::from("Idle"),
        }
    }

    fn report(&self) -> DeviceReport {
        DeviceReport::Processor(ProcessorReport {
            name: self.clock.name().to_string(),
            ticks: self.clock.ticks(),
            completed: self.completed(),
            busy_time: self.busy_time(),
            idle_time: self.idle_time(),
            utilization: self.utilization(),
        })
    }

    fn records(&self) -> &Vec<DeviceRecord> {
        self.clock.records()
    }
}

impl ReportableDevice for Processor {}
