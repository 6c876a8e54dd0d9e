use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::model_trait::{Device, Reportable, ReportableDevice};
use super::notify::{Subscribers, SubscriptionId};
use super::{DeviceRecord, DeviceReport, GeneratorReport};
use crate::input_modeling::UniformRNG;
use crate::utils::check_bounds;
use crate::utils::errors::SimulationError;

/// The generator produces batches of transacts on a randomized schedule.
/// Interarrival times are drawn uniformly from `[interval_min,
/// interval_max)`, measured in (fractional) ticks, and each arrival carries
/// a batch size drawn uniformly from `batch_min..=batch_max`.  For
/// non-stochastic generation, equal bounds can be used - in which case,
/// every arrival is exactly `interval_min` ticks after the previous one.
///
/// The countdown to the next arrival is continuous: each tick consumes one
/// unit of it, and every arrival whose time falls within the tick fires
/// during that tick's `advance`, so short intervals can produce several
/// arrivals per tick.
#[derive(Debug)]
pub struct Generator {
    clock: Clock,
    interval: Bounds<f64>,
    batch: Bounds<usize>,
    uniform_rng: UniformRNG,
    state: State,
    on_arrival: Subscribers<Generator, usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Bounds<T> {
    min: T,
    max: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct State {
    until_next_arrival: f64,
    generated: usize,
    enabled: bool,
}

impl Generator {
    /// Create a generator and draw the time until its first arrival.  The
    /// interval bounds must satisfy `0 <= interval_min <= interval_max` with
    /// a positive `interval_max`, and the batch bounds `batch_min <=
    /// batch_max`.
    pub fn new(
        name: String,
        interval_min: f64,
        interval_max: f64,
        batch_min: usize,
        batch_max: usize,
        uniform_rng: UniformRNG,
    ) -> Result<Self, SimulationError> {
        check_bounds("interval", interval_min, interval_max)?;
        check_bounds("batch", batch_min, batch_max)?;
        if interval_min < 0.0 || interval_max <= 0.0 || !interval_max.is_finite() {
            return Err(SimulationError::IllegalArgument(format![
                "generator {} needs a positive, finite interval (min {}, max {})",
                name, interval_min, interval_max
            ]));
        }
        let until_next_arrival = uniform_rng.uniform_real(interval_min, interval_max)?;
        Ok(Self {
            clock: Clock::new(name),
            interval: Bounds {
                min: interval_min,
                max: interval_max,
            },
            batch: Bounds {
                min: batch_min,
                max: batch_max,
            },
            uniform_rng,
            state: State {
                until_next_arrival,
                generated: 0,
                enabled: true,
            },
            on_arrival: Subscribers::default(),
        })
    }

    /// A generator of single transacts.
    pub fn single(
        name: String,
        interval_min: f64,
        interval_max: f64,
        uniform_rng: UniformRNG,
    ) -> Result<Self, SimulationError> {
        Self::new(name, interval_min, interval_max, 1, 1, uniform_rng)
    }

    pub fn store_records(mut self, store_records: bool) -> Self {
        self.clock.set_store_records(store_records);
        self
    }

    /// Subscribe to arrivals.  The handler receives the generator and the
    /// batch size, and runs before `advance` returns.
    pub fn on_arrival<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut Generator, usize) -> Result<(), SimulationError> + 'static,
    {
        self.on_arrival.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.on_arrival.unsubscribe(id);
    }

    /// The cumulative number of transacts generated.
    pub fn generated(&self) -> usize {
        self.state.generated
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// A disabled generator keeps ticking but produces no arrivals.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    /// The remaining countdown, in ticks, to the next arrival.
    pub fn until_next_arrival(&self) -> f64 {
        self.state.until_next_arrival
    }

    fn generate(&mut self) -> Result<(), SimulationError> {
        let batch = self
            .uniform_rng
            .uniform_int(self.batch.min, self.batch.max + 1)?;
        self.state.generated += batch;
        debug!(
            "{} generated a batch of {} at tick {}",
            self.clock.name(),
            batch,
            self.clock.ticks()
        );
        self.clock.record("Arrival", batch.to_string());
        Subscribers::dispatch(self, |generator| &mut generator.on_arrival, batch)
    }
}

impl Device for Generator {
    fn name(&self) -> &str {
        self.clock.name()
    }

    fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    fn advance(&mut self) -> Result<(), SimulationError> {
        self.clock.tick();
        if !self.state.enabled {
            trace!("{} is disabled at tick {}", self.clock.name(), self.clock.ticks());
            return Ok(());
        }
        while self.state.until_next_arrival <= 1.0 {
            self.state.until_next_arrival += self
                .uniform_rng
                .uniform_real(self.interval.min, self.interval.max)?;
            self.generate()?;
        }
        self.state.until_next_arrival -= 1.0;
        Ok(())
    }
}

impl Reportable for Generator {
    fn status(&self) -> String {
        if self.state.enabled {
            format!["Generating ({} so far)", self.state.generated]
        } else {
            String::from("Disabled")
        }
    }

    fn report(&self) -> DeviceReport {
        DeviceReport::Generator(GeneratorReport {
            name: self.clock.name().to_string(),
            ticks: self.clock.ticks(),
            generated: self.state.generated,
            enabled: self.state.enabled,
        })
    }

    fn records(&self) -> &Vec<DeviceRecord> {
        self.clock.records()
    }
}

impl ReportableDevice for Generator {}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn collect_batches(generator: &mut Generator) -> Rc<RefCell<Vec<usize>>> {
        let batches = Rc::new(RefCell::new(Vec::new()));
        let sink = batches.clone();
        generator.on_arrival(move |_, batch| {
            sink.borrow_mut().push(batch);
            Ok(())
        });
        batches
    }

    #[test]
    fn unit_interval_arrives_every_tick() -> Result<(), SimulationError> {
        let mut generator =
            Generator::single(String::from("arrivals"), 1.0, 1.0, UniformRNG::default())?;
        let batches = collect_batches(&mut generator);
        (0..10).try_for_each(|_| generator.advance())?;
        assert_eq!(generator.ticks(), 10);
        assert_eq!(generator.generated(), 10);
        assert_eq!(batches.borrow().len(), 10);
        Ok(())
    }

    #[test]
    fn short_intervals_fire_several_arrivals_per_tick() -> Result<(), SimulationError> {
        let mut generator =
            Generator::single(String::from("arrivals"), 0.25, 0.25, UniformRNG::default())?;
        let batches = collect_batches(&mut generator);
        generator.advance()?;
        // Arrivals at 0.25, 0.5, 0.75, and 1.0 all fall within the first tick
        assert_eq!(batches.borrow().len(), 4);
        generator.advance()?;
        assert_eq!(generator.generated(), 8);
        Ok(())
    }

    #[test]
    fn long_intervals_skip_ticks() -> Result<(), SimulationError> {
        let mut generator =
            Generator::single(String::from("arrivals"), 2.5, 2.5, UniformRNG::default())?;
        let batches = collect_batches(&mut generator);
        let mut per_tick = Vec::new();
        for _ in 0..10 {
            let before = batches.borrow().len();
            generator.advance()?;
            per_tick.push(batches.borrow().len() - before);
        }
        // Arrivals at 2.5, 5.0, 7.5, and 10.0 fall within ticks 3, 5, 8, and 10
        assert_eq!(per_tick, vec![0, 0, 1, 0, 1, 0, 0, 1, 0, 1]);
        assert!((generator.until_next_arrival() - 2.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn generated_total_matches_delivered_batches() -> Result<(), SimulationError> {
        let mut generator = Generator::new(
            String::from("arrivals"),
            0.5,
            3.0,
            1,
            4,
            UniformRNG::from_seed(5),
        )?;
        let batches = collect_batches(&mut generator);
        (0..500).try_for_each(|_| generator.advance())?;
        assert_eq!(generator.generated(), batches.borrow().iter().sum::<usize>());
        assert!(batches.borrow().iter().all(|batch| (1..=4).contains(batch)));
        Ok(())
    }

    #[test]
    fn disabled_generator_keeps_ticking() -> Result<(), SimulationError> {
        let mut generator =
            Generator::single(String::from("arrivals"), 1.0, 1.0, UniformRNG::default())?;
        generator.advance()?;
        generator.set_enabled(false);
        (0..5).try_for_each(|_| generator.advance())?;
        assert_eq!(generator.ticks(), 6);
        assert_eq!(generator.generated(), 1);
        assert_eq!(generator.status(), "Disabled");
        Ok(())
    }

    #[test]
    fn arrival_handler_can_disable_its_generator() -> Result<(), SimulationError> {
        let mut generator =
            Generator::single(String::from("arrivals"), 0.25, 0.25, UniformRNG::default())?;
        generator.on_arrival(|generator: &mut Generator, _| {
            if generator.generated() >= 3 {
                generator.set_enabled(false);
            }
            Ok(())
        });
        (0..3).try_for_each(|_| generator.advance())?;
        // The in-flight tick still finishes its burst of arrivals
        assert_eq!(generator.generated(), 4);
        Ok(())
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let uniform_rng = UniformRNG::default();
        assert!(matches!(
            Generator::single(String::from("g"), 3.0, 1.0, uniform_rng.clone()),
            Err(SimulationError::IllegalArgument(_))
        ));
        assert!(matches!(
            Generator::new(String::from("g"), 1.0, 2.0, 3, 1, uniform_rng.clone()),
            Err(SimulationError::IllegalArgument(_))
        ));
        assert!(matches!(
            Generator::single(String::from("g"), 0.0, 0.0, uniform_rng),
            Err(SimulationError::IllegalArgument(_))
        ));
    }

    #[test]
    fn records_arrivals_when_enabled() -> Result<(), SimulationError> {
        let mut generator =
            Generator::single(String::from("arrivals"), 1.0, 1.0, UniformRNG::default())?
                .store_records(true);
        (0..3).try_for_each(|_| generator.advance())?;
        let ticks: Vec<u64> = generator.records().iter().map(|record| record.tick).collect();
        assert_eq!(ticks, vec![1, 2, 3]);
        Ok(())
    }
}
