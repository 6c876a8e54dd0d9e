use std::collections::HashSet;

use log::debug;

use super::config::PipelineConfig;
use super::{acquire, DeviceHandle, Services, Simulation};
use crate::models::{Generator, Processor, Queue};
use crate::utils::errors::SimulationError;

/// Assemble the pipeline described by `config`: the generator, then each
/// stage's queue and processor, advanced in that order every tick.
///
/// Wiring:
/// * generator arrivals are enqueued into the first stage's queue;
/// * on every idle notification, a processor takes one transact from its
///   own queue (if any are waiting) and seizes itself with a drawn service
///   time;
/// * completions are enqueued into the next stage's queue.
pub fn build(config: &PipelineConfig) -> Result<Simulation, SimulationError> {
    validate(config)?;
    let mut simulation = Simulation::new(config.name.clone(), Services::from_seed(config.seed));
    let generator = simulation.add_device(
        Generator::new(
            config.generator.name.clone(),
            config.generator.interval_min,
            config.generator.interval_max,
            config.generator.batch_min,
            config.generator.batch_max,
            simulation.uniform_rng(),
        )?
        .store_records(config.store_records),
    );
    simulation.set_source(generator.clone());

    let mut upstream: Option<DeviceHandle<Processor>> = None;
    for stage in &config.stages {
        let queue =
            simulation.add_device(Queue::new(stage.queue.clone()).store_records(config.store_records));
        let processor = simulation.add_device(
            Processor::new(
                stage.processor.clone(),
                stage.service_min,
                stage.service_max,
                simulation.uniform_rng(),
            )?
            .store_records(config.store_records),
        );
        match &upstream {
            None => {
                let arrivals = queue.clone();
                acquire(&generator)?.on_arrival(move |_, batch| {
                    acquire(&arrivals)?.enqueue_n(batch);
                    Ok(())
                });
            }
            Some(previous) => {
                let arrivals = queue.clone();
                acquire(previous)?.on_completed(move |_, finished| {
                    acquire(&arrivals)?.enqueue_n(finished);
                    Ok(())
                });
            }
        }
        acquire(&processor)?.on_idle(pull_from(queue.clone()));
        if Some(stage.processor.as_str()) == config.sink_name() {
            simulation.set_sink(processor.clone());
        }
        debug!("Wired stage {} -> {}", stage.queue, stage.processor);
        upstream = Some(processor);
    }

    simulation.set_termination(config.termination);
    simulation.set_tick_limit(config.tick_limit);
    Ok(simulation)
}

/// The idle handler of a stage processor: take the oldest waiting transact,
/// if any, into service.  The transact only leaves the queue once the seize
/// has succeeded.
fn pull_from(
    queue: DeviceHandle<Queue>,
) -> impl FnMut(&mut Processor) -> Result<(), SimulationError> {
    move |processor: &mut Processor| {
        let mut waiting = acquire(&queue)?;
        if !waiting.is_empty() {
            processor.seize()?;
            waiting.dequeue()?;
        }
        Ok(())
    }
}

fn validate(config: &PipelineConfig) -> Result<(), SimulationError> {
    if config.stages.is_empty() {
        return Err(SimulationError::IllegalArgument(format![
            "pipeline {} needs at least one stage",
            config.name
        ]));
    }
    let mut names = HashSet::new();
    let all_names = std::iter::once(&config.generator.name).chain(
        config
            .stages
            .iter()
            .flat_map(|stage| vec![&stage.queue, &stage.processor]),
    );
    for name in all_names {
        if !names.insert(name.as_str()) {
            return Err(SimulationError::IllegalArgument(format![
                "device name {} is used more than once",
                name
            ]));
        }
    }
    if let Some(stage) = config.stages.iter().find(|stage| !(stage.service_max > 0.0)) {
        return Err(SimulationError::IllegalArgument(format![
            "processor {} needs a positive service time bound, not {}",
            stage.processor, stage.service_max
        ]));
    }
    if let Some(sink) = config.sink_name() {
        if !config.stages.iter().any(|stage| stage.processor == sink) {
            return Err(SimulationError::DeviceNotFound(sink.to_string()));
        }
    }
    Ok(())
}
