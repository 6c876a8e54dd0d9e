use log::info;

use super::config::PipelineConfig;
use super::{pipeline, Simulation};
use crate::output_analysis::IndependentSample;
use crate::utils::errors::SimulationError;

/// Build and run the pipeline `replications` times, with seeds `seed`,
/// `seed + 1`, and so on, and collect one `metric` value per run.  Since
/// each run uses its own seed, the collected values are independent and
/// identically distributed.
pub fn replicate<F>(
    config: &PipelineConfig,
    replications: usize,
    metric: F,
) -> Result<IndependentSample<f64>, SimulationError>
where
    F: Fn(&Simulation) -> Result<f64, SimulationError>,
{
    let points = (0..replications)
        .map(|replication| -> Result<f64, SimulationError> {
            let mut config = config.clone();
            config.seed = config.seed.wrapping_add(replication as u64);
            let mut simulation = pipeline::build(&config)?;
            simulation.run()?;
            metric(&simulation)
        })
        .collect::<Result<Vec<f64>, SimulationError>>()?;
    info!("Collected {} replications of {}", points.len(), config.name);
    IndependentSample::post(points)
}
