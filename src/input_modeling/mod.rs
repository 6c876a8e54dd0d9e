//! The input modeling module provides the source of randomness behind
//! every stochastic device behavior.  A single `UniformRNG` is created per
//! simulation run and handed to each device that draws interarrival times,
//! batch sizes, or service durations, so that a fixed seed reproduces a run
//! exactly.

pub mod dynamic_rng;
pub mod uniform_rng;

pub use dynamic_rng::{dyn_rng, DynRng, SimulationRng};
pub use uniform_rng::UniformRNG;
