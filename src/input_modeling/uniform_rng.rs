use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Bernoulli;

use super::dynamic_rng::{default_rng, seeded_rng, DynRng};
use crate::utils::check_bounds;
use crate::utils::errors::SimulationError;

/// The variate source of a simulation run.  Clones share the underlying
/// generator, so every device holding a clone draws from one deterministic
/// stream: the same seed and the same sequence of draws always produce the
/// same values.
#[derive(Debug, Clone)]
pub struct UniformRNG {
    rng: DynRng,
}

impl Default for UniformRNG {
    fn default() -> Self {
        Self { rng: default_rng() }
    }
}

impl UniformRNG {
    /// Wrap an existing generator, for simulations that bring their own
    /// `RngCore` implementation.
    pub fn new(rng: DynRng) -> Self {
        Self { rng }
    }

    /// Create a variate source backed by a PCG generator with the given seed.
    pub fn from_seed(seed: u128) -> Self {
        Self {
            rng: seeded_rng(seed),
        }
    }

    /// Draw a real number in `[min, max)`.  Equal bounds always produce
    /// `min` without consuming the stream.
    pub fn uniform_real(&self, min: f64, max: f64) -> Result<f64, SimulationError> {
        check_bounds("uniform real", min, max)?;
        if min == max {
            return Ok(min);
        }
        let unit: f64 = self.rng.borrow_mut().gen();
        Ok(min + unit * (max - min))
    }

    /// Draw an integer in `[min, max)`, exclusive of `max`.  Equal bounds
    /// produce `min`.
    pub fn uniform_int(&self, min: usize, max: usize) -> Result<usize, SimulationError> {
        check_bounds("uniform integer", min, max)?;
        if min == max {
            return Ok(min);
        }
        Ok(Uniform::new(min, max).sample(&mut *self.rng.borrow_mut()))
    }

    /// Draw `true` with probability `p`.
    pub fn bernoulli(&self, p: f64) -> Result<bool, SimulationError> {
        Ok(Bernoulli::new(p)?.sample(&mut *self.rng.borrow_mut()))
    }

    /// A fair coin flip, `bernoulli(0.5)`.
    pub fn coin(&self) -> Result<bool, SimulationError> {
        self.bernoulli(0.5)
    }
}
