use crate::input_modeling::UniformRNG;

/// The simulator provides a variate source and simulation clock to devices
/// during the execution of a simulation.  Devices receive a clone of the
/// variate source when they are constructed, so all of them draw from the
/// one seeded stream.
#[derive(Debug, Clone, Default)]
pub struct Services {
    uniform_rng: UniformRNG,
    global_time: u64,
}

impl Services {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            uniform_rng: UniformRNG::from_seed(u128::from(seed)),
            global_time: 0,
        }
    }

    pub fn uniform_rng(&self) -> UniformRNG {
        self.uniform_rng.clone()
    }

    /// The number of completed simulation steps (ticks).
    pub fn global_time(&self) -> u64 {
        self.global_time
    }

    pub fn set_global_time(&mut self, time: u64) {
        self.global_time = time;
    }
}
