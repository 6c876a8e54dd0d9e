use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by ticksim
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents a device operation called with an argument outside its
    /// contract, such as inverted bounds or a non-positive duration
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Represents a device operation called in a state that does not allow
    /// it, such as seizing a busy processor or dequeuing from an empty queue
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Represents an operation requested on a device that does not exist
    #[error("A specified device cannot be found in the simulation: {0}")]
    DeviceNotFound(String),

    /// Represents a termination policy that needs a source or sink role
    /// which was never assigned
    #[error("The simulation has no device assigned to the {0} role")]
    RoleNotFound(&'static str),

    /// Represents a run that reached its tick limit before terminating
    #[error("The simulation reached its limit of {0} ticks before terminating")]
    TickLimitExceeded(u64),

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Represents a confidence interval requested at a significance level
    /// without tabulated critical values
    #[error("No critical values are available for a significance level of {0}")]
    UnsupportedSignificance(f64),

    /// Represents a statistic requested from a sample without enough points
    #[error("The sample has too few points for this statistic")]
    EmptySample,

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent Bernoulli distribution errors
    #[error(transparent)]
    BernoulliError(#[from] rand_distr::BernoulliError),
}
