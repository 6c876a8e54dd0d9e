//! The utilies module provides general capabilities, that may span the
//! input modeling, models, output analysis, and simulator modules.  The
//! utilities are centered around error reporting and bounds checking.

pub mod errors;

use errors::SimulationError;

/// Bounds are accepted when both ends are comparable numbers and the lower
/// end does not exceed the upper end.  The `what` label names the offending
/// parameter pair in the returned error.
pub fn check_bounds<T>(what: &str, min: T, max: T) -> Result<(), SimulationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    match min.partial_cmp(&max) {
        Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal) => Ok(()),
        _ => Err(SimulationError::IllegalArgument(format![
            "{} bounds are inverted or not comparable (min {}, max {})",
            what, min, max
        ])),
    }
}
