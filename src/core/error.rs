//! Simulation Error Types
//!
//! Every failure in the core is a detectable precondition, never a transient
//! fault: bad time steps, full buffers, bad handles or bad configuration.
//! Fallible operations return `Result<T, SimError>` and leave state untouched
//! on error.

use std::fmt;

/// Unified error type for simulation operations.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// `dt` was zero, negative or not finite.
    InvalidTimeStep {
        /// The rejected time step
        dt: f32,
    },
    /// A fixed-size buffer is full.
    CapacityExceeded {
        /// What resource was exhausted
        resource: &'static str,
        /// The limit that was hit
        limit: usize,
    },
    /// Shape-matching covariance (or its derived rotation) is singular.
    /// Solvers catch this and fall back to the identity rotation.
    DegenerateConfiguration {
        /// Determinant that failed the singularity test
        determinant: f32,
    },
    /// Particle handle is out of range.
    InvalidParticle {
        /// The offending id
        id: u32,
        /// Live particle count at the time of the call
        count: usize,
    },
    /// Handle was issued before the store was last cleared.
    StaleHandle {
        /// Store generation the handle was issued in
        generation: u32,
        /// Store generation now
        current: u32,
    },
    /// A constraint cannot be built from the given members.
    InvalidConstraint {
        /// Human-readable description of the problem
        reason: &'static str,
    },
    /// A configuration value is out of its valid range.
    InvalidConfiguration {
        /// Human-readable description of the problem
        reason: &'static str,
    },
    /// Configuration JSON could not be parsed.
    ConfigParse(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeStep { dt } => {
                write!(f, "invalid time step {dt} (must be finite and > 0)")
            }
            Self::CapacityExceeded { resource, limit } => {
                write!(f, "{resource} capacity exceeded (limit={limit})")
            }
            Self::DegenerateConfiguration { determinant } => {
                write!(f, "degenerate configuration (determinant={determinant})")
            }
            Self::InvalidParticle { id, count } => {
                write!(f, "particle id {id} out of range (count={count})")
            }
            Self::StaleHandle { generation, current } => {
                write!(f, "stale particle handle (generation {generation}, store is at {current})")
            }
            Self::InvalidConstraint { reason } => write!(f, "invalid constraint: {reason}"),
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

/// Reject non-positive or non-finite time steps.
#[inline]
pub fn check_time_step(dt: f32) -> Result<(), SimError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidTimeStep { dt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_step_must_be_positive_and_finite() {
        assert!(check_time_step(1.0 / 60.0).is_ok());
        assert_eq!(check_time_step(0.0), Err(SimError::InvalidTimeStep { dt: 0.0 }));
        assert!(check_time_step(-0.5).is_err());
        assert!(check_time_step(f32::NAN).is_err());
        assert!(check_time_step(f32::INFINITY).is_err());
    }

    #[test]
    fn display_mentions_the_limit() {
        let err = SimError::CapacityExceeded { resource: "particle", limit: 2 };
        assert_eq!(err.to_string(), "particle capacity exceeded (limit=2)");
    }
}
