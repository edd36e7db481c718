//! Systems - solvers that run on top of the particle store
//!
//! Only the constraint layer lives here today; contact resolution is part of
//! the manager's step.

pub mod constraints;

pub use constraints::{Constraint, DistanceConstraint, ShapeMatchingConstraint, SolveOutcome};
