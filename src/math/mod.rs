//! Small value-type algebra for the 2D solver.

mod matrix2;
mod vec2;

pub use matrix2::{Matrix2, SINGULAR_EPSILON};
pub use vec2::Vec2;
