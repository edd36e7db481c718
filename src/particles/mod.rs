//! Particles - per-object and structure-of-arrays forms of the same state
//!
//! `Particle` integrates itself; `ParticleStore` holds the same attributes in
//! parallel buffers for the bulk step. Both confine through `WorldBounds`.

mod particle;
mod store;

pub use particle::{inverse_mass_of, Particle, WorldBounds};
pub use store::{ParticleId, ParticleStore};
