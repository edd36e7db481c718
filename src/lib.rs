//! Toaster Physics - 2D particle physics core in WASM
//!
//! Position-based particles with a spatial-hash broad phase, restitution
//! contacts and a small constraint layer (distance links, shape matching).
//!
//! Architecture:
//! - core/          - logging, errors, configuration
//! - math/          - Vec2 and Matrix2
//! - particles/     - single particle and SoA store
//! - spatial/       - spatial hash, contacts, object pool
//! - systems/       - constraints
//! - simulation/    - particle manager, step passes, render sink, JS facade

// Logging macros (must be first for macro export!)
#[macro_use]
pub mod core;
pub mod math;
pub mod particles;
pub mod spatial;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    engine_log!("toaster-physics {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::{SimError, SimulationConfig};
pub use math::{Matrix2, Vec2};
pub use particles::{Particle, ParticleId, ParticleStore, WorldBounds};
pub use simulation::{ParticleManager, RenderBuffer, RenderSink, StepStats, World};
pub use systems::{Constraint, DistanceConstraint, ShapeMatchingConstraint, SolveOutcome};

// Draw colors for JS (ABGR)
#[wasm_bindgen]
pub fn particle_color() -> u32 { simulation::render::PARTICLE_COLOR }
#[wasm_bindgen]
pub fn shape_member_color() -> u32 { simulation::render::SHAPE_MEMBER_COLOR }
