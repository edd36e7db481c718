//! Simulation - the particle manager and its per-frame passes
//!
//! `ParticleManager` owns the particle store and the spatial hash and runs
//! one position-based step per call:
//!
//! - step/      integrate + clamp, broad phase, contact correction, restitution
//! - render/    explicit draw sink (no global drawing surface)
//! - perf/      step timings and counters
//! - init/      construction, runtime settings, seeded scatter
//! - commands/  particle and constraint creation
//! - facade     wasm-bindgen `World` for the JS host
//!
//! Constraints live outside the manager and are passed in per step, so the
//! borrow checker keeps manager and constraint mutation from overlapping.

use crate::core::{SimError, SimulationConfig};
use crate::math::Vec2;
use crate::particles::{Particle, ParticleId, ParticleStore, WorldBounds};
use crate::spatial::SpatialHash;
use crate::systems::Constraint;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/step_stats.rs"]
mod step_stats;
#[path = "init/random.rs"]
mod random;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "step/integrate.rs"]
mod integrate;
#[path = "step/contacts.rs"]
mod contacts;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "render/render.rs"]
pub mod render;
mod facade;

pub use facade::World;
pub use render::{RenderBuffer, RenderSink};
pub use step_stats::StepStats;

use perf_timer::PerfTimer;

/// Owns every particle and advances them together.
pub struct ParticleManager {
    config: SimulationConfig,
    store: ParticleStore,
    hash: SpatialHash,
    bounds: WorldBounds,

    // Settings
    gravity: Vec2,

    // State
    frame: u64,

    // Perf metrics
    perf_enabled: bool,
    stats: StepStats,
}

impl ParticleManager {
    /// Default world (300 units, margin 10) with the given capacity and cell spacing
    pub fn new(max_particles: usize, cell_spacing: f32) -> Result<Self, SimError> {
        init::create_manager(SimulationConfig {
            max_particles,
            cell_spacing,
            ..SimulationConfig::default()
        })
    }

    pub fn with_config(config: SimulationConfig) -> Result<Self, SimError> {
        init::create_manager(config)
    }

    pub fn from_config_json(json: &str) -> Result<Self, SimError> {
        init::create_manager(SimulationConfig::from_json(json)?)
    }

    pub fn config(&self) -> &SimulationConfig { &self.config }

    pub fn bounds(&self) -> WorldBounds { self.bounds }

    pub fn gravity(&self) -> Vec2 { self.gravity }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn particle_count(&self) -> usize { self.store.len() }

    pub fn capacity(&self) -> usize { self.store.capacity() }

    pub fn store(&self) -> &ParticleStore { &self.store }

    /// Direct buffer access for drivers and constraints outside a step
    pub fn store_mut(&mut self) -> &mut ParticleStore { &mut self.store }

    pub fn hash(&self) -> &SpatialHash { &self.hash }

    // === Settings ===

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        settings::set_gravity(self, x, y);
    }

    /// Enable or disable per-pass timings (adds timer overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Snapshot of the last successful step
    pub fn stats(&self) -> StepStats {
        settings::get_stats(self)
    }

    // === Commands ===

    /// Add a particle at rest. `mass <= 0` makes it static.
    pub fn add_particle(&mut self, position: Vec2, restitution: f32, mass: f32) -> Result<ParticleId, SimError> {
        commands::add_particle(self, position, restitution, mass)
    }

    /// Seed `count` particles uniformly in `[min, max)` with masses in `[0, 1)`.
    /// Deterministic for a given seed. Adds all `count` or, on error, none.
    pub fn scatter_particles(
        &mut self,
        count: usize,
        seed: u32,
        min: Vec2,
        max: Vec2,
        restitution: f32,
    ) -> Result<usize, SimError> {
        commands::scatter_particles(self, count, seed, min, max, restitution)
    }

    pub fn distance_constraint(
        &self,
        a: ParticleId,
        b: ParticleId,
        target: f32,
        stiffness: f32,
    ) -> Result<Constraint, SimError> {
        commands::distance_constraint(self, a, b, target, stiffness)
    }

    /// Rigid group over `members`, using their current pose as rest shape
    pub fn shape_match(&self, members: &[ParticleId]) -> Result<Constraint, SimError> {
        commands::shape_match(self, members)
    }

    /// Forget every particle and reset the frame counter.
    /// Constraints built before this are rejected by later steps.
    pub fn clear(&mut self) {
        commands::clear(self);
    }

    /// Per-object view of one stored particle, `None` for an unknown id
    pub fn particle(&self, id: ParticleId) -> Option<Particle> {
        let i = self.store.check(id).ok()?.index();
        Some(Particle::from_state(
            self.store.positions[i],
            self.store.previous_positions[i],
            self.store.velocities[i],
            self.store.pre_solve_velocities[i],
            self.store.inverse_masses[i],
            self.config.particle_radius,
            self.store.restitutions[i],
        ))
    }

    // === Step ===

    /// Advance one frame. `dt <= 0` or non-finite is rejected before any state changes.
    pub fn step(&mut self, dt: f32) -> Result<StepStats, SimError> {
        step::step(self, dt, &mut [])
    }

    /// Advance one frame, solving `constraints` after contact correction so
    /// their corrections feed into the recomputed velocities.
    pub fn step_with_constraints(&mut self, dt: f32, constraints: &mut [Constraint]) -> Result<StepStats, SimError> {
        step::step(self, dt, constraints)
    }

    /// `step` then `render`
    pub fn update<S: RenderSink + ?Sized>(&mut self, dt: f32, sink: &mut S) -> Result<StepStats, SimError> {
        let stats = self.step(dt)?;
        self.render(sink);
        Ok(stats)
    }

    // === Render ===

    /// One circle per particle (position, radius, color)
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        render::emit_particles(self, sink);
    }

    /// Particles, then each constraint's overlay on top
    pub fn render_with_constraints<S: RenderSink + ?Sized>(&self, constraints: &[Constraint], sink: &mut S) {
        render::emit_particles(self, sink);
        for constraint in constraints {
            constraint.render(&self.store, sink);
        }
    }

    // === Query ===

    /// Particles within `cell_radius` cells of `position`, as bucketed by the
    /// last step. A new iterator starts from the beginning.
    pub fn query(&self, position: Vec2, cell_radius: u32) -> impl Iterator<Item = ParticleId> + Clone + '_ {
        self.hash.query(position, cell_radius)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
