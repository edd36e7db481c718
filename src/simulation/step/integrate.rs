//! Integration passes (steps 1-3 and 7)
//!
//! Same rule as `Particle::integrate` / `Particle::calculate_velocity`, run
//! over the store's SoA buffers.

use crate::math::Vec2;
use crate::particles::{ParticleStore, WorldBounds};

/// Gravity impulse, advance from the previous position, clamp into `bounds`.
/// Returns the number of particles that hit a boundary.
pub(super) fn integrate_particles(store: &mut ParticleStore, bounds: &WorldBounds, gravity: Vec2, dt: f32) -> u32 {
    let n = store.len();
    let gravity_step = gravity * dt;
    let mut clamps = 0u32;

    for i in 0..n {
        let mut velocity = store.velocities[i] + gravity_step * store.inverse_masses[i];
        store.pre_solve_velocities[i] = velocity;

        let mut position = store.previous_positions[i] + velocity * dt;
        if bounds.confine(&mut position, &mut velocity) {
            clamps += 1;
        }

        store.positions[i] = position;
        store.velocities[i] = velocity;
    }

    clamps
}

/// `velocity = (position - previous) / dt`, then `previous = position`
pub(super) fn update_velocities(store: &mut ParticleStore, dt: f32) {
    let n = store.len();
    for i in 0..n {
        let position = store.positions[i];
        store.velocities[i] = (position - store.previous_positions[i]) / dt;
        store.previous_positions[i] = position;
    }
}

/// Pull anything contact correction or constraints pushed outside back in.
/// Velocity is derived from positions afterwards, so no reflection here.
pub(super) fn confine_positions(store: &mut ParticleStore, bounds: &WorldBounds) {
    let n = store.len();
    for position in &mut store.positions[..n] {
        *position = bounds.clamp(*position);
    }
}
