use crate::core::error::{check_time_step, SimError};
use crate::systems::constraints::{solve_all, validate_all};
use crate::systems::Constraint;

use super::contacts::{correct_positions, resolve_restitution};
use super::integrate::{confine_positions, integrate_particles, update_velocities};
use super::step_stats::StepStats;
use super::{ParticleManager, PerfTimer};

pub(super) fn step(
    world: &mut ParticleManager,
    dt: f32,
    constraints: &mut [Constraint],
) -> Result<StepStats, SimError> {
    // Validate before touching anything so a rejected step is a no-op
    if let Err(err) = check_time_step(dt) {
        engine_warn!("step rejected: {}", err);
        return Err(err);
    }
    if let Err(err) = validate_all(constraints, &world.store) {
        engine_warn!("step rejected, constraint handle: {}", err);
        return Err(err);
    }

    let perf_on = world.perf_enabled;
    world.stats.reset();
    world.stats.particle_count = world.store.len() as u32;
    let step_start = PerfTimer::start_if(perf_on);

    // === INTEGRATE: gravity, advance, clamp (passes 1-3) ===
    if perf_on {
        let t0 = PerfTimer::start();
        world.stats.boundary_clamps = integrate_particles(&mut world.store, &world.bounds, world.gravity, dt);
        world.stats.integrate_ms = t0.elapsed_ms();
    } else {
        world.stats.boundary_clamps = integrate_particles(&mut world.store, &world.bounds, world.gravity, dt);
    }

    // === BROAD PHASE: rebuild the hash from clamped positions (pass 4) ===
    if perf_on {
        let t0 = PerfTimer::start();
        world.hash.rebuild(world.store.live_positions());
        world.stats.broad_phase_ms = t0.elapsed_ms();
    } else {
        world.hash.rebuild(world.store.live_positions());
    }

    // === CONTACTS: pooled, deduplicated pairs (pass 5) ===
    let combined_radius = world.config.combined_radius;
    if perf_on {
        let t0 = PerfTimer::start();
        world.hash.generate_contacts(world.store.live_positions(), combined_radius);
        world.stats.contacts_ms = t0.elapsed_ms();
    } else {
        world.hash.generate_contacts(world.store.live_positions(), combined_radius);
    }
    world.stats.contacts = world.hash.contacts().len() as u32;
    world.stats.duplicate_contacts = world.hash.duplicate_count() as u32;

    // === SOLVE: positional correction, then constraints (pass 6) ===
    let t0 = PerfTimer::start_if(perf_on);
    correct_positions(&mut world.store, world.hash.contacts());
    if !constraints.is_empty() {
        world.stats.constraint_fallbacks = solve_all(constraints, &mut world.store, dt)? as u32;
    }
    confine_positions(&mut world.store, &world.bounds);
    if let Some(t0) = t0 {
        world.stats.solve_ms = t0.elapsed_ms();
    }

    // === VELOCITY + RESTITUTION (passes 7-8) ===
    let t0 = PerfTimer::start_if(perf_on);
    update_velocities(&mut world.store, dt);
    resolve_restitution(&mut world.store, world.hash.contacts());
    if let Some(t0) = t0 {
        world.stats.restitution_ms = t0.elapsed_ms();
    }

    // Every contact goes back to the pool before the next frame
    world.hash.recycle_contacts();
    world.stats.pool_available = world.hash.contact_pool().available() as u32;

    world.frame += 1;
    if let Some(t) = step_start {
        world.stats.step_ms = t.elapsed_ms();
    }
    Ok(world.stats.clone())
}
