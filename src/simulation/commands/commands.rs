use crate::core::SimError;
use crate::math::Vec2;
use crate::particles::ParticleId;
use crate::systems::{Constraint, DistanceConstraint, ShapeMatchingConstraint};

use super::random::next_unit;
use super::ParticleManager;

pub(super) fn add_particle(
    world: &mut ParticleManager,
    position: Vec2,
    restitution: f32,
    mass: f32,
) -> Result<ParticleId, SimError> {
    if !position.is_finite() || !restitution.is_finite() {
        return Err(SimError::InvalidConfiguration { reason: "particle state must be finite" });
    }

    world.store.push(position, restitution, mass).map_err(|err| {
        engine_warn!("add_particle rejected: {}", err);
        err
    })
}

pub(super) fn scatter_particles(
    world: &mut ParticleManager,
    count: usize,
    seed: u32,
    min: Vec2,
    max: Vec2,
    restitution: f32,
) -> Result<usize, SimError> {
    let span = max - min;
    if !span.is_finite() || !min.is_finite() || max.x < min.x || max.y < min.y {
        return Err(SimError::InvalidConfiguration { reason: "scatter rectangle is empty or not finite" });
    }
    if !restitution.is_finite() {
        return Err(SimError::InvalidConfiguration { reason: "particle state must be finite" });
    }
    // All or nothing: refuse up front rather than fill part of the request
    let free = world.store.capacity() - world.store.len();
    if count > free {
        engine_warn!("scatter of {} particles rejected, {} slots free", count, free);
        return Err(SimError::CapacityExceeded {
            resource: "particle",
            limit: world.store.capacity(),
        });
    }

    let mut rng = seed;
    for _ in 0..count {
        let x = min.x + next_unit(&mut rng) * span.x;
        let y = min.y + next_unit(&mut rng) * span.y;
        let mass = next_unit(&mut rng);
        add_particle(world, Vec2::new(x, y), restitution, mass)?;
    }
    Ok(count)
}

pub(super) fn distance_constraint(
    world: &ParticleManager,
    a: ParticleId,
    b: ParticleId,
    target: f32,
    stiffness: f32,
) -> Result<Constraint, SimError> {
    Ok(DistanceConstraint::new(&world.store, a, b, target, stiffness)?.into())
}

pub(super) fn shape_match(world: &ParticleManager, members: &[ParticleId]) -> Result<Constraint, SimError> {
    Ok(ShapeMatchingConstraint::new(&world.store, members)?.into())
}

pub(super) fn clear(world: &mut ParticleManager) {
    world.store.clear();
    world.hash.recycle_contacts();
    world.hash.rebuild(&[]);
    world.frame = 0;
    world.stats.reset();
}
