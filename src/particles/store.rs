use crate::core::error::SimError;
use crate::math::Vec2;

use super::particle::inverse_mass_of;

/// Dense particle handle, valid in `[0, count)` of the store that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u32);

impl ParticleId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// SoA particle store - every attribute in its own fixed-size buffer
///
/// Instead of: Vec<Particle>               // one record per particle
/// We have:    positions[], velocities[]   // linear memory per attribute
///
/// Buffers are allocated once at `capacity` and never grow. Only `[0, count)`
/// is live.
#[derive(Clone)]
pub struct ParticleStore {
    capacity: usize,
    count: usize,
    /// Bumped by `clear`; handles issued before it are stale
    generation: u32,

    pub positions: Vec<Vec2>,
    pub previous_positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    pub pre_solve_velocities: Vec<Vec2>, // velocity snapshot before contact resolution
    pub restitutions: Vec<f32>,
    pub inverse_masses: Vec<f32>,        // 0 = static
}

impl ParticleStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            count: 0,
            generation: 0,
            positions: vec![Vec2::ZERO; capacity],
            previous_positions: vec![Vec2::ZERO; capacity],
            velocities: vec![Vec2::ZERO; capacity],
            pre_solve_velocities: vec![Vec2::ZERO; capacity],
            restitutions: vec![0.0; capacity],
            inverse_masses: vec![0.0; capacity],
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize { self.count }

    #[inline(always)]
    pub fn is_empty(&self) -> bool { self.count == 0 }

    #[inline(always)]
    pub fn capacity(&self) -> usize { self.capacity }

    /// Append a particle at rest. Fails once `capacity` is reached.
    pub fn push(&mut self, position: Vec2, restitution: f32, mass: f32) -> Result<ParticleId, SimError> {
        if self.count >= self.capacity {
            return Err(SimError::CapacityExceeded {
                resource: "particle",
                limit: self.capacity,
            });
        }

        let i = self.count;
        self.positions[i] = position;
        self.previous_positions[i] = position;
        self.velocities[i] = Vec2::ZERO;
        self.pre_solve_velocities[i] = Vec2::ZERO;
        self.restitutions[i] = restitution;
        self.inverse_masses[i] = inverse_mass_of(mass);
        self.count += 1;

        Ok(ParticleId(i as u32))
    }

    /// Forget every particle (buffers stay allocated)
    pub fn clear(&mut self) {
        self.count = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline(always)]
    pub fn generation(&self) -> u32 { self.generation }

    /// Handles captured at `generation` are still live: no `clear` since, and all in range.
    pub fn check_all(&self, generation: u32, ids: &[ParticleId]) -> Result<(), SimError> {
        if generation != self.generation {
            return Err(SimError::StaleHandle { generation, current: self.generation });
        }
        for &id in ids {
            self.check(id)?;
        }
        Ok(())
    }

    pub fn check(&self, id: ParticleId) -> Result<ParticleId, SimError> {
        if id.index() < self.count {
            Ok(id)
        } else {
            Err(SimError::InvalidParticle { id: id.0, count: self.count })
        }
    }

    #[inline(always)]
    pub fn position(&self, id: ParticleId) -> Vec2 {
        self.positions[id.index()]
    }

    #[inline(always)]
    pub fn set_position(&mut self, id: ParticleId, position: Vec2) {
        self.positions[id.index()] = position;
    }

    #[inline(always)]
    pub fn inverse_mass(&self, id: ParticleId) -> f32 {
        self.inverse_masses[id.index()]
    }

    /// Mass used for weighting (0 for static particles)
    #[inline(always)]
    pub fn mass(&self, id: ParticleId) -> f32 {
        let w = self.inverse_masses[id.index()];
        if w > 0.0 { 1.0 / w } else { 0.0 }
    }

    pub fn live_positions(&self) -> &[Vec2] {
        &self.positions[..self.count]
    }

    pub fn ids(&self) -> impl Iterator<Item = ParticleId> + Clone {
        (0..self.count as u32).map(ParticleId)
    }
}
