use serde::{Deserialize, Serialize};

use crate::math::Vec2;

use super::error::SimError;

pub const DEFAULT_MAX_PARTICLES: usize = 10_000;
pub const DEFAULT_CELL_SPACING: f32 = 2.0;
pub const DEFAULT_WORLD_EXTENT: f32 = 300.0;
pub const DEFAULT_WORLD_MARGIN: f32 = 10.0;
pub const DEFAULT_PARTICLE_RADIUS: f32 = 1.0;
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, 9.81];
pub const DEFAULT_CONTACT_POOL_CAPACITY: usize = 40_000;
pub const DEFAULT_MAX_TIME_STEP: f32 = 0.2;

/// Simulation settings, loadable from a JSON document.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Fixed particle capacity (also sizes the spatial hash table)
    pub max_particles: usize,
    /// Spatial hash cell size, in world units
    pub cell_spacing: f32,
    /// Upper world edge on both axes
    pub world_extent: f32,
    /// Lower world edge on both axes
    pub world_margin: f32,
    /// Radius shared by every bulk-simulated particle
    pub particle_radius: f32,
    /// Contact distance between two particle centres
    pub combined_radius: f32,
    pub gravity: [f32; 2],
    pub contact_pool_capacity: usize,
    /// Facade-level cap on the per-frame dt (the core never caps)
    pub max_time_step: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            cell_spacing: DEFAULT_CELL_SPACING,
            world_extent: DEFAULT_WORLD_EXTENT,
            world_margin: DEFAULT_WORLD_MARGIN,
            particle_radius: DEFAULT_PARTICLE_RADIUS,
            combined_radius: DEFAULT_PARTICLE_RADIUS * 2.0,
            gravity: DEFAULT_GRAVITY,
            contact_pool_capacity: DEFAULT_CONTACT_POOL_CAPACITY,
            max_time_step: DEFAULT_MAX_TIME_STEP,
        }
    }
}

impl SimulationConfig {
    /// Defaults with the three driver-facing knobs overridden.
    pub fn with_world(max_particles: usize, cell_spacing: f32, world_extent: f32) -> Self {
        Self {
            max_particles,
            cell_spacing,
            world_extent,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SimulationConfig =
            serde_json::from_str(json).map_err(|e| SimError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity[0], self.gravity[1])
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_particles == 0 {
            return Err(SimError::InvalidConfiguration { reason: "maxParticles must be > 0" });
        }
        if !(self.cell_spacing.is_finite() && self.cell_spacing > 0.0) {
            return Err(SimError::InvalidConfiguration { reason: "cellSpacing must be > 0" });
        }
        if !(self.particle_radius.is_finite() && self.particle_radius >= 0.0) {
            return Err(SimError::InvalidConfiguration { reason: "particleRadius must be >= 0" });
        }
        if !(self.combined_radius.is_finite() && self.combined_radius > 0.0) {
            return Err(SimError::InvalidConfiguration { reason: "combinedRadius must be > 0" });
        }
        if !self.world_margin.is_finite() || !self.world_extent.is_finite() {
            return Err(SimError::InvalidConfiguration { reason: "world edges must be finite" });
        }
        if self.world_margin + self.particle_radius > self.world_extent - self.particle_radius {
            return Err(SimError::InvalidConfiguration {
                reason: "worldExtent leaves no room between the boundaries",
            });
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(SimError::InvalidConfiguration { reason: "gravity must be finite" });
        }
        if !(self.max_time_step.is_finite() && self.max_time_step > 0.0) {
            return Err(SimError::InvalidConfiguration { reason: "maxTimeStep must be > 0" });
        }
        Ok(())
    }
}
