use crate::core::{SimError, SimulationConfig};
use crate::particles::{ParticleStore, WorldBounds};
use crate::spatial::SpatialHash;

use super::step_stats::StepStats;
use super::ParticleManager;

pub(super) fn create_manager(config: SimulationConfig) -> Result<ParticleManager, SimError> {
    config.validate()?;

    let bounds = WorldBounds::new(config.world_margin, config.world_extent, config.particle_radius);
    let manager = ParticleManager {
        store: ParticleStore::new(config.max_particles),
        hash: SpatialHash::new(config.cell_spacing, config.max_particles, config.contact_pool_capacity),
        bounds,
        gravity: config.gravity(),
        frame: 0,
        perf_enabled: false,
        stats: StepStats::default(),
        config,
    };

    engine_log!(
        "particle manager: capacity={} spacing={} bounds=[{}, {}]",
        manager.config.max_particles,
        manager.config.cell_spacing,
        bounds.min,
        bounds.max
    );
    Ok(manager)
}
