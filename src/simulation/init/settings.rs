use crate::math::Vec2;

use super::step_stats::StepStats;
use super::ParticleManager;

pub(super) fn enable_perf_metrics(world: &mut ParticleManager, enabled: bool) {
    world.perf_enabled = enabled;
}

pub(super) fn get_stats(world: &ParticleManager) -> StepStats {
    world.stats.clone()
}

pub(super) fn set_gravity(world: &mut ParticleManager, x: f32, y: f32) {
    world.gravity = Vec2::new(x, y);
    world.config.gravity = [x, y];
}
