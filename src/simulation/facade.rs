use wasm_bindgen::prelude::*;

use crate::core::{SimError, SimulationConfig};
use crate::math::Vec2;
use crate::particles::ParticleId;
use crate::systems::Constraint;

use super::render::RenderBuffer;
use super::step_stats::StepStats;
use super::ParticleManager;

#[inline]
fn to_js(err: SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JS-facing driver: a manager, the constraints it steps with, and a render buffer.
#[wasm_bindgen]
pub struct World {
    core: ParticleManager,
    constraints: Vec<Constraint>,
    render: RenderBuffer,
}

impl World {
    fn from_core(core: ParticleManager) -> Self {
        let capacity = core.capacity();
        Self {
            core,
            constraints: Vec::new(),
            render: RenderBuffer::with_capacity(capacity),
        }
    }

    pub fn core(&self) -> &ParticleManager { &self.core }

    pub fn constraints(&self) -> &[Constraint] { &self.constraints }

    pub fn render_buffer(&self) -> &RenderBuffer { &self.render }
}

#[wasm_bindgen]
impl World {
    /// Default world settings with the given capacity, cell spacing and extent
    #[wasm_bindgen(constructor)]
    pub fn new(max_particles: u32, cell_spacing: f32, world_extent: f32) -> Result<World, JsValue> {
        let config = SimulationConfig::with_world(max_particles as usize, cell_spacing, world_extent);
        let core = ParticleManager::with_config(config).map_err(to_js)?;
        Ok(Self::from_core(core))
    }

    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: String) -> Result<World, JsValue> {
        let core = ParticleManager::from_config_json(&json).map_err(to_js)?;
        Ok(Self::from_core(core))
    }

    /// Effective configuration as JSON
    pub fn config_json(&self) -> String {
        self.core.config().to_json()
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.core.particle_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn capacity(&self) -> u32 { self.core.capacity() as u32 }

    #[wasm_bindgen(getter)]
    pub fn constraint_count(&self) -> u32 { self.constraints.len() as u32 }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    /// Enable or disable per-pass timings (adds timer overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Last step snapshot (timings are zero when perf is disabled)
    pub fn get_step_stats(&self) -> StepStats {
        self.core.stats()
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.core.set_gravity(x, y);
    }

    /// Returns the new particle id
    pub fn add_particle(&mut self, x: f32, y: f32, restitution: f32, mass: f32) -> Result<u32, JsValue> {
        let id = self
            .core
            .add_particle(Vec2::new(x, y), restitution, mass)
            .map_err(to_js)?;
        Ok(id.0)
    }

    /// Seeded uniform scatter of all `count` particles, or none on error
    #[allow(clippy::too_many_arguments)]
    pub fn scatter_particles(
        &mut self,
        count: u32,
        seed: u32,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
        restitution: f32,
    ) -> Result<u32, JsValue> {
        let added = self
            .core
            .scatter_particles(
                count as usize,
                seed,
                Vec2::new(min_x, min_y),
                Vec2::new(max_x, max_y),
                restitution,
            )
            .map_err(to_js)?;
        Ok(added as u32)
    }

    /// Returns the constraint's index
    pub fn add_distance_constraint(&mut self, a: u32, b: u32, target: f32, stiffness: f32) -> Result<u32, JsValue> {
        let constraint = self
            .core
            .distance_constraint(ParticleId(a), ParticleId(b), target, stiffness)
            .map_err(to_js)?;
        self.constraints.push(constraint);
        Ok(self.constraints.len() as u32 - 1)
    }

    /// Returns the constraint's index
    pub fn add_shape_match(&mut self, members: Vec<u32>) -> Result<u32, JsValue> {
        let members: Vec<ParticleId> = members.into_iter().map(ParticleId).collect();
        let constraint = self.core.shape_match(&members).map_err(to_js)?;
        self.constraints.push(constraint);
        Ok(self.constraints.len() as u32 - 1)
    }

    /// Step with the registered constraints. Large frame gaps are capped at
    /// `maxTimeStep`; `dt <= 0` and NaN are still rejected.
    pub fn step(&mut self, dt: f32) -> Result<StepStats, JsValue> {
        let max_dt = self.core.config().max_time_step;
        let dt = if dt > max_dt { max_dt } else { dt };
        self.core
            .step_with_constraints(dt, &mut self.constraints)
            .map_err(to_js)
    }

    /// Refill the render buffer; returns the circle count
    pub fn render(&mut self) -> u32 {
        self.render.clear();
        self.core.render_with_constraints(&self.constraints, &mut self.render);
        self.render.circle_count() as u32
    }

    /// `step` then `render`
    pub fn update(&mut self, dt: f32) -> Result<StepStats, JsValue> {
        let stats = self.step(dt)?;
        self.render();
        Ok(stats)
    }

    /// Drop every particle and constraint
    pub fn clear(&mut self) {
        self.constraints.clear();
        self.core.clear();
        self.render.clear();
    }

    // === Render buffer views (valid until the next render call) ===

    /// `[x, y, r]` per circle
    pub fn circles_ptr(&self) -> *const f32 {
        self.render.circles_ptr()
    }

    pub fn circle_colors_ptr(&self) -> *const u32 {
        self.render.circle_colors_ptr()
    }

    pub fn circle_count(&self) -> u32 {
        self.render.circle_count() as u32
    }

    /// `[x, y, w, h]` per rect
    pub fn rects_ptr(&self) -> *const f32 {
        self.render.rects_ptr()
    }

    pub fn rect_colors_ptr(&self) -> *const u32 {
        self.render.rect_colors_ptr()
    }

    pub fn rect_count(&self) -> u32 {
        self.render.rect_count() as u32
    }
}
