use wasm_bindgen::prelude::*;

/// Snapshot of the last step.
///
/// Counters are always filled; `*_ms` timings stay 0 unless perf metrics are enabled.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub(super) step_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) broad_phase_ms: f64,
    pub(super) contacts_ms: f64,
    pub(super) solve_ms: f64,
    pub(super) restitution_ms: f64,

    pub(super) particle_count: u32,
    pub(super) boundary_clamps: u32,
    pub(super) contacts: u32,
    pub(super) duplicate_contacts: u32,
    pub(super) constraint_fallbacks: u32,
    pub(super) pool_available: u32,
}

impl StepStats {
    pub(crate) fn reset(&mut self) {
        *self = StepStats::default();
    }
}

#[wasm_bindgen]
impl StepStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    #[wasm_bindgen(getter)]
    pub fn broad_phase_ms(&self) -> f64 { self.broad_phase_ms }
    #[wasm_bindgen(getter)]
    pub fn contacts_ms(&self) -> f64 { self.contacts_ms }
    #[wasm_bindgen(getter)]
    pub fn solve_ms(&self) -> f64 { self.solve_ms }
    #[wasm_bindgen(getter)]
    pub fn restitution_ms(&self) -> f64 { self.restitution_ms }
    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.particle_count }
    #[wasm_bindgen(getter)]
    pub fn boundary_clamps(&self) -> u32 { self.boundary_clamps }
    #[wasm_bindgen(getter)]
    pub fn contacts(&self) -> u32 { self.contacts }
    #[wasm_bindgen(getter)]
    pub fn duplicate_contacts(&self) -> u32 { self.duplicate_contacts }
    #[wasm_bindgen(getter)]
    pub fn constraint_fallbacks(&self) -> u32 { self.constraint_fallbacks }
    #[wasm_bindgen(getter)]
    pub fn pool_available(&self) -> u32 { self.pool_available }
}
