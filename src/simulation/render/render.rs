//! Render output - the only way simulation state leaves the core for drawing
//!
//! The host passes a `RenderSink` explicitly; nothing here touches a global
//! drawing surface. `RenderBuffer` is the sink the wasm facade uses: flat
//! arrays JS reads straight out of linear memory.
//!
//! Colors are packed ABGR (little-endian RGBA bytes), same as a canvas
//! `ImageData` view over the buffer.

use crate::math::Vec2;

use super::ParticleManager;

/// Plain particles: opaque white
pub const PARTICLE_COLOR: u32 = 0xFFFF_FFFF;
/// Shape-match members: opaque blue
pub const SHAPE_MEMBER_COLOR: u32 = 0xFFFF_0000;
pub const SHAPE_MEMBER_RADIUS: f32 = 2.0;

/// Receives draw calls. Coordinates are world units.
pub trait RenderSink {
    fn circle(&mut self, center: Vec2, radius: f32, color: u32);
    fn rect(&mut self, origin: Vec2, size: Vec2, color: u32);
}

/// Flat transfer buffers:
/// - circles: `[x, y, r]` per circle, colors parallel
/// - rects:   `[x, y, w, h]` per rect, colors parallel
#[derive(Clone, Debug, Default)]
pub struct RenderBuffer {
    circles: Vec<f32>,
    circle_colors: Vec<u32>,
    rects: Vec<f32>,
    rect_colors: Vec<u32>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(circles: usize) -> Self {
        Self {
            circles: Vec::with_capacity(circles * 3),
            circle_colors: Vec::with_capacity(circles),
            rects: Vec::new(),
            rect_colors: Vec::new(),
        }
    }

    /// Drop last frame's draw calls, keep the allocations
    pub fn clear(&mut self) {
        self.circles.clear();
        self.circle_colors.clear();
        self.rects.clear();
        self.rect_colors.clear();
    }

    #[inline]
    pub fn circle_count(&self) -> usize { self.circle_colors.len() }

    #[inline]
    pub fn rect_count(&self) -> usize { self.rect_colors.len() }

    pub fn circles(&self) -> &[f32] { &self.circles }

    pub fn circle_colors(&self) -> &[u32] { &self.circle_colors }

    pub fn rects(&self) -> &[f32] { &self.rects }

    pub fn rect_colors(&self) -> &[u32] { &self.rect_colors }

    // === Raw pointers for JS (valid until the next frame) ===

    pub fn circles_ptr(&self) -> *const f32 { self.circles.as_ptr() }

    pub fn circle_colors_ptr(&self) -> *const u32 { self.circle_colors.as_ptr() }

    pub fn rects_ptr(&self) -> *const f32 { self.rects.as_ptr() }

    pub fn rect_colors_ptr(&self) -> *const u32 { self.rect_colors.as_ptr() }
}

impl RenderSink for RenderBuffer {
    #[inline]
    fn circle(&mut self, center: Vec2, radius: f32, color: u32) {
        self.circles.extend_from_slice(&[center.x, center.y, radius]);
        self.circle_colors.push(color);
    }

    #[inline]
    fn rect(&mut self, origin: Vec2, size: Vec2, color: u32) {
        self.rects.extend_from_slice(&[origin.x, origin.y, size.x, size.y]);
        self.rect_colors.push(color);
    }
}

/// One circle per live particle, in id order
pub(super) fn emit_particles<S: RenderSink + ?Sized>(world: &ParticleManager, sink: &mut S) {
    let radius = world.config.particle_radius;
    for &position in world.store.live_positions() {
        sink.circle(position, radius, PARTICLE_COLOR);
    }
}
