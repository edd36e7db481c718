use crate::core::error::{check_time_step, SimError};
use crate::math::Vec2;

/// Inverse of a mass, or 0 for static (non-positive / non-finite) masses
#[inline]
pub fn inverse_mass_of(mass: f32) -> f32 {
    if mass.is_finite() && mass > 0.0 {
        1.0 / mass
    } else {
        0.0
    }
}

/// Axis-aligned box a particle centre must stay inside: `[min, max]` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    pub min: f32,
    pub max: f32,
}

impl WorldBounds {
    /// `[margin + radius, extent - radius]`
    pub fn new(margin: f32, extent: f32, radius: f32) -> Self {
        Self {
            min: margin + radius,
            max: extent - radius,
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min && p.x <= self.max && p.y >= self.min && p.y <= self.max
    }

    /// Position-only clamp, no velocity change
    #[inline(always)]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min, self.max), p.y.clamp(self.min, self.max))
    }

    /// Clamp `position` into the box and reflect `velocity` on each clamp.
    /// Returns true if anything was clamped.
    ///
    /// NOTE: an x-axis clamp writes `-velocity.y` into `velocity.x`. This is the
    /// long-standing bounce behaviour and the bulk and single-particle paths
    /// both depend on it staying identical.
    #[inline(always)]
    pub fn confine(&self, position: &mut Vec2, velocity: &mut Vec2) -> bool {
        let mut clamped = false;

        if position.y < self.min {
            position.y = self.min;
            velocity.y = -velocity.y;
            clamped = true;
        }
        if position.y > self.max {
            position.y = self.max;
            velocity.y = -velocity.y;
            clamped = true;
        }

        if position.x < self.min {
            position.x = self.min;
            velocity.x = -velocity.y;
            clamped = true;
        }
        if position.x > self.max {
            position.x = self.max;
            velocity.x = -velocity.y;
            clamped = true;
        }

        clamped
    }
}

/// A single self-contained particle.
///
/// The bulk path (`ParticleManager`) keeps the same state in SoA buffers and
/// runs the same integration rule; this type is the per-object form of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    previous_position: Vec2,
    pub velocity: Vec2,
    pre_solve_velocity: Vec2,
    radius: f32,
    restitution: f32,
    mass: f32,
    inverse_mass: f32,
    forces: Vec2,
}

impl Particle {
    pub fn new(position: Vec2, mass: f32, radius: f32, restitution: f32) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            pre_solve_velocity: Vec2::ZERO,
            radius,
            restitution,
            mass,
            inverse_mass: inverse_mass_of(mass),
            forces: Vec2::ZERO,
        }
    }

    /// Rebuild a particle from stored state (no pending forces).
    pub(crate) fn from_state(
        position: Vec2,
        previous_position: Vec2,
        velocity: Vec2,
        pre_solve_velocity: Vec2,
        inverse_mass: f32,
        radius: f32,
        restitution: f32,
    ) -> Self {
        let mass = if inverse_mass > 0.0 { 1.0 / inverse_mass } else { 0.0 };
        Self {
            position,
            previous_position,
            velocity,
            pre_solve_velocity,
            radius,
            restitution,
            mass,
            inverse_mass,
            forces: Vec2::ZERO,
        }
    }

    pub fn previous_position(&self) -> Vec2 { self.previous_position }

    pub fn pre_solve_velocity(&self) -> Vec2 { self.pre_solve_velocity }

    pub fn radius(&self) -> f32 { self.radius }

    pub fn restitution(&self) -> f32 { self.restitution }

    pub fn mass(&self) -> f32 { self.mass }

    pub fn inverse_mass(&self) -> f32 { self.inverse_mass }

    pub fn is_static(&self) -> bool { self.inverse_mass == 0.0 }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inverse_mass = inverse_mass_of(mass);
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.forces += force;
    }

    /// Apply accumulated forces, advance from the previous position, then
    /// confine to `bounds`.
    pub fn integrate(&mut self, dt: f32, bounds: &WorldBounds) -> Result<(), SimError> {
        check_time_step(dt)?;

        self.velocity += self.forces * dt * self.inverse_mass;
        self.pre_solve_velocity = self.velocity;

        self.position = self.previous_position + self.velocity * dt;

        self.forces = Vec2::ZERO;

        bounds.confine(&mut self.position, &mut self.velocity);
        Ok(())
    }

    /// Derive velocity from the position delta and snapshot the position.
    pub fn calculate_velocity(&mut self, dt: f32) -> Result<(), SimError> {
        check_time_step(dt)?;
        self.velocity = (self.position - self.previous_position) / dt;
        self.previous_position = self.position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn bounds() -> WorldBounds {
        WorldBounds::new(10.0, 300.0, 1.0)
    }

    #[test]
    fn non_positive_mass_is_static() {
        assert_eq!(inverse_mass_of(2.0), 0.5);
        assert_eq!(inverse_mass_of(0.0), 0.0);
        assert_eq!(inverse_mass_of(-1.0), 0.0);
        assert_eq!(inverse_mass_of(f32::NAN), 0.0);

        let mut p = Particle::new(Vec2::new(50.0, 50.0), 0.0, 1.0, 0.0);
        assert!(p.is_static());
        p.set_mass(4.0);
        assert_eq!(p.inverse_mass(), 0.25);
    }

    #[test]
    fn integrate_applies_force_once_then_clears_it() {
        let mut p = Particle::new(Vec2::new(100.0, 100.0), 2.0, 1.0, 0.0);
        p.add_force(Vec2::new(0.0, 120.0));
        p.integrate(DT, &bounds()).unwrap();

        // dv = F * dt / m = 120 / 60 / 2
        assert!((p.velocity.y - 1.0).abs() < 1e-5);
        assert_eq!(p.pre_solve_velocity(), p.velocity);
        assert!((p.position.y - (100.0 + DT)).abs() < 1e-4);

        p.calculate_velocity(DT).unwrap();
        let v = p.velocity;
        p.integrate(DT, &bounds()).unwrap();
        assert_eq!(p.velocity, v);
    }

    #[test]
    fn calculate_velocity_uses_position_delta() {
        let mut p = Particle::new(Vec2::new(20.0, 20.0), 1.0, 1.0, 0.0);
        p.position = Vec2::new(21.0, 19.0);
        p.calculate_velocity(0.5).unwrap();
        assert_eq!(p.velocity, Vec2::new(2.0, -2.0));
        assert_eq!(p.previous_position(), p.position);
    }

    #[test]
    fn rejects_non_positive_dt_without_mutating() {
        let mut p = Particle::new(Vec2::new(20.0, 20.0), 1.0, 1.0, 0.0);
        p.add_force(Vec2::new(1.0, 1.0));
        let before = p.clone();
        assert!(p.integrate(0.0, &bounds()).is_err());
        assert!(p.calculate_velocity(-DT).is_err());
        assert_eq!(p, before);
    }

    #[test]
    fn floor_clamp_reflects_vertical_velocity() {
        let b = bounds();
        let mut pos = Vec2::new(100.0, 305.0);
        let mut vel = Vec2::new(0.5, 3.0);
        assert!(b.confine(&mut pos, &mut vel));
        assert_eq!(pos, Vec2::new(100.0, 299.0));
        assert_eq!(vel, Vec2::new(0.5, -3.0));
    }

    #[test]
    fn wall_clamp_takes_reflected_vertical_component() {
        let b = bounds();
        let mut pos = Vec2::new(5.0, 100.0);
        let mut vel = Vec2::new(-4.0, 1.5);
        assert!(b.confine(&mut pos, &mut vel));
        assert_eq!(pos.x, 11.0);
        assert_eq!(vel, Vec2::new(-1.5, 1.5));

        let mut inside = Vec2::new(50.0, 50.0);
        let mut still = Vec2::new(1.0, 1.0);
        assert!(!b.confine(&mut inside, &mut still));
        assert!(b.contains(inside));
    }
}
