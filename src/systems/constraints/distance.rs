use crate::core::error::SimError;
use crate::particles::{ParticleId, ParticleStore};

/// Pulls two particles toward a target separation, one relaxation pass per call.
///
/// Each pass moves the pair by `stiffness` of the full correction, split by
/// inverse mass; repeated calls across frames converge on `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint {
    a: ParticleId,
    b: ParticleId,
    target: f32,
    stiffness: f32,
    generation: u32,
}

impl DistanceConstraint {
    /// `stiffness` is clamped to `[0, 1]`; 1 closes the whole gap in one pass.
    pub fn new(
        store: &ParticleStore,
        a: ParticleId,
        b: ParticleId,
        target: f32,
        stiffness: f32,
    ) -> Result<Self, SimError> {
        store.check(a)?;
        store.check(b)?;
        if a == b {
            return Err(SimError::InvalidConstraint { reason: "distance constraint needs two particles" });
        }
        if !(target.is_finite() && target >= 0.0) {
            return Err(SimError::InvalidConstraint { reason: "target distance must be >= 0" });
        }
        if !stiffness.is_finite() {
            return Err(SimError::InvalidConstraint { reason: "stiffness must be finite" });
        }
        Ok(Self {
            a,
            b,
            target,
            stiffness: stiffness.clamp(0.0, 1.0),
            generation: store.generation(),
        })
    }

    pub fn particles(&self) -> (ParticleId, ParticleId) { (self.a, self.b) }

    pub fn target(&self) -> f32 { self.target }

    pub fn stiffness(&self) -> f32 { self.stiffness }

    /// Current separation minus target (positive = stretched)
    pub fn error(&self, store: &ParticleStore) -> f32 {
        store.position(self.a).distance(store.position(self.b)) - self.target
    }

    /// Both handles still refer to the particles this was built on
    pub fn validate(&self, store: &ParticleStore) -> Result<(), SimError> {
        store.check_all(self.generation, &[self.a, self.b])
    }

    pub fn solve(&self, store: &mut ParticleStore) -> Result<(), SimError> {
        self.validate(store)?;

        let wa = store.inverse_mass(self.a);
        let wb = store.inverse_mass(self.b);
        let w_sum = wa + wb;
        if w_sum <= 0.0 {
            return Ok(()); // both static
        }

        let delta = store.position(self.a) - store.position(self.b);
        let current = delta.length();
        // Coincident particles have no direction to push along
        let Some(direction) = delta.try_normalize() else {
            return Ok(());
        };

        let lambda = -(current - self.target) / w_sum * self.stiffness;
        let pa = store.position(self.a) + direction * (lambda * wa);
        let pb = store.position(self.b) - direction * (lambda * wb);
        store.set_position(self.a, pa);
        store.set_position(self.b, pb);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    fn pair(pa: Vec2, pb: Vec2, mass_b: f32) -> (ParticleStore, ParticleId, ParticleId) {
        let mut store = ParticleStore::new(2);
        let a = store.push(pa, 0.0, 1.0).unwrap();
        let b = store.push(pb, 0.0, mass_b).unwrap();
        (store, a, b)
    }

    #[test]
    fn one_pass_is_symmetric_about_the_midpoint() {
        let (mut store, a, b) = pair(Vec2::new(100.0, 100.0), Vec2::new(110.5, 100.0), 1.0);
        let c = DistanceConstraint::new(&store, a, b, 10.0, 1.0).unwrap();
        let mid_before = (store.position(a) + store.position(b)) * 0.5;
        let err_before = c.error(&store).abs();

        c.solve(&mut store).unwrap();

        let mid_after = (store.position(a) + store.position(b)) * 0.5;
        assert!(mid_after.distance(mid_before) < 1e-4);
        assert!(c.error(&store).abs() < err_before);
        assert!(c.error(&store).abs() < 1e-4);
    }

    #[test]
    fn soft_constraint_converges_over_many_passes() {
        let (mut store, a, b) = pair(Vec2::new(50.0, 50.0), Vec2::new(58.0, 56.0), 1.0);
        let c = DistanceConstraint::new(&store, a, b, 5.0, 0.25).unwrap();
        let mut last = c.error(&store).abs();
        for _ in 0..100 {
            c.solve(&mut store).unwrap();
            let err = c.error(&store).abs();
            assert!(err <= last + 1e-5);
            last = err;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn static_particle_does_not_move() {
        let (mut store, a, b) = pair(Vec2::new(20.0, 20.0), Vec2::new(20.0, 30.0), 0.0);
        let c = DistanceConstraint::new(&store, a, b, 4.0, 1.0).unwrap();
        c.solve(&mut store).unwrap();
        assert_eq!(store.position(b), Vec2::new(20.0, 30.0));
        assert!((store.position(a).y - 26.0).abs() < 1e-4);
    }

    #[test]
    fn rejects_bad_handles_and_self_links() {
        let (store, a, _) = pair(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0);
        assert!(matches!(
            DistanceConstraint::new(&store, a, ParticleId(5), 1.0, 1.0),
            Err(SimError::InvalidParticle { id: 5, .. })
        ));
        assert!(DistanceConstraint::new(&store, a, a, 1.0, 1.0).is_err());
        assert_eq!(DistanceConstraint::new(&store, a, ParticleId(1), 1.0, 3.0).unwrap().stiffness(), 1.0);
    }

    #[test]
    fn coincident_pair_is_left_alone() {
        let (mut store, a, b) = pair(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 1.0);
        let c = DistanceConstraint::new(&store, a, b, 2.0, 1.0).unwrap();
        c.solve(&mut store).unwrap();
        assert!(store.position(a).is_finite());
        assert_eq!(store.position(a), store.position(b));
    }

    #[test]
    fn solve_rejects_handles_from_a_cleared_or_foreign_store() {
        let (mut store, a, b) = pair(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0), 1.0);
        let c = DistanceConstraint::new(&store, a, b, 4.0, 1.0).unwrap();

        // Smaller store: handle b is out of range
        let mut small = ParticleStore::new(1);
        small.push(Vec2::new(30.0, 30.0), 0.0, 1.0).unwrap();
        assert!(matches!(c.solve(&mut small), Err(SimError::InvalidParticle { id: 1, .. })));
        assert_eq!(small.position(ParticleId(0)), Vec2::new(30.0, 30.0));

        // Same store after clear: slots are reused by new particles
        store.clear();
        store.push(Vec2::new(100.0, 100.0), 0.0, 1.0).unwrap();
        store.push(Vec2::new(120.0, 100.0), 0.0, 1.0).unwrap();
        assert!(matches!(c.solve(&mut store), Err(SimError::StaleHandle { .. })));
        assert_eq!(store.position(a), Vec2::new(100.0, 100.0));
    }
}
