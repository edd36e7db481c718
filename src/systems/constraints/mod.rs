//! Constraints - position-level corrections applied after contact resolution
//!
//! The set is closed: pairwise distance links and rigid shape matching.
//! Constraints hold `ParticleId` handles and borrow the store mutably only
//! for the duration of a solve.

mod distance;
mod shape_matching;

pub use distance::DistanceConstraint;
pub use shape_matching::{RotationFit, ShapeMatchingConstraint};

use crate::core::error::SimError;
use crate::particles::ParticleStore;
use crate::simulation::render::{RenderSink, SHAPE_MEMBER_COLOR, SHAPE_MEMBER_RADIUS};

#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    Distance(DistanceConstraint),
    ShapeMatch(ShapeMatchingConstraint),
}

/// What a single solve did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolveOutcome {
    Solved,
    /// Shape match hit a singular covariance and used the identity rotation
    DegenerateFallback,
}

impl Constraint {
    /// Fails with `StaleHandle` / `InvalidParticle` if any handle no longer
    /// refers to a particle of `store`.
    pub fn validate(&self, store: &ParticleStore) -> Result<(), SimError> {
        match self {
            Constraint::Distance(c) => c.validate(store),
            Constraint::ShapeMatch(c) => c.validate(store),
        }
    }

    /// One relaxation pass. `_dt` is accepted for drivers that scale by time;
    /// neither constraint kind uses it. Nothing moves on error.
    pub fn solve(&mut self, store: &mut ParticleStore, _dt: f32) -> Result<SolveOutcome, SimError> {
        let outcome = match self {
            Constraint::Distance(c) => {
                c.solve(store)?;
                SolveOutcome::Solved
            }
            Constraint::ShapeMatch(c) => match c.solve(store)? {
                RotationFit::Fitted(_) => SolveOutcome::Solved,
                RotationFit::IdentityFallback => {
                    if c.note_fallback() {
                        engine_warn!(
                            "shape match over {} members is degenerate, using identity rotation",
                            c.members().len()
                        );
                    }
                    SolveOutcome::DegenerateFallback
                }
            },
        };
        Ok(outcome)
    }

    /// Debug overlay: shape-match members as blue dots (nothing for stale handles)
    pub fn render<S: RenderSink + ?Sized>(&self, store: &ParticleStore, sink: &mut S) {
        if let Constraint::ShapeMatch(c) = self {
            if c.validate(store).is_err() {
                return;
            }
            for &id in c.members() {
                sink.circle(store.position(id), SHAPE_MEMBER_RADIUS, SHAPE_MEMBER_COLOR);
            }
        }
    }
}

impl From<DistanceConstraint> for Constraint {
    fn from(c: DistanceConstraint) -> Self {
        Constraint::Distance(c)
    }
}

impl From<ShapeMatchingConstraint> for Constraint {
    fn from(c: ShapeMatchingConstraint) -> Self {
        Constraint::ShapeMatch(c)
    }
}

/// Every constraint's handles are live in `store`
pub fn validate_all(constraints: &[Constraint], store: &ParticleStore) -> Result<(), SimError> {
    constraints.iter().try_for_each(|c| c.validate(store))
}

/// Solve every constraint once, in order. Returns the number of degenerate fallbacks.
/// All handles are checked up front, so an error leaves `store` untouched.
pub fn solve_all(constraints: &mut [Constraint], store: &mut ParticleStore, dt: f32) -> Result<usize, SimError> {
    validate_all(constraints, store)?;

    let mut fallbacks = 0;
    for constraint in constraints.iter_mut() {
        if constraint.solve(store, dt)? == SolveOutcome::DegenerateFallback {
            fallbacks += 1;
        }
    }
    Ok(fallbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::particles::ParticleId;
    use crate::simulation::render::RenderBuffer;

    #[test]
    fn dispatch_reports_fallbacks() {
        let mut store = ParticleStore::new(5);
        let ids: Vec<ParticleId> = [(10.0, 10.0), (12.0, 10.0), (14.0, 10.0), (30.0, 30.0), (36.0, 30.0)]
            .iter()
            .map(|&(x, y)| store.push(Vec2::new(x, y), 0.0, 1.0).unwrap())
            .collect();

        let mut constraints: Vec<Constraint> = vec![
            ShapeMatchingConstraint::new(&store, &ids[..3]).unwrap().into(),
            DistanceConstraint::new(&store, ids[3], ids[4], 4.0, 1.0).unwrap().into(),
        ];

        let fallbacks = solve_all(&mut constraints, &mut store, 1.0 / 60.0).unwrap();
        assert_eq!(fallbacks, 1);
        assert!((store.position(ids[3]).distance(store.position(ids[4])) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn only_shape_matches_draw_an_overlay() {
        let mut store = ParticleStore::new(3);
        let a = store.push(Vec2::new(10.0, 10.0), 0.0, 1.0).unwrap();
        let b = store.push(Vec2::new(14.0, 10.0), 0.0, 1.0).unwrap();
        let c = store.push(Vec2::new(12.0, 14.0), 0.0, 1.0).unwrap();

        let shape: Constraint = ShapeMatchingConstraint::new(&store, &[a, b, c]).unwrap().into();
        let link: Constraint = DistanceConstraint::new(&store, a, b, 4.0, 1.0).unwrap().into();

        let mut buffer = RenderBuffer::new();
        link.render(&store, &mut buffer);
        assert_eq!(buffer.circle_count(), 0);
        shape.render(&store, &mut buffer);
        assert_eq!(buffer.circle_count(), 3);
        assert_eq!(buffer.circle_colors()[0], SHAPE_MEMBER_COLOR);
    }

    #[test]
    fn one_stale_constraint_blocks_the_whole_batch() {
        let mut store = ParticleStore::new(4);
        let a = store.push(Vec2::new(10.0, 10.0), 0.0, 1.0).unwrap();
        let b = store.push(Vec2::new(20.0, 10.0), 0.0, 1.0).unwrap();

        let mut other = ParticleStore::new(4);
        for i in 0..4 {
            other.push(Vec2::new(50.0 + i as f32, 50.0), 0.0, 1.0).unwrap();
        }

        let mut constraints: Vec<Constraint> = vec![
            DistanceConstraint::new(&store, a, b, 4.0, 1.0).unwrap().into(),
            DistanceConstraint::new(&other, ParticleId(2), ParticleId(3), 1.0, 1.0).unwrap().into(),
        ];

        let before = store.live_positions().to_vec();
        assert!(matches!(
            solve_all(&mut constraints, &mut store, 1.0 / 60.0),
            Err(SimError::InvalidParticle { id: 2, .. })
        ));
        assert_eq!(store.live_positions(), &before[..]);

        let mut buffer = RenderBuffer::new();
        let stale: Constraint = ShapeMatchingConstraint::new(&other, &[ParticleId(2), ParticleId(3)]).unwrap().into();
        stale.render(&store, &mut buffer);
        assert_eq!(buffer.circle_count(), 0);
    }
}
