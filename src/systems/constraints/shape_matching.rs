//! Shape matching - keeps a particle group a rigid transform of its rest pose
//!
//! Each solve fits a rotation to the group's current pose:
//!
//! ```text
//! A = sum (p_i - com) (q_i)^T          q_i = rest offset
//! R = A + |det A| * (A^T)^-1           then R /= sqrt(|det R|)
//! p_i <- R q_i + com
//! ```
//!
//! For det A > 0 the sum `A + |det A| * (A^T)^-1` is a scaled rotation, so
//! the normalisation leaves a proper rotation. Singular A (collinear or
//! coincident members) falls back to the identity rotation.

use crate::core::error::SimError;
use crate::math::{Matrix2, Vec2};
use crate::particles::{ParticleId, ParticleStore};

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeMatchingConstraint {
    members: Vec<ParticleId>,
    /// Mass weight per member (0 = static, never moved)
    weights: Vec<f32>,
    inverse_total_weight: f32,
    rest_center: Vec2,
    rest_offsets: Vec<Vec2>,
    generation: u32,
    fallback_reported: bool,
}

/// How the last solve picked its rotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationFit {
    Fitted(Matrix2),
    IdentityFallback,
}

impl ShapeMatchingConstraint {
    /// Capture the members' current pose as the rest shape.
    pub fn new(store: &ParticleStore, members: &[ParticleId]) -> Result<Self, SimError> {
        if members.len() < 2 {
            return Err(SimError::InvalidConstraint { reason: "shape match needs at least two members" });
        }
        for (i, &id) in members.iter().enumerate() {
            store.check(id)?;
            if members[..i].contains(&id) {
                return Err(SimError::InvalidConstraint { reason: "shape match member listed twice" });
            }
        }

        let weights: Vec<f32> = members.iter().map(|&id| store.mass(id)).collect();
        let total: f32 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(SimError::InvalidConstraint { reason: "shape match needs a dynamic member" });
        }
        let inverse_total_weight = 1.0 / total;

        let mut rest_center = Vec2::ZERO;
        for (&id, &w) in members.iter().zip(&weights) {
            rest_center += store.position(id) * w;
        }
        rest_center *= inverse_total_weight;

        let rest_offsets = members
            .iter()
            .map(|&id| store.position(id) - rest_center)
            .collect();

        Ok(Self {
            members: members.to_vec(),
            weights,
            inverse_total_weight,
            rest_center,
            rest_offsets,
            generation: store.generation(),
            fallback_reported: false,
        })
    }

    pub fn members(&self) -> &[ParticleId] { &self.members }

    pub fn rest_center(&self) -> Vec2 { self.rest_center }

    pub fn rest_offsets(&self) -> &[Vec2] { &self.rest_offsets }

    /// Mass-weighted centre of the members' current positions
    pub fn center_of_mass(&self, store: &ParticleStore) -> Vec2 {
        let mut com = Vec2::ZERO;
        for (&id, &w) in self.members.iter().zip(&self.weights) {
            com += store.position(id) * w;
        }
        com * self.inverse_total_weight
    }

    /// Covariance of current offsets against rest offsets
    pub fn covariance(&self, store: &ParticleStore, com: Vec2) -> Matrix2 {
        let mut a = Matrix2::ZERO;
        for (&id, &rest) in self.members.iter().zip(&self.rest_offsets) {
            a = a + Matrix2::outer(store.position(id) - com, rest);
        }
        a
    }

    /// Best-fit rotation, or `DegenerateConfiguration` when A (or R) is singular.
    pub fn fit_rotation(&self, covariance: Matrix2) -> Result<Matrix2, SimError> {
        let det_a = covariance.determinant();
        let inverse_transpose = covariance
            .transpose()
            .try_inverse()
            .ok_or(SimError::DegenerateConfiguration { determinant: det_a })?;

        let r = covariance + det_a.abs() * inverse_transpose;
        let det_r = r.determinant();
        if r.is_near_singular() {
            return Err(SimError::DegenerateConfiguration { determinant: det_r });
        }

        Ok(r * (1.0 / det_r.abs().sqrt()))
    }

    /// True only the first time this constraint hits the identity fallback.
    pub(crate) fn note_fallback(&mut self) -> bool {
        !std::mem::replace(&mut self.fallback_reported, true)
    }

    /// Every member handle still refers to the particle this was built on
    pub fn validate(&self, store: &ParticleStore) -> Result<(), SimError> {
        store.check_all(self.generation, &self.members)
    }

    /// Snap every dynamic member onto its goal position.
    pub fn solve(&self, store: &mut ParticleStore) -> Result<RotationFit, SimError> {
        self.validate(store)?;

        let com = self.center_of_mass(store);
        let (rotation, fit) = match self.fit_rotation(self.covariance(store, com)) {
            Ok(r) => (r, RotationFit::Fitted(r)),
            Err(_) => (Matrix2::IDENTITY, RotationFit::IdentityFallback),
        };

        for ((&id, &rest), &w) in self.members.iter().zip(&self.rest_offsets).zip(&self.weights) {
            if w <= 0.0 {
                continue;
            }
            store.set_position(id, rotation * rest + com);
        }

        Ok(fit)
    }
}
