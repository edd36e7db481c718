//! Contact response (steps 6 and 8)
//!
//! Positional correction splits each contact's depth between the pair:
//! half each when both are dynamic, all of it on the dynamic side when one
//! is static, nothing when both are static. Restitution then adds a
//! velocity impulse along the contact normal, split by inverse mass.

use crate::particles::ParticleStore;
use crate::spatial::ContactSet;

/// Push every overlapping pair apart along its normal.
pub(super) fn correct_positions(store: &mut ParticleStore, contacts: &ContactSet) {
    for contact in contacts.iter() {
        let (a, b) = (contact.a.index(), contact.b.index());
        // Static-aware rather than a flat half/half: static particles must not move
        let (share_a, share_b) = match (store.inverse_masses[a] > 0.0, store.inverse_masses[b] > 0.0) {
            (true, true) => (0.5, 0.5),
            (true, false) => (1.0, 0.0),
            (false, true) => (0.0, 1.0),
            (false, false) => continue,
        };

        let push = contact.normal * contact.depth;
        store.positions[a] -= push * share_a;
        store.positions[b] += push * share_b;
    }
}

/// Restore bounce along each contact normal.
///
/// NOTE: the coefficient is `r[a] + r[b] * 0.5`, not the mean; existing
/// scenes are tuned against it.
pub(super) fn resolve_restitution(store: &mut ParticleStore, contacts: &ContactSet) {
    for contact in contacts.iter() {
        let (a, b) = (contact.a.index(), contact.b.index());
        let wa = store.inverse_masses[a];
        let wb = store.inverse_masses[b];
        let w_sum = wa + wb;
        if w_sum <= 0.0 {
            continue;
        }

        // Correction and constraints may have moved the pair since detection
        let normal = (store.positions[b] - store.positions[a])
            .try_normalize()
            .unwrap_or(contact.normal);
        let pre_relative = (store.pre_solve_velocities[a] - store.pre_solve_velocities[b]).dot(normal);
        let relative = (store.velocities[a] - store.velocities[b]).dot(normal);
        let e = store.restitutions[a] + store.restitutions[b] * 0.5;

        let impulse = normal * (-relative - e * pre_relative);
        store.velocities[a] += impulse * (wa / w_sum);
        store.velocities[b] -= impulse * (wb / w_sum);
    }
}
