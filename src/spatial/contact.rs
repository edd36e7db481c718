use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::math::Vec2;
use crate::particles::ParticleId;

/// Overlap between two particles
///
/// `normal` points from `a` to `b`. Identity ignores order: `(a, b)` and
/// `(b, a)` compare and hash equal, so a set holds each pair once.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub a: ParticleId,
    pub b: ParticleId,
    pub normal: Vec2,
    pub depth: f32,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            a: ParticleId(0),
            b: ParticleId(0),
            normal: Vec2::ZERO,
            depth: 0.0,
        }
    }
}

impl Contact {
    /// Overwrite a (possibly pooled) contact in place
    #[inline(always)]
    pub fn configure(mut self, a: ParticleId, b: ParticleId, normal: Vec2, depth: f32) -> Self {
        self.a = a;
        self.b = b;
        self.normal = normal;
        self.depth = depth;
        self
    }

    /// Ids ordered low-high
    #[inline(always)]
    pub fn key(&self) -> (ParticleId, ParticleId) {
        if self.a <= self.b { (self.a, self.b) } else { (self.b, self.a) }
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Per-frame contact list with O(1) duplicate rejection
///
/// Contacts are kept in generation order (deterministic resolution); the
/// side set only answers "seen this pair already?".
pub struct ContactSet {
    contacts: Vec<Contact>,
    seen: HashSet<Contact>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self {
            contacts: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Empty the set and make room for `expected` contacts
    pub fn reset(&mut self, expected: usize) {
        self.contacts.clear();
        self.seen.clear();
        self.contacts.reserve(expected);
        self.seen.reserve(expected);
    }

    /// Insert unless the unordered pair is already present.
    /// A rejected contact is handed back so the caller can recycle it.
    pub fn insert(&mut self, contact: Contact) -> Result<(), Contact> {
        if self.seen.insert(contact) {
            self.contacts.push(contact);
            Ok(())
        } else {
            Err(contact)
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }

    /// Move every contact out (generation order), leaving the set empty
    pub fn drain(&mut self) -> std::vec::Drain<'_, Contact> {
        self.seen.clear();
        self.contacts.drain(..)
    }
}

impl Default for ContactSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(a: u32, b: u32) -> Contact {
        Contact::default().configure(ParticleId(a), ParticleId(b), Vec2::new(0.0, 1.0), 0.5)
    }

    #[test]
    fn identity_ignores_order() {
        assert_eq!(contact(3, 9), contact(9, 3));
        assert_ne!(contact(3, 9), contact(3, 8));

        let mut set = HashSet::new();
        set.insert(contact(3, 9));
        assert!(set.contains(&contact(9, 3)));
    }

    #[test]
    fn set_rejects_reversed_duplicates_and_keeps_order() {
        let mut set = ContactSet::new();
        set.reset(8);
        assert!(set.insert(contact(0, 1)).is_ok());
        assert!(set.insert(contact(2, 1)).is_ok());
        let rejected = set.insert(contact(1, 0)).unwrap_err();
        assert_eq!(rejected.a, ParticleId(1));
        assert_eq!(set.len(), 2);
        assert!(set.insert(contact(1, 2)).is_err());

        let drained: Vec<_> = set.drain().map(|c| c.key()).collect();
        assert_eq!(
            drained,
            vec![(ParticleId(0), ParticleId(1)), (ParticleId(1), ParticleId(2))]
        );
        assert!(set.is_empty());
        // Draining forgets the pairs too
        assert!(set.insert(contact(0, 1)).is_ok());
    }
}
