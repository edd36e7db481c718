//! SpatialHash - uniform grid broad phase
//!
//! Cells are `floor(position / spacing)` and hash into `2 * capacity` buckets.
//! The whole structure is rebuilt every frame with a counting sort:
//!
//! 1. count particles per bucket
//! 2. prefix-sum the counts into `cell_starts` (length `table_size + 1`)
//! 3. scatter ids back to front, decrementing each bucket's cursor
//!
//! After step 3, bucket `h` is `entries[cell_starts[h]..cell_starts[h + 1]]`,
//! ids ascending. Distinct cells can share a bucket; contact generation
//! filters by distance, radius queries filter by exact cell.

use std::ops::Range;

use crate::math::Vec2;
use crate::particles::ParticleId;

use super::contact::{Contact, ContactSet};
use super::pool::ObjectPool;

const HASH_PRIME_X: i32 = 92_837_111;
const HASH_PRIME_Y: i32 = 689_287_499;

/// 3x3 neighbourhood scanned for contacts
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (0, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

/// Integer cell coordinates
pub type Cell = (i32, i32);

pub struct SpatialHash {
    spacing: f32,
    table_size: usize,

    /// Bucket start offsets; `cell_starts[table_size]` == live entry count
    cell_starts: Vec<usize>,
    entries: Vec<ParticleId>,
    /// Exact cell of each entry (parallel to `entries`)
    entry_cells: Vec<Cell>,
    len: usize,

    contacts: ContactSet,
    contact_pool: ObjectPool<Contact>,
    duplicates: usize,
}

impl SpatialHash {
    /// `capacity` is the particle capacity; the table gets `2 * capacity` buckets.
    pub fn new(spacing: f32, capacity: usize, contact_pool_capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let table_size = capacity * 2;
        Self {
            spacing,
            table_size,
            cell_starts: vec![0; table_size + 1],
            entries: vec![ParticleId(0); capacity],
            entry_cells: vec![(0, 0); capacity],
            len: 0,
            contacts: ContactSet::new(),
            contact_pool: ObjectPool::new(contact_pool_capacity),
            duplicates: 0,
        }
    }

    #[inline(always)]
    pub fn spacing(&self) -> f32 { self.spacing }

    #[inline(always)]
    pub fn table_size(&self) -> usize { self.table_size }

    /// Entries indexed by the last rebuild
    #[inline(always)]
    pub fn len(&self) -> usize { self.len }

    #[inline(always)]
    pub fn is_empty(&self) -> bool { self.len == 0 }

    #[inline(always)]
    pub fn cell_of(&self, position: Vec2) -> Cell {
        (
            (position.x / self.spacing).floor() as i32,
            (position.y / self.spacing).floor() as i32,
        )
    }

    /// `|(x * P1) ^ (y * P2)| mod table_size`, with wrapping i32 products
    #[inline(always)]
    pub fn hash_cell(&self, x: i32, y: i32) -> usize {
        let h = x.wrapping_mul(HASH_PRIME_X) ^ y.wrapping_mul(HASH_PRIME_Y);
        (h.unsigned_abs() as usize) % self.table_size
    }

    #[inline(always)]
    fn bucket_range(&self, bucket: usize) -> Range<usize> {
        self.cell_starts[bucket]..self.cell_starts[bucket + 1]
    }

    /// Ids stored in one bucket (may mix several cells)
    pub fn bucket(&self, bucket: usize) -> &[ParticleId] {
        &self.entries[self.bucket_range(bucket)]
    }

    // === REBUILD ===

    /// Re-index `positions` (index = particle id) from scratch.
    pub fn rebuild(&mut self, positions: &[Vec2]) {
        let n = positions.len();
        if n > self.entries.len() {
            self.entries.resize(n, ParticleId(0));
            self.entry_cells.resize(n, (0, 0));
        }

        // 1. count
        self.cell_starts.fill(0);
        for &p in positions {
            let (x, y) = self.cell_of(p);
            let h = self.hash_cell(x, y);
            self.cell_starts[h] += 1;
        }

        // 2. prefix sum (through the sentinel slot)
        for i in 1..=self.table_size {
            self.cell_starts[i] += self.cell_starts[i - 1];
        }

        // 3. scatter back to front so each bucket ends up ascending
        for i in (0..n).rev() {
            let cell = self.cell_of(positions[i]);
            let h = self.hash_cell(cell.0, cell.1);
            self.cell_starts[h] -= 1;
            let slot = self.cell_starts[h];
            self.entries[slot] = ParticleId(i as u32);
            self.entry_cells[slot] = cell;
        }

        self.len = n;
    }

    /// Bucket ranges of the 3x3 neighbourhood around `cell`
    #[inline(always)]
    pub fn neighbour_ranges(&self, cell: Cell) -> [Range<usize>; 9] {
        NEIGHBOUR_OFFSETS.map(|(dx, dy)| {
            let h = self.hash_cell(cell.0.wrapping_add(dx), cell.1.wrapping_add(dy));
            self.bucket_range(h)
        })
    }

    // === CONTACTS ===

    /// Collect every overlapping pair with `0 < d < combined_radius`.
    /// Contacts come from the pool; duplicates go straight back to it.
    pub fn generate_contacts(&mut self, positions: &[Vec2], combined_radius: f32) -> usize {
        // Anything left over from an aborted frame is recycled first
        self.recycle_contacts();
        self.contacts.reset(positions.len() * NEIGHBOUR_OFFSETS.len());
        self.duplicates = 0;

        let r2 = combined_radius * combined_radius;
        let n = positions.len().min(self.len);

        for a in 0..n {
            let pa = positions[a];
            for range in self.neighbour_ranges(self.cell_of(pa)) {
                for slot in range {
                    let b = self.entries[slot];
                    if b.index() == a {
                        continue;
                    }

                    let direction = positions[b.index()] - pa;
                    let distance_squared = direction.length_squared();
                    if distance_squared <= 0.0 || distance_squared >= r2 {
                        continue;
                    }

                    let distance = distance_squared.sqrt();
                    let contact = self.contact_pool.acquire().configure(
                        ParticleId(a as u32),
                        b,
                        direction / distance,
                        combined_radius - distance,
                    );
                    if let Err(duplicate) = self.contacts.insert(contact) {
                        self.contact_pool.release(duplicate);
                        self.duplicates += 1;
                    }
                }
            }
        }

        self.contacts.len()
    }

    pub fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    /// Return every live contact to the pool
    pub fn recycle_contacts(&mut self) {
        for contact in self.contacts.drain() {
            self.contact_pool.release(contact);
        }
    }

    /// Pairs rejected as duplicates during the last generation
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    pub fn contact_pool(&self) -> &ObjectPool<Contact> {
        &self.contact_pool
    }

    // === QUERY ===

    /// Ids of particles whose cell lies within `cell_radius` cells of
    /// `position`'s cell (a `(2r + 1)^2` square).
    ///
    /// The iterator is lazy and owns no cursor state in the hash; call again
    /// (or clone it before advancing) to restart.
    pub fn query(
        &self,
        position: Vec2,
        cell_radius: u32,
    ) -> impl Iterator<Item = ParticleId> + Clone + '_ {
        let (cx, cy) = self.cell_of(position);
        let r = cell_radius.min(i32::MAX as u32) as i32;
        let (min_x, max_x) = (cx.saturating_sub(r), cx.saturating_add(r));
        let (min_y, max_y) = (cy.saturating_sub(r), cy.saturating_add(r));

        (min_x..=max_x)
            .flat_map(move |x| (min_y..=max_y).map(move |y| (x, y)))
            .flat_map(move |cell| {
                let range = self.bucket_range(self.hash_cell(cell.0, cell.1));
                self.entries[range.clone()]
                    .iter()
                    .zip(&self.entry_cells[range])
                    .filter(move |&(_, c)| *c == cell)
                    .map(|(&id, _)| id)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered_positions(n: usize) -> Vec<Vec2> {
        // Deterministic spread over a 60x60 patch
        let mut state = 0x1234_5678u32;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 6000) as f32 / 100.0
        };
        (0..n).map(|_| Vec2::new(next() + 20.0, next() + 20.0)).collect()
    }

    #[test]
    fn rebuild_partitions_every_particle_exactly_once() {
        let positions = scattered_positions(200);
        let mut hash = SpatialHash::new(2.0, 256, 1024);
        hash.rebuild(&positions);

        assert_eq!(hash.cell_starts[hash.table_size()], positions.len());
        let mut seen = vec![0u32; positions.len()];
        for bucket in 0..hash.table_size() {
            let ids = hash.bucket(bucket);
            assert!(ids.windows(2).all(|w| w[0] < w[1]), "bucket not ascending");
            for id in ids {
                let (x, y) = hash.cell_of(positions[id.index()]);
                assert_eq!(hash.hash_cell(x, y), bucket);
                seen[id.index()] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn last_bucket_is_reachable() {
        let mut hash = SpatialHash::new(1.0, 4, 16);
        // Find a cell that lands in the final bucket
        let last = hash.table_size() - 1;
        let cell = (0..1000)
            .map(|x| (x, 0))
            .find(|&(x, y)| hash.hash_cell(x, y) == last)
            .expect("some cell hashes to the last bucket");
        let p = Vec2::new(cell.0 as f32 + 0.5, 0.5);
        hash.rebuild(&[p]);
        assert_eq!(hash.bucket(last), &[ParticleId(0)]);
        assert_eq!(hash.query(p, 0).collect::<Vec<_>>(), vec![ParticleId(0)]);
    }

    #[test]
    fn radius_zero_query_matches_brute_force() {
        let positions = scattered_positions(120);
        let mut hash = SpatialHash::new(3.0, 128, 512);
        hash.rebuild(&positions);

        for point in positions.iter().step_by(7) {
            let cell = hash.cell_of(*point);
            let mut expected: Vec<ParticleId> = positions
                .iter()
                .enumerate()
                .filter(|(_, p)| hash.cell_of(**p) == cell)
                .map(|(i, _)| ParticleId(i as u32))
                .collect();
            let mut got: Vec<ParticleId> = hash.query(*point, 0).collect();
            expected.sort();
            got.sort();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn wider_query_covers_the_square_and_restarts() {
        let positions = scattered_positions(150);
        let mut hash = SpatialHash::new(2.0, 150, 512);
        hash.rebuild(&positions);

        let point = positions[0];
        let (cx, cy) = hash.cell_of(point);
        let mut expected: Vec<ParticleId> = positions
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                let (x, y) = hash.cell_of(**p);
                (x - cx).abs() <= 2 && (y - cy).abs() <= 2
            })
            .map(|(i, _)| ParticleId(i as u32))
            .collect();
        expected.sort();

        let query = hash.query(point, 2);
        let mut first: Vec<_> = query.clone().collect();
        let mut second: Vec<_> = query.collect();
        first.sort();
        second.sort();
        assert_eq!(first, expected);
        assert_eq!(second, expected);
    }

    #[test]
    fn contacts_are_unique_unordered_pairs() {
        let positions = vec![
            Vec2::new(50.0, 50.0),
            Vec2::new(51.0, 50.0),
            Vec2::new(50.5, 51.0),
            Vec2::new(90.0, 90.0),
        ];
        let mut hash = SpatialHash::new(2.0, 4, 64);
        hash.rebuild(&positions);
        let count = hash.generate_contacts(&positions, 2.0);

        assert_eq!(count, 3);
        let mut keys: Vec<_> = hash.contacts().iter().map(|c| c.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 3);
        assert!(hash.duplicate_count() >= 3);

        for c in hash.contacts().iter() {
            let d = positions[c.b.index()] - positions[c.a.index()];
            assert!((c.normal.length() - 1.0).abs() < 1e-5);
            assert!(c.normal.dot(d) > 0.0);
            assert!((c.depth - (2.0 - d.length())).abs() < 1e-5);
        }
    }

    #[test]
    fn coincident_and_distant_particles_do_not_touch() {
        let positions = vec![Vec2::new(40.0, 40.0), Vec2::new(40.0, 40.0), Vec2::new(42.0, 40.0)];
        let mut hash = SpatialHash::new(2.0, 3, 16);
        hash.rebuild(&positions);
        // d == 0 is skipped, d == combined radius is not an overlap
        assert_eq!(hash.generate_contacts(&positions, 2.0), 0);
    }

    #[test]
    fn recycled_contacts_feed_the_next_frame() {
        let positions = vec![Vec2::new(50.0, 50.0), Vec2::new(51.0, 50.0)];
        let mut hash = SpatialHash::new(2.0, 2, 64);
        hash.rebuild(&positions);
        hash.generate_contacts(&positions, 2.0);
        hash.recycle_contacts();
        assert!(hash.contacts().is_empty());
        let pooled = hash.contact_pool().available();
        assert!(pooled >= 1);

        let created = hash.contact_pool().created_count();
        hash.generate_contacts(&positions, 2.0);
        assert_eq!(hash.contact_pool().created_count(), created);
    }
}
