// === BOUNDED OBJECT POOL ===
// Free-list of reusable values so the per-frame contact churn doesn't
// allocate. Holds at most `max_size` idle values; extras are dropped.

/// Bounded free-list over a single element type
pub struct ObjectPool<T> {
    free: Vec<T>,
    max_size: usize,
    created: usize,
    dropped: usize,
}

impl<T: Default> ObjectPool<T> {
    pub fn new(max_size: usize) -> Self {
        Self {
            free: Vec::new(),
            max_size,
            created: 0,
            dropped: 0,
        }
    }

    /// Pop an idle value, or build a fresh one when the pool is empty
    #[inline(always)]
    pub fn acquire(&mut self) -> T {
        match self.free.pop() {
            Some(value) => value,
            None => {
                self.created += 1;
                T::default()
            }
        }
    }

    /// Hand a value back. Dropped when the pool is already at `max_size`.
    #[inline(always)]
    pub fn release(&mut self, value: T) {
        if self.free.len() < self.max_size {
            self.free.push(value);
        } else {
            self.dropped += 1;
        }
    }

    /// Idle values ready for `acquire`
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    #[inline(always)]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Values built because the pool was empty (lifetime total)
    #[inline(always)]
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Values discarded by `release` because the pool was full (lifetime total)
    #[inline(always)]
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }
}
