//! Spatial - broad-phase collision detection
//!
//! - hash     - uniform-grid spatial hash rebuilt every frame
//! - contact  - unordered contact pairs and the per-frame contact set
//! - pool     - bounded free-list that recycles contacts between frames

pub mod contact;
pub mod hash;
pub mod pool;

pub use contact::{Contact, ContactSet};
pub use hash::{Cell, SpatialHash, NEIGHBOUR_OFFSETS};
pub use pool::ObjectPool;
