//! Sampled ray batches.

use glam::Vec3;
use std::collections::HashSet;

/// Rays drawn from one split's pool, with the pool columns they came from.
///
/// `rays[k]` is `[ox, oy, oz, dx, dy, dz]` of pool column `ids[k]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayBatch {
    pub rays: Vec<[f32; 6]>,
    pub ids: Vec<usize>,
}

impl RayBatch {
    /// Number of rays in the batch.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn origin(&self, k: usize) -> Option<Vec3> {
        self.rays.get(k).map(|r| Vec3::new(r[0], r[1], r[2]))
    }

    pub fn direction(&self, k: usize) -> Option<Vec3> {
        self.rays.get(k).map(|r| Vec3::new(r[3], r[4], r[5]))
    }

    /// Rays flattened row by row into an N x 6 array.
    pub fn as_flat(&self) -> &[f32] {
        self.rays.as_flattened()
    }

    /// How many ids repeat an earlier id in the batch.
    pub fn duplicate_count(&self) -> usize {
        let unique: HashSet<usize> = self.ids.iter().copied().collect();
        self.ids.len() - unique.len()
    }
}
