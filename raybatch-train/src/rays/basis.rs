//! Camera-space ray directions for a pinhole camera.

use glam::Vec3;
use raybatch_data::CameraIntrinsics;

/// Per-pixel ray directions in camera space, one per pixel in row-major order.
///
/// The camera looks down -Z with +Y up. Directions are not normalized: the
/// z component is always -1, so their length depends on the pixel offset.
#[derive(Debug, Clone, PartialEq)]
pub struct RayBasis {
    intrinsics: CameraIntrinsics,
    directions: Vec<Vec3>,
}

impl RayBasis {
    /// Compute the basis for `intrinsics`.
    pub fn new(intrinsics: CameraIntrinsics) -> Self {
        let height = intrinsics.height();
        let width = intrinsics.width();
        let focal = intrinsics.focal();
        let half_w = width as f32 / 2.0;
        let half_h = height as f32 / 2.0;

        let mut directions = Vec::with_capacity(intrinsics.pixel_count());
        for i in 0..height {
            for j in 0..width {
                directions.push(Vec3::new(
                    (j as f32 - half_w) / focal,
                    -(i as f32 - half_h) / focal,
                    -1.0,
                ));
            }
        }

        Self {
            intrinsics,
            directions,
        }
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.intrinsics
    }

    /// Number of pixels (columns of the 3 x H*W basis).
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Direction for the row-major pixel index `pixel`.
    pub fn direction(&self, pixel: usize) -> Option<Vec3> {
        self.directions.get(pixel).copied()
    }

    /// The basis as a 3 x (H*W) row-major array.
    pub fn to_rows(&self) -> [Vec<f32>; 3] {
        let mut rows = [
            Vec::with_capacity(self.len()),
            Vec::with_capacity(self.len()),
            Vec::with_capacity(self.len()),
        ];
        for d in &self.directions {
            rows[0].push(d.x);
            rows[1].push(d.y);
            rows[2].push(d.z);
        }
        rows
    }
}
