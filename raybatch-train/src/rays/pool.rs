//! World-space ray pools built from the shared basis and per-image poses.

use crate::error::RayError;
use crate::rays::RayBasis;
use glam::Vec3;
use raybatch_data::{CameraIntrinsics, Pose};
use tracing::{debug, warn};

/// A single world-space ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// `[ox, oy, oz, dx, dy, dz]`
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.origin.x,
            self.origin.y,
            self.origin.z,
            self.direction.x,
            self.direction.y,
            self.direction.z,
        ]
    }
}

/// Where a pool column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRef {
    /// Image index within the split, in load order
    pub image: usize,
    /// Row-major pixel index within the image
    pub pixel: usize,
    pub row: u32,
    pub col: u32,
}

/// Every ray of every image in one split.
///
/// Column `b * H * W + p` is pixel `p` of image `b`, so a column index alone
/// identifies the image and pixel a ray was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct RayPool {
    rays: Vec<Ray>,
    image_count: usize,
    intrinsics: CameraIntrinsics,
}

impl RayPool {
    /// Number of columns, `B * H * W`.
    pub fn width(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn pixels_per_image(&self) -> usize {
        self.intrinsics.pixel_count()
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn get(&self, id: usize) -> Option<&Ray> {
        self.rays.get(id)
    }

    /// The contiguous run of rays belonging to image `image`.
    pub fn image_rays(&self, image: usize) -> Option<&[Ray]> {
        if image >= self.image_count {
            return None;
        }
        let per_image = self.pixels_per_image();
        Some(&self.rays[image * per_image..(image + 1) * per_image])
    }

    /// Map a column index back to its image and pixel.
    pub fn locate(&self, id: usize) -> Option<PixelRef> {
        if id >= self.width() {
            return None;
        }
        let per_image = self.pixels_per_image();
        let width = self.intrinsics.width() as usize;
        let pixel = id % per_image;
        Some(PixelRef {
            image: id / per_image,
            pixel,
            row: (pixel / width) as u32,
            col: (pixel % width) as u32,
        })
    }

    /// The pool as a 6 x (B*H*W) row-major array: origin rows then direction rows.
    pub fn to_rows(&self) -> Vec<f32> {
        let width = self.width();
        let mut out = vec![0.0; 6 * width];
        for (col, ray) in self.rays.iter().enumerate() {
            for (row, value) in ray.to_array().into_iter().enumerate() {
                out[row * width + col] = value;
            }
        }
        out
    }
}

/// Build one split's ray pool.
///
/// Each image's directions are its own rotation applied to the basis, and its
/// origins are its translation repeated for every pixel. `poses` must hold
/// exactly one entry per loaded image.
#[tracing::instrument(skip_all, fields(images = image_count))]
pub fn build_ray_pool(
    basis: &RayBasis,
    intrinsics: CameraIntrinsics,
    poses: &[Pose],
    image_count: usize,
) -> Result<RayPool, RayError> {
    if basis.intrinsics() != intrinsics {
        return Err(RayError::BasisMismatch {
            basis: basis.intrinsics(),
            intrinsics,
        });
    }
    if poses.len() != image_count {
        return Err(RayError::Alignment {
            images: image_count,
            poses: poses.len(),
        });
    }

    let mut rays = Vec::with_capacity(image_count * basis.len());
    for (b, pose) in poses.iter().enumerate() {
        if !pose.is_rigid() {
            warn!(image = b, "Pose is not rigid; applying its 3x3 block as the rotation");
        }
        let rotation = pose.rotation();
        let origin = pose.translation();
        rays.extend(
            basis
                .directions()
                .iter()
                .map(|&d| Ray::new(origin, rotation * d)),
        );
    }

    debug!("Built ray pool: {} images, {} rays", image_count, rays.len());
    Ok(RayPool {
        rays,
        image_count,
        intrinsics,
    })
}
