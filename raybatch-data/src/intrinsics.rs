//! Pinhole camera intrinsics shared by every image of a dataset.

use crate::error::DatasetError;

/// Image resolution and focal length (in pixels).
///
/// One value applies to every image in a dataset instance. Fields are private
/// so a value is always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    height: u32,
    width: u32,
    focal: f32,
}

impl CameraIntrinsics {
    /// Create intrinsics from an explicit focal length.
    pub fn new(height: u32, width: u32, focal: f32) -> Result<Self, DatasetError> {
        if height == 0 || width == 0 {
            return Err(DatasetError::InvalidIntrinsics(format!(
                "image size must be positive, got {width}x{height}"
            )));
        }
        if !focal.is_finite() || focal <= 0.0 {
            return Err(DatasetError::InvalidIntrinsics(format!(
                "focal length must be positive and finite, got {focal}"
            )));
        }
        Ok(Self {
            height,
            width,
            focal,
        })
    }

    /// Derive the focal length from a horizontal field of view in radians:
    /// `f = W / (2 * tan(fov / 2))`.
    pub fn from_fov(height: u32, width: u32, fov_x: f64) -> Result<Self, DatasetError> {
        if !fov_x.is_finite() || fov_x <= 0.0 || fov_x >= std::f64::consts::PI {
            return Err(DatasetError::InvalidIntrinsics(format!(
                "field of view must lie in (0, pi) radians, got {fov_x}"
            )));
        }
        let focal = width as f64 / (2.0 * (fov_x / 2.0).tan());
        Self::new(height, width, focal as f32)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    /// Number of pixels (and therefore rays) per image.
    pub fn pixel_count(&self) -> usize {
        self.height as usize * self.width as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focal_from_fov() {
        // 90 degrees: tan(45deg) = 1, so f = W / 2
        let cam = CameraIntrinsics::from_fov(400, 800, std::f64::consts::FRAC_PI_2).unwrap();
        assert!((cam.focal() - 400.0).abs() < 1e-3);
        assert_eq!(cam.height(), 400);
        assert_eq!(cam.width(), 800);
        assert_eq!(cam.pixel_count(), 320_000);
    }

    #[test]
    fn test_blender_fov() {
        // camera_angle_x used by the synthetic scenes
        let cam = CameraIntrinsics::from_fov(800, 800, 0.691_111_207_008_361_8).unwrap();
        assert!((cam.focal() - 1111.111).abs() < 0.01);

        let fov: f64 = 0.7;
        let expected = 800.0 / (2.0 * (fov / 2.0).tan());
        let cam = CameraIntrinsics::from_fov(800, 800, fov).unwrap();
        assert!((cam.focal() as f64 - expected).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(matches!(
            CameraIntrinsics::new(0, 10, 1.0),
            Err(DatasetError::InvalidIntrinsics(_))
        ));
        assert!(CameraIntrinsics::new(10, 0, 1.0).is_err());
    }

    #[test]
    fn test_rejects_bad_focal() {
        assert!(CameraIntrinsics::new(2, 2, 0.0).is_err());
        assert!(CameraIntrinsics::new(2, 2, -1.0).is_err());
        assert!(CameraIntrinsics::new(2, 2, f32::NAN).is_err());
        assert!(CameraIntrinsics::new(2, 2, f32::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_bad_fov() {
        assert!(CameraIntrinsics::from_fov(2, 2, 0.0).is_err());
        assert!(CameraIntrinsics::from_fov(2, 2, -0.5).is_err());
        assert!(CameraIntrinsics::from_fov(2, 2, std::f64::consts::PI).is_err());
        assert!(CameraIntrinsics::from_fov(2, 2, f64::NAN).is_err());
    }
}
