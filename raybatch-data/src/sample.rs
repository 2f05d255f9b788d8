//! Decoded samples and the in-memory dataset they form.

use crate::error::DatasetError;
use crate::intrinsics::CameraIntrinsics;
use crate::pose::Pose;
use crate::split::{PerSplit, Split};
use image::Rgb32FImage;

/// A single posed image from one split.
#[derive(Debug, Clone)]
pub struct Sample {
    /// RGB image with channels normalized to [0, 1]
    pub image: Rgb32FImage,
    /// Camera-to-world pose
    pub pose: Pose,
    /// The frame record this sample was described by
    pub metadata: serde_json::Value,
    /// Aligned depth image (test split only)
    pub depth: Option<Rgb32FImage>,
    /// Aligned normal image (test split only)
    pub normal: Option<Rgb32FImage>,
}

impl Sample {
    /// Create a color-only sample
    pub fn new(image: Rgb32FImage, pose: Pose, metadata: serde_json::Value) -> Self {
        Self {
            image,
            pose,
            metadata,
            depth: None,
            normal: None,
        }
    }

    /// Create a sample carrying depth and normal images
    pub fn with_maps(
        image: Rgb32FImage,
        depth: Rgb32FImage,
        normal: Rgb32FImage,
        pose: Pose,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            image,
            pose,
            metadata,
            depth: Some(depth),
            normal: Some(normal),
        }
    }

    /// Get image dimensions (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Color of the pixel at `pixel`, using the row-major pixel index.
    pub fn color_at(&self, pixel: usize) -> [f32; 3] {
        let offset = pixel * 3;
        let raw = self.image.as_raw();
        [raw[offset], raw[offset + 1], raw[offset + 2]]
    }
}

/// Samples for every split plus the intrinsics they share.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: PerSplit<Vec<Sample>>,
    intrinsics: CameraIntrinsics,
}

impl Dataset {
    /// Bundle samples with their intrinsics.
    ///
    /// Fails unless every color, depth and normal image has the intrinsics' resolution.
    pub fn new(
        samples: PerSplit<Vec<Sample>>,
        intrinsics: CameraIntrinsics,
    ) -> Result<Self, DatasetError> {
        let (width, height) = (intrinsics.width(), intrinsics.height());
        for (split, split_samples) in samples.iter() {
            for (index, sample) in split_samples.iter().enumerate() {
                let images = [Some(&sample.image), sample.depth.as_ref(), sample.normal.as_ref()];
                for image in images.into_iter().flatten() {
                    let (found_width, found_height) = image.dimensions();
                    if (found_width, found_height) != (width, height) {
                        return Err(DatasetError::ResolutionMismatch {
                            split,
                            index,
                            width,
                            height,
                            found_width,
                            found_height,
                        });
                    }
                }
            }
        }
        Ok(Self {
            samples,
            intrinsics,
        })
    }

    pub fn samples(&self, split: Split) -> &[Sample] {
        &self.samples[split]
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.intrinsics
    }

    /// Poses of one split, in load order.
    pub fn poses(&self, split: Split) -> Vec<Pose> {
        self.samples[split].iter().map(|s| s.pose).collect()
    }

    /// Split the dataset into its samples and intrinsics.
    pub fn into_parts(self) -> (PerSplit<Vec<Sample>>, CameraIntrinsics) {
        (self.samples, self.intrinsics)
    }
}

/// Anything that can produce a fully loaded dataset.
pub trait DatasetSource {
    fn load(&self) -> Result<Dataset, DatasetError>;
}
