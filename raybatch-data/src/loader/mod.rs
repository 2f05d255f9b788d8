//! Directory-backed dataset loading.
//!
//! Expected layout:
//!
//! ```text
//! root/
//!   train/                  color images
//!   val/                    color images
//!   test/                   r_<n>.png plus r_<n>_depth* and r_<n>_normal*
//!   transforms_train.json
//!   transforms_test.json
//!   transforms_val.json
//! ```
//!
//! Images in each directory are sorted in natural order and paired with the
//! transform frames by index.

mod natural;
mod transforms;

pub use natural::natural_cmp;
pub use transforms::{FrameEntry, Transforms, read_transforms};

use crate::error::DatasetError;
use crate::intrinsics::CameraIntrinsics;
use crate::sample::{Dataset, DatasetSource, Sample};
use crate::split::{PerSplit, Split};
use image::Rgb32FImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A dataset stored on disk in the split directory layout.
#[derive(Debug, Clone)]
pub struct DirectoryDataset {
    root: PathBuf,
}

impl DirectoryDataset {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn transforms_path(&self, split: Split) -> PathBuf {
        self.root.join(format!("transforms_{split}.json"))
    }

    fn split_dir(&self, split: Split) -> Result<PathBuf, DatasetError> {
        let dir = self.root.join(split.as_str());
        if !dir.is_dir() {
            return Err(DatasetError::MissingDirectory(dir));
        }
        Ok(dir)
    }

    /// Load one split's samples, checking image/frame alignment.
    #[tracing::instrument(skip(self, transforms), fields(root = %self.root.display()))]
    fn load_split(&self, split: Split, transforms: Transforms) -> Result<Vec<Sample>, DatasetError> {
        let dir = self.split_dir(split)?;

        let color_paths = match split {
            Split::Test => sorted_files(&dir, is_test_color)?,
            Split::Train | Split::Val => sorted_files(&dir, |_| true)?,
        };
        check_alignment(split, color_paths.len(), transforms.frames.len())?;

        let maps = if split == Split::Test {
            let depth_paths = sorted_files(&dir, |name| is_test_map(name, "_depth"))?;
            let normal_paths = sorted_files(&dir, |name| is_test_map(name, "_normal"))?;
            check_map_count("depth", color_paths.len(), depth_paths.len())?;
            check_map_count("normal", color_paths.len(), normal_paths.len())?;
            Some((depth_paths, normal_paths))
        } else {
            None
        };

        let mut samples = Vec::with_capacity(color_paths.len());
        for (i, (path, frame)) in color_paths.iter().zip(transforms.frames).enumerate() {
            let image = decode_image(path)?;
            let sample = match &maps {
                Some((depth_paths, normal_paths)) => Sample::with_maps(
                    image,
                    decode_image(&depth_paths[i])?,
                    decode_image(&normal_paths[i])?,
                    frame.pose,
                    frame.metadata,
                ),
                None => Sample::new(image, frame.pose, frame.metadata),
            };
            samples.push(sample);
        }

        debug!("Loaded {} {} samples", samples.len(), split);
        Ok(samples)
    }
}

impl DatasetSource for DirectoryDataset {
    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    fn load(&self) -> Result<Dataset, DatasetError> {
        if !self.root.is_dir() {
            return Err(DatasetError::MissingDirectory(self.root.clone()));
        }

        let transforms = PerSplit::try_from_fn(|split| read_transforms(&self.transforms_path(split)))?;
        let fov_x = transforms.train.fov_x()?;

        let PerSplit { train, test, val } = transforms;
        let samples = PerSplit::new(
            self.load_split(Split::Train, train)?,
            self.load_split(Split::Test, test)?,
            self.load_split(Split::Val, val)?,
        );

        let (width, height) = reference_dimensions(&samples).ok_or_else(|| {
            DatasetError::InvalidIntrinsics("dataset contains no images".to_string())
        })?;
        let intrinsics = CameraIntrinsics::from_fov(height, width, fov_x)?;

        info!(
            "Dataset loaded: {} train, {} test, {} val images at {}x{} (focal {:.3})",
            samples.train.len(),
            samples.test.len(),
            samples.val.len(),
            width,
            height,
            intrinsics.focal()
        );

        Dataset::new(samples, intrinsics)
    }
}

/// Resolution used for the shared intrinsics: the first train image, falling
/// back to the first image of any split.
fn reference_dimensions(samples: &PerSplit<Vec<Sample>>) -> Option<(u32, u32)> {
    samples
        .iter()
        .find_map(|(_, split_samples)| split_samples.first())
        .map(Sample::dimensions)
}

fn check_alignment(split: Split, images: usize, poses: usize) -> Result<(), DatasetError> {
    if images != poses {
        return Err(DatasetError::Alignment {
            split,
            images,
            poses,
        });
    }
    Ok(())
}

fn check_map_count(kind: &'static str, images: usize, maps: usize) -> Result<(), DatasetError> {
    if images != maps {
        return Err(DatasetError::MapCount { kind, images, maps });
    }
    Ok(())
}

/// `r_<digits>.png`
fn is_test_color(name: &str) -> bool {
    name.strip_prefix("r_")
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// `r_<anything><marker><anything>`
fn is_test_map(name: &str, marker: &str) -> bool {
    name.strip_prefix("r_").is_some_and(|rest| rest.contains(marker))
}

/// Files in `dir` whose names pass `keep`, in natural order. Symlinks are
/// followed and hidden files are skipped.
fn sorted_files(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, DatasetError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if keep(name) {
            files.push((name.to_string(), path.clone()));
        }
    }
    files.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Decode an image to RGB with channels in [0, 1]. Alpha is dropped.
fn decode_image(path: &Path) -> Result<Rgb32FImage, DatasetError> {
    let image = image::open(path).map_err(|source| DatasetError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb32f())
}
