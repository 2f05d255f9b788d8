//! Error types for dataset loading.

use crate::split::Split;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Image decoding error in {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Missing directory: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Missing field '{field}' in {}", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),

    #[error("{split} split has {images} images but {poses} pose entries")]
    Alignment {
        split: Split,
        images: usize,
        poses: usize,
    },

    #[error("test split has {images} color images but {maps} {kind} images")]
    MapCount {
        kind: &'static str,
        images: usize,
        maps: usize,
    },

    #[error("Malformed pose: {0}")]
    MalformedPose(String),

    #[error(
        "{split} image {index} is {found_width}x{found_height}, expected {width}x{height}"
    )]
    ResolutionMismatch {
        split: Split,
        index: usize,
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },
}
