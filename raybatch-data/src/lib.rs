//! Raybatch Data Crate
//!
//! Loading utilities for multi-view image datasets laid out as train/test/val
//! splits with per-split camera transform descriptions. This crate knows about
//! files, JSON and image decoding; ray generation lives in raybatch-train.
//!
//! ## Modules
//!
//! - [`split`]: split names and per-split containers
//! - [`intrinsics`]: shared pinhole intrinsics derived from the field of view
//! - [`pose`]: camera-to-world transforms reduced to 3x4
//! - [`sample`]: decoded samples and the in-memory dataset
//! - [`loader`]: directory-backed dataset source

pub mod error;
pub mod intrinsics;
pub mod loader;
pub mod pose;
pub mod sample;
pub mod split;

pub use error::DatasetError;
pub use intrinsics::CameraIntrinsics;
pub use loader::{DirectoryDataset, natural_cmp};
pub use pose::Pose;
pub use sample::{Dataset, DatasetSource, Sample};
pub use split::{ParseSplitError, PerSplit, Split};
