//! Raybatch Training Crate
//!
//! Ray generation and mini-batch sampling for training volumetric rendering
//! models on multi-view image datasets. Datasets come from raybatch-data; this
//! crate turns them into per-split pools of world-space rays and draws random
//! batches from those pools.
//!
//! ## Modules
//!
//! - [`rays`]: pinhole ray basis and pose-transformed ray pools
//! - [`sampler`]: the sampling engine and its configuration
//!
//! ## Example
//!
//! ```ignore
//! use raybatch_train::{GeneratorConfig, RayGenerator, Split};
//!
//! let mut generator = RayGenerator::from_path("data/lego", GeneratorConfig::default())?;
//! let batch = generator.select(Split::Train, 4096)?;
//! let targets = generator.target_colors(Split::Train, &batch.ids)?;
//! ```

pub mod error;
pub mod rays;
pub mod sampler;

pub use error::RayError;
pub use rays::{PixelRef, Ray, RayBasis, RayPool, build_ray_pool};
pub use sampler::{GeneratorConfig, RayBatch, RayGenerator};

// Re-export the dataset types callers need alongside the generator
pub use raybatch_data::{CameraIntrinsics, Pose, Split};
