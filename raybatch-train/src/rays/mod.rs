//! Ray generation
//!
//! A [`RayBasis`] is computed once from the shared intrinsics. Each split's
//! poses then turn it into a flat [`RayPool`] of world-space rays.

pub mod basis;
pub mod pool;

pub use basis::RayBasis;
pub use pool::{PixelRef, Ray, RayPool, build_ray_pool};
