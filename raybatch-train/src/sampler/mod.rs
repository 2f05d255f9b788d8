//! Random ray batch sampling
//!
//! [`RayGenerator`] builds every split's pool once and then serves
//! mini-batches drawn uniformly with replacement.

pub mod batch;
pub mod config;
pub mod generator;

pub use batch::RayBatch;
pub use config::{DEFAULT_BATCH_SIZE, GeneratorConfig};
pub use generator::RayGenerator;
