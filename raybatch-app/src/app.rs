//! Configuration and the main run sequence.

use crate::Args;
use raybatch_train::{GeneratorConfig, RayGenerator};
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::info;

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Settings read from the optional JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        let config = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Apply command line overrides on top of the file values.
    fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(seed) = args.seed {
            self.generator.seed = Some(seed);
        }
        if let Some(batch_size) = args.batch_size {
            self.generator.batch_size = batch_size;
        }
        self
    }
}

fn init_logging(config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level)),
        )
        .with_target(false)
        .init();
}

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    }
    .with_overrides(&args);

    init_logging(&config.logging);
    info!("Loading dataset from {}", args.dataset.display());

    let mut generator = RayGenerator::from_path(&args.dataset, config.generator)?;
    let cam = generator.intrinsics();
    info!(
        "Intrinsics: {}x{} pixels, focal {:.3}",
        cam.width(),
        cam.height(),
        cam.focal()
    );

    let pool_width = generator.pool(args.split).width();
    for index in 0..args.batches {
        let batch = generator.next_batch(args.split)?;
        let min = batch.ids.iter().min();
        let max = batch.ids.iter().max();
        info!(
            "Batch {}: {} {} rays from a pool of {}, ids {:?}..={:?}, {} duplicates",
            index,
            batch.len(),
            args.split,
            pool_width,
            min,
            max,
            batch.duplicate_count()
        );
    }

    Ok(())
}
