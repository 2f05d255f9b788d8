//! Raybatch
//!
//! Command line front end for the ray sampling engine: loads a split dataset,
//! builds its ray pools and draws batches so the pipeline can be inspected
//! without a training loop attached.

mod app;

use clap::Parser;
use raybatch_data::Split;
use std::path::PathBuf;

/// Raybatch - camera ray pools and random ray batches for multi-view datasets
#[derive(Parser, Debug)]
#[command(name = "raybatch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset root containing train/, test/, val/ and transforms_*.json
    #[arg(short, long)]
    dataset: PathBuf,

    /// Split to draw batches from (train, test, val)
    #[arg(short, long, default_value = "train")]
    split: Split,

    /// Rays per batch (overrides the config file)
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Seed for the sampling rng (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of batches to draw
    #[arg(short = 'n', long, default_value_t = 1)]
    batches: usize,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = app::run(args) {
        eprintln!("raybatch error: {}", e);
        std::process::exit(1);
    }
}
