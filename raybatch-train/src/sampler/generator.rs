//! The ray sampling engine.

use crate::error::RayError;
use crate::rays::{Ray, RayBasis, RayPool, build_ray_pool};
use crate::sampler::{GeneratorConfig, RayBatch};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raybatch_data::{
    CameraIntrinsics, Dataset, DatasetSource, DirectoryDataset, PerSplit, Sample, Split,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Owns the loaded samples and one ray pool per split, and draws random
/// batches of rays from them.
///
/// Pools are built once at construction and never change. The only state
/// touched by [`select`](Self::select) is the generator's own rng, which is
/// why it takes `&mut self`. Share a generator across threads behind a
/// `Mutex`, or use [`select_with`](Self::select_with) with a per-thread rng.
#[derive(Debug)]
pub struct RayGenerator {
    samples: PerSplit<Vec<Sample>>,
    intrinsics: CameraIntrinsics,
    basis: Arc<RayBasis>,
    pools: PerSplit<RayPool>,
    rng: StdRng,
    batch_size: usize,
}

impl RayGenerator {
    /// Load the dataset at `path` and build its ray pools.
    pub fn from_path<P: AsRef<Path>>(path: P, config: GeneratorConfig) -> Result<Self, RayError> {
        Self::from_source(&DirectoryDataset::new(path), config)
    }

    pub fn from_source<S: DatasetSource + ?Sized>(
        source: &S,
        config: GeneratorConfig,
    ) -> Result<Self, RayError> {
        Self::from_dataset(source.load()?, config)
    }

    #[tracing::instrument(skip_all)]
    pub fn from_dataset(dataset: Dataset, config: GeneratorConfig) -> Result<Self, RayError> {
        let intrinsics = dataset.intrinsics();
        let basis = Arc::new(RayBasis::new(intrinsics));

        let pools = PerSplit::try_from_fn(|split| {
            build_ray_pool(
                &basis,
                intrinsics,
                &dataset.poses(split),
                dataset.samples(split).len(),
            )
        })?;
        let (samples, _) = dataset.into_parts();

        for (split, pool) in pools.iter() {
            info!(
                "{} pool: {} images, {} rays",
                split,
                pool.image_count(),
                pool.width()
            );
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            samples,
            intrinsics,
            basis,
            pools,
            rng,
            batch_size: config.batch_size,
        })
    }

    /// Draw `n` rays from `split`, uniformly and with replacement.
    ///
    /// `n` may exceed the pool width; ids can then repeat.
    pub fn select(&mut self, split: Split, n: usize) -> Result<RayBatch, RayError> {
        sample_pool(&self.pools[split], split, &mut self.rng, n)
    }

    /// [`select`](Self::select) with the split given by name.
    pub fn select_named(&mut self, split: &str, n: usize) -> Result<RayBatch, RayError> {
        let split: Split = split.parse()?;
        self.select(split, n)
    }

    /// Draw a batch of the configured size.
    pub fn next_batch(&mut self, split: Split) -> Result<RayBatch, RayError> {
        self.select(split, self.batch_size)
    }

    /// Draw `n` rays from `split` using a caller-owned rng.
    pub fn select_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        split: Split,
        n: usize,
    ) -> Result<RayBatch, RayError> {
        sample_pool(&self.pools[split], split, rng, n)
    }

    /// Ground-truth colors for the given pool columns of `split`.
    pub fn target_colors(&self, split: Split, ids: &[usize]) -> Result<Vec<[f32; 3]>, RayError> {
        let pool = &self.pools[split];
        let samples = &self.samples[split];
        ids.iter()
            .map(|&id| {
                let pixel = pool.locate(id).ok_or(RayError::IdOutOfRange {
                    split,
                    id,
                    width: pool.width(),
                })?;
                Ok(samples[pixel.image].color_at(pixel.pixel))
            })
            .collect()
    }

    /// All rays of one image, in row-major pixel order.
    pub fn image_rays(&self, split: Split, image: usize) -> Option<&[Ray]> {
        self.pools[split].image_rays(image)
    }

    pub fn samples(&self, split: Split) -> &[Sample] {
        &self.samples[split]
    }

    pub fn pool(&self, split: Split) -> &RayPool {
        &self.pools[split]
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.intrinsics
    }

    pub fn basis(&self) -> Arc<RayBasis> {
        Arc::clone(&self.basis)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

fn sample_pool<R: Rng + ?Sized>(
    pool: &RayPool,
    split: Split,
    rng: &mut R,
    n: usize,
) -> Result<RayBatch, RayError> {
    if n == 0 {
        return Ok(RayBatch::default());
    }
    if pool.is_empty() {
        return Err(RayError::EmptyPool(split));
    }

    let columns = Uniform::new(0, pool.width());
    let ids: Vec<usize> = (0..n).map(|_| columns.sample(rng)).collect();
    let rays = ids.iter().map(|&id| pool.rays()[id].to_array()).collect();
    Ok(RayBatch { rays, ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Vec3};
    use image::{Rgb, Rgb32FImage};
    use raybatch_data::{CameraIntrinsics, Pose};

    fn sample(width: u32, height: u32, pose: Pose) -> Sample {
        Sample::new(
            Rgb32FImage::from_pixel(width, height, Rgb([0.5, 0.5, 0.5])),
            pose,
            serde_json::Value::Null,
        )
    }

    fn translated(x: f32) -> Pose {
        Pose::new(Mat3::IDENTITY, Vec3::new(x, 0.0, 0.0))
    }

    /// 2 train, 1 test, 0 val images of 2x2 pixels.
    fn generator(seed: u64) -> RayGenerator {
        let intrinsics = CameraIntrinsics::new(2, 2, 1.0).unwrap();
        let samples = PerSplit::new(
            vec![sample(2, 2, translated(0.0)), sample(2, 2, translated(1.0))],
            vec![sample(2, 2, Pose::identity())],
            Vec::new(),
        );
        let dataset = Dataset::new(samples, intrinsics).unwrap();
        RayGenerator::from_dataset(dataset, GeneratorConfig::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn test_select_shape_and_range() {
        let mut generator = generator(1);
        let batch = generator.select(Split::Train, 100).unwrap();
        assert_eq!(batch.rays.len(), 100);
        assert_eq!(batch.ids.len(), 100);
        assert!(batch.ids.iter().all(|&id| id < 8));
    }

    #[test]
    fn test_rows_follow_ids() {
        let mut generator = generator(2);
        let batch = generator.select(Split::Train, 32).unwrap();
        let pool = generator.pool(Split::Train);
        for (row, &id) in batch.rays.iter().zip(&batch.ids) {
            assert_eq!(*row, pool.rays()[id].to_array());
            // image 0 sits at x = 0, image 1 at x = 1
            assert_eq!(row[0], (id / 4) as f32);
        }
    }

    #[test]
    fn test_select_with_replacement_beyond_width() {
        let mut generator = generator(3);
        let batch = generator.select(Split::Test, 50).unwrap();
        assert_eq!(batch.len(), 50);
        assert!(batch.duplicate_count() > 0);
        assert!(batch.ids.iter().all(|&id| id < 4));
    }

    #[test]
    fn test_zero_rays() {
        let mut generator = generator(4);
        assert!(generator.select(Split::Train, 0).unwrap().is_empty());
        // empty pools only fail once rays are requested
        assert!(generator.select(Split::Val, 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_pool() {
        let mut generator = generator(5);
        assert!(matches!(
            generator.select(Split::Val, 1),
            Err(RayError::EmptyPool(Split::Val))
        ));
    }

    #[test]
    fn test_select_named() {
        let mut generator = generator(6);
        assert_eq!(generator.select_named("train", 3).unwrap().len(), 3);
        assert!(matches!(
            generator.select_named("holdout", 3),
            Err(RayError::InvalidSplit(_))
        ));
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let mut a = generator(42);
        let mut b = generator(42);
        assert_eq!(
            a.select(Split::Train, 64).unwrap(),
            b.select(Split::Train, 64).unwrap()
        );
        // the rng advances between calls
        let first = a.select(Split::Train, 64).unwrap();
        let second = a.select(Split::Train, 64).unwrap();
        assert_ne!(first.ids, second.ids);
    }

    #[test]
    fn test_select_with_external_rng() {
        let generator = generator(7);
        let mut rng = StdRng::seed_from_u64(9);
        let mut again = StdRng::seed_from_u64(9);
        let batch = generator.select_with(&mut rng, Split::Train, 16).unwrap();
        assert_eq!(batch, generator.select_with(&mut again, Split::Train, 16).unwrap());
    }

    #[test]
    fn test_next_batch_uses_configured_size() {
        let intrinsics = CameraIntrinsics::new(2, 2, 1.0).unwrap();
        let samples = PerSplit::new(vec![sample(2, 2, Pose::identity())], Vec::new(), Vec::new());
        let dataset = Dataset::new(samples, intrinsics).unwrap();
        let config = GeneratorConfig::default().with_seed(0).with_batch_size(10);
        let mut generator = RayGenerator::from_dataset(dataset, config).unwrap();
        assert_eq!(generator.next_batch(Split::Train).unwrap().len(), 10);
    }

    #[test]
    fn test_target_colors() {
        let intrinsics = CameraIntrinsics::new(2, 2, 1.0).unwrap();
        let mut image = Rgb32FImage::from_pixel(2, 2, Rgb([0.0, 0.0, 0.0]));
        image.put_pixel(1, 0, Rgb([0.25, 0.5, 0.75]));
        let samples = PerSplit::new(
            vec![
                sample(2, 2, Pose::identity()),
                Sample::new(image, Pose::identity(), serde_json::Value::Null),
            ],
            Vec::new(),
            Vec::new(),
        );
        let dataset = Dataset::new(samples, intrinsics).unwrap();
        let generator = RayGenerator::from_dataset(dataset, GeneratorConfig::default()).unwrap();

        // column 5 is image 1, pixel 1 (row 0, col 1)
        let colors = generator.target_colors(Split::Train, &[5, 0]).unwrap();
        assert_eq!(colors, vec![[0.25, 0.5, 0.75], [0.5, 0.5, 0.5]]);
        assert!(matches!(
            generator.target_colors(Split::Train, &[8]),
            Err(RayError::IdOutOfRange { id: 8, width: 8, .. })
        ));
    }

    #[test]
    fn test_image_rays_and_accessors() {
        let generator = generator(8);
        let rays = generator.image_rays(Split::Train, 1).unwrap();
        assert_eq!(rays.len(), 4);
        assert!(rays.iter().all(|r| r.origin == Vec3::new(1.0, 0.0, 0.0)));
        assert!(generator.image_rays(Split::Train, 2).is_none());
        assert_eq!(generator.samples(Split::Train).len(), 2);
        assert_eq!(generator.basis().len(), 4);
        assert_eq!(generator.intrinsics().focal(), 1.0);
        assert_eq!(generator.batch_size(), crate::sampler::DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_uniformity_chi_squared() {
        let mut generator = generator(2024);
        let width = generator.pool(Split::Train).width();
        let draws = 80_000;
        let mut counts = vec![0usize; width];
        for id in generator.select(Split::Train, draws).unwrap().ids {
            counts[id] += 1;
        }
        let expected = draws as f64 / width as f64;
        let chi2: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        // 7 degrees of freedom, p = 0.001
        assert!(chi2 < 24.32, "chi-squared statistic {chi2} rejects uniformity");
    }
}
