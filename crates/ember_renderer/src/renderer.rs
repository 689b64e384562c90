//! Render driver: per-pixel Monte Carlo sampling and the threaded
//! orchestration around it.
//!
//! The stochastic path partitions the image into row stripes, hands each
//! worker thread a disjoint mutable slice of the framebuffer, and joins
//! everything before post-processing. The direct path is a plain
//! single-threaded sweep kept for interface compatibility.

use crate::partition::{partition_rows, RowRange};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::{Camera, Scene};
use ember_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::num::NonZeroUsize;
use std::thread;
use thiserror::Error;

/// Errors surfaced by the render entry points.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("samples per pixel must be positive")]
    InvalidSampleCount,

    #[error("field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Render configuration.
///
/// The defaults match the classic Cornell-box framing: a 784x784 image at
/// 40 degrees vertical field of view, seen from (278, 273, -800).
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Fixed eye position
    pub eye: Vec3,
    /// Monte Carlo samples per pixel
    pub samples_per_pixel: u32,
    /// Base seed; worker i draws from a generator seeded `seed + i`
    pub seed: u64,
    /// Worker count override; defaults to available hardware concurrency
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 784,
            height: 784,
            fov: 40.0,
            eye: Vec3::new(278.0, 273.0, -800.0),
            samples_per_pixel: 16,
            seed: 0,
            threads: None,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set the eye position.
    pub fn with_eye(mut self, eye: Vec3) -> Self {
        self.eye = eye;
        self
    }

    /// Set the samples-per-pixel count.
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    /// Set the base RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Reject configurations that make the camera math undefined.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSampleCount);
        }
        if !self.fov.is_finite() || self.fov <= 0.0 || self.fov >= 180.0 {
            return Err(RenderError::InvalidFov(self.fov));
        }
        Ok(())
    }

    fn worker_count(&self) -> usize {
        self.threads
            .unwrap_or_else(|| {
                thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1)
            })
            .max(1)
    }
}

/// Accumulated radiance for one frame, row-major.
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl Framebuffer {
    /// Create a zero-initialized framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; (width as usize) * (height as usize)],
        }
    }

    /// Get the pixel at (col, row).
    pub fn get(&self, col: u32, row: u32) -> Vec3 {
        self.pixels[(row * self.width + col) as usize]
    }
}

/// Estimate one pixel's radiance as the mean of `spp` jittered samples.
///
/// Each sample divides by `spp` as it accumulates, so the result is the
/// sample mean without a separate normalization pass. Variance reduction is
/// entirely the scene's business; no sample is rejected or reweighted.
pub fn sample_pixel<S: Scene>(
    scene: &S,
    camera: &Camera,
    col: u32,
    row: u32,
    spp: u32,
    rng: &mut StdRng,
) -> Vec3 {
    let inv_spp = 1.0 / spp as f32;
    let mut radiance = Vec3::ZERO;
    for _ in 0..spp {
        let jx: f32 = rng.gen();
        let jy: f32 = rng.gen();
        let ray = camera.primary_ray(col, row, jx, jy);
        radiance += scene.cast_ray(&ray, 0) * inv_spp;
    }
    radiance
}

/// Render one worker's row stripe into its framebuffer slice.
///
/// `rows` covers exactly the stripe's pixels; the slice borrow is what
/// keeps workers from ever aliasing each other's rows.
fn render_stripe<S: Scene>(
    scene: &S,
    camera: &Camera,
    range: RowRange,
    rows: &mut [Vec3],
    spp: u32,
    rng: &mut StdRng,
    progress: &ProgressTracker,
) {
    let width = camera.image_width;
    for row in range.rows() {
        let base = ((row - range.y0) * width) as usize;
        for col in 0..width {
            rows[base + col as usize] = sample_pixel(scene, camera, col, row, spp, rng);
        }
        progress.row_complete();
    }
}

/// Render the scene with Monte Carlo sampling across all available cores.
///
/// Spawns one scoped worker per non-empty row range, each with its own
/// seeded generator, joins them all, then issues the final progress report.
/// The only observable side effect before returning is progress reporting.
pub fn render_stochastic<S: Scene>(
    scene: &S,
    config: &RenderConfig,
    progress: &dyn ProgressSink,
) -> Result<Framebuffer, RenderError> {
    config.validate()?;

    let camera = Camera::new(config.width, config.height, config.fov, config.eye);
    let mut frame = Framebuffer::new(config.width, config.height);
    let ranges = partition_rows(config.height, config.worker_count());
    let tracker = ProgressTracker::new(config.height, progress);
    let spp = config.samples_per_pixel;

    log::info!(
        "rendering {}x{} @ {} spp on {} worker(s)",
        config.width,
        config.height,
        spp,
        ranges.len()
    );
    let start = std::time::Instant::now();

    thread::scope(|scope| {
        let tracker = &tracker;
        let mut rest = frame.pixels.as_mut_slice();
        for (worker, &range) in ranges.iter().enumerate() {
            let (stripe, tail) = rest.split_at_mut((range.len() * config.width) as usize);
            rest = tail;
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(worker as u64));
            log::debug!("worker {worker}: rows {}..{}", range.y0, range.y1);
            scope.spawn(move || {
                render_stripe(scene, &camera, range, stripe, spp, &mut rng, tracker);
            });
        }
    });

    tracker.finish();
    log::info!("render finished in {:.2?}", start.elapsed());
    Ok(frame)
}

/// Render the scene with one centered ray per pixel, single-threaded.
///
/// The deterministic counterpart to [`render_stochastic`]: no jitter, no
/// averaging, no worker threads. Any reflection, refraction or shadow
/// recursion happens inside the scene's evaluator.
pub fn render_direct<S: Scene>(
    scene: &S,
    config: &RenderConfig,
    progress: &dyn ProgressSink,
) -> Result<Framebuffer, RenderError> {
    config.validate()?;

    let camera = Camera::new(config.width, config.height, config.fov, config.eye);
    let mut frame = Framebuffer::new(config.width, config.height);
    let tracker = ProgressTracker::new(config.height, progress);

    log::info!("direct render {}x{}", config.width, config.height);
    for row in 0..config.height {
        for col in 0..config.width {
            let ray = camera.center_ray(col, row);
            frame.pixels[(row * config.width + col) as usize] = scene.cast_ray(&ray, 0);
        }
        tracker.row_complete();
    }

    tracker.finish();
    Ok(frame)
}

/// Run a stochastic render and write the tone-mapped PPM to `path`.
///
/// The full pipeline behind one call: sample, join, gamma 0.6 tone map,
/// encode, write. Blocks until the file is on disk.
pub fn render_stochastic_to_file<S: Scene>(
    scene: &S,
    config: &RenderConfig,
    progress: &dyn ProgressSink,
    path: &std::path::Path,
) -> Result<(), RenderError> {
    let frame = render_stochastic(scene, config, progress)?;
    crate::ppm::save(&frame, crate::ppm::STOCHASTIC_GAMMA, path)
}

/// Run a direct render and write the linear (no gamma) PPM to `path`.
pub fn render_direct_to_file<S: Scene>(
    scene: &S,
    config: &RenderConfig,
    progress: &dyn ProgressSink,
    path: &std::path::Path,
) -> Result<(), RenderError> {
    let frame = render_direct(scene, config, progress)?;
    crate::ppm::save(&frame, crate::ppm::LINEAR_GAMMA, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::tests::ConstantScene;
    use std::sync::Mutex;

    /// Sink that records every reported fraction.
    #[derive(Default)]
    struct RecordingSink {
        fractions: Mutex<Vec<f32>>,
    }

    impl ProgressSink for RecordingSink {
        fn report(&self, fraction: f32) {
            self.fractions.lock().unwrap().push(fraction);
        }
    }

    fn small_config() -> RenderConfig {
        RenderConfig::default()
            .with_resolution(8, 6)
            .with_fov(90.0)
            .with_eye(Vec3::ZERO)
            .with_samples(4)
            .with_seed(7)
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let sink = crate::NullProgress;
        let scene = ConstantScene(Vec3::ONE);

        let zero_width = small_config().with_resolution(0, 6);
        assert!(matches!(
            render_stochastic(&scene, &zero_width, &sink),
            Err(RenderError::InvalidDimensions { .. })
        ));

        let zero_spp = small_config().with_samples(0);
        assert!(matches!(
            render_stochastic(&scene, &zero_spp, &sink),
            Err(RenderError::InvalidSampleCount)
        ));

        let bad_fov = small_config().with_fov(-10.0);
        assert!(matches!(
            render_direct(&scene, &bad_fov, &sink),
            Err(RenderError::InvalidFov(_))
        ));
    }

    #[test]
    fn test_constant_scene_averages_to_constant() {
        // The Monte Carlo mean of a constant is that constant, whatever
        // jitter was drawn: spp samples of C/spp sum back to C.
        let radiance = Vec3::new(0.25, 0.5, 2.0);
        let scene = ConstantScene(radiance);
        let config = small_config().with_samples(2);

        let frame = render_stochastic(&scene, &config, &crate::NullProgress).unwrap();
        for &pixel in &frame.pixels {
            assert!((pixel - radiance).length() < 1e-5);
        }
    }

    #[test]
    fn test_single_thread_seeded_render_is_reproducible() {
        struct RayScene;
        impl Scene for RayScene {
            fn cast_ray(&self, ray: &ember_math::Ray, _depth: u32) -> Vec3 {
                // Depends on the jittered direction, so identical output
                // requires identical RNG draws.
                ray.direction().abs()
            }
        }

        let config = small_config().with_threads(1).with_seed(42);
        let a = render_stochastic(&RayScene, &config, &crate::NullProgress).unwrap();
        let b = render_stochastic(&RayScene, &config, &crate::NullProgress).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_progress_reports_once_per_row_plus_final() {
        let sink = RecordingSink::default();
        let config = small_config().with_threads(3);
        render_stochastic(&ConstantScene(Vec3::ONE), &config, &sink).unwrap();

        let fractions = sink.fractions.lock().unwrap();
        // height row reports, then the unconditional 1.0.
        assert_eq!(fractions.len(), config.height as usize + 1);
        assert_eq!(*fractions.last().unwrap(), 1.0);
    }

    #[test]
    fn test_direct_progress_reports_once_per_row_plus_final() {
        let sink = RecordingSink::default();
        let config = small_config();
        render_direct(&ConstantScene(Vec3::ONE), &config, &sink).unwrap();

        let fractions = sink.fractions.lock().unwrap();
        assert_eq!(fractions.len(), config.height as usize + 1);
        assert_eq!(*fractions.last().unwrap(), 1.0);
    }

    #[test]
    fn test_more_workers_than_rows() {
        // height 3 with 5 requested workers: the three usable stripes
        // still cover the frame and progress still counts 3 rows.
        let sink = RecordingSink::default();
        let config = small_config().with_resolution(4, 3).with_threads(5);
        let frame = render_stochastic(&ConstantScene(Vec3::ONE), &config, &sink).unwrap();

        assert_eq!(frame.pixels.len(), 12);
        assert!(frame.pixels.iter().all(|p| (*p - Vec3::ONE).length() < 1e-5));
        assert_eq!(sink.fractions.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_end_to_end_white_and_black_2x1() {
        let config = RenderConfig::default()
            .with_resolution(2, 1)
            .with_fov(90.0)
            .with_eye(Vec3::ZERO)
            .with_samples(1)
            .with_threads(1);

        let white = render_stochastic(&ConstantScene(Vec3::ONE), &config, &crate::NullProgress)
            .unwrap();
        let bytes = crate::ppm::encode(&white, crate::ppm::STOCHASTIC_GAMMA);
        assert_eq!(bytes, b"P6\n2 1\n255\n\xff\xff\xff\xff\xff\xff");

        let black = render_stochastic(&ConstantScene(Vec3::ZERO), &config, &crate::NullProgress)
            .unwrap();
        let bytes = crate::ppm::encode(&black, crate::ppm::STOCHASTIC_GAMMA);
        assert_eq!(bytes, b"P6\n2 1\n255\n\x00\x00\x00\x00\x00\x00");
    }

    #[test]
    fn test_render_to_file_writes_complete_image() {
        let config = RenderConfig::default()
            .with_resolution(2, 1)
            .with_fov(90.0)
            .with_samples(1)
            .with_threads(1);
        let path = std::env::temp_dir().join("ember-e2e.ppm");

        render_stochastic_to_file(&ConstantScene(Vec3::ONE), &config, &crate::NullProgress, &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(bytes, b"P6\n2 1\n255\n\xff\xff\xff\xff\xff\xff");
    }

    #[test]
    fn test_direct_render_uses_pixel_centers() {
        struct DirectionScene;
        impl Scene for DirectionScene {
            fn cast_ray(&self, ray: &ember_math::Ray, _depth: u32) -> Vec3 {
                ray.direction()
            }
        }

        let config = small_config().with_resolution(3, 3);
        let frame = render_direct(&DirectionScene, &config, &crate::NullProgress).unwrap();

        // The center pixel of a 3x3 image looks straight down +Z.
        let center = frame.get(1, 1);
        assert!((center - Vec3::Z).length() < 1e-5);
    }
}
