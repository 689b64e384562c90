//! Ember - CPU Monte Carlo rendering driver
//!
//! Shoots jittered sample rays per pixel, averages the radiance estimates
//! into a framebuffer across a pool of worker threads, and tone maps the
//! result into a binary PPM image. Scene evaluation lives behind the
//! [`Scene`] trait and is treated as opaque.

mod camera;
mod partition;
pub mod ppm;
mod progress;
mod renderer;
mod scene;

pub use camera::Camera;
pub use partition::{partition_rows, RowRange};
pub use progress::{ConsoleProgress, NullProgress, ProgressSink, ProgressTracker};
pub use renderer::{
    render_direct, render_direct_to_file, render_stochastic, render_stochastic_to_file,
    sample_pixel, Framebuffer, RenderConfig, RenderError,
};
pub use scene::Scene;

/// Re-export Vec3 and the ray type from ember_math
pub use ember_math::{Ray, Vec3};
