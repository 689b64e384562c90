//! The scene seam consumed by the rendering driver.

use ember_math::{Ray, Vec3};

/// Radiance evaluator for a scene.
///
/// The driver treats the scene as opaque: intersection, materials, light
/// sampling and any internal recursion all live behind `cast_ray`.
/// Implementations are called concurrently from every worker thread and
/// must not rely on shared mutable state.
pub trait Scene: Sync {
    /// Estimate the radiance arriving along `ray`.
    ///
    /// `depth` is the recursion depth of the call; the driver always passes
    /// zero and leaves any bounce bookkeeping to the implementation. The
    /// returned value is linear light energy and may exceed 1.0.
    fn cast_ray(&self, ray: &Ray, depth: u32) -> Vec3;
}

impl<S: Scene + ?Sized> Scene for &S {
    fn cast_ray(&self, ray: &Ray, depth: u32) -> Vec3 {
        (**self).cast_ray(ray, depth)
    }
}
