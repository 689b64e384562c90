//! Pinhole camera for primary ray generation.

use ember_math::{Ray, Vec3};

/// Camera for generating primary rays into the scene.
///
/// Maps pixel coordinates plus a sub-pixel jitter offset to world-space
/// rays. The viewport scale and aspect ratio are precomputed at
/// construction; the camera is immutable for the duration of a render.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    eye: Vec3,
    // Cached: tan(fov/2) and width/height
    scale: f32,
    aspect: f32,
}

impl Camera {
    /// Create a camera for the given image size, vertical field of view
    /// (degrees) and eye position.
    pub fn new(image_width: u32, image_height: u32, fov: f32, eye: Vec3) -> Self {
        Self {
            image_width,
            image_height,
            eye,
            scale: (fov.to_radians() * 0.5).tan(),
            aspect: image_width as f32 / image_height as f32,
        }
    }

    /// Generate the primary ray through pixel (col, row) offset by a jitter
    /// pair in [0, 1).
    ///
    /// The pixel center maps to screen space, scaled by the field of view
    /// and aspect ratio; x is mirrored to keep the scene's handedness.
    pub fn primary_ray(&self, col: u32, row: u32, jx: f32, jy: f32) -> Ray {
        let sx = (2.0 * (col as f32 + jx) / self.image_width as f32 - 1.0)
            * self.aspect
            * self.scale;
        let sy = (1.0 - 2.0 * (row as f32 + jy) / self.image_height as f32) * self.scale;
        let direction = Vec3::new(-sx, sy, 1.0).normalize();
        Ray::new(self.eye, direction)
    }

    /// Generate the ray through the exact center of pixel (col, row).
    ///
    /// Used by the direct shading mode, which shoots one ray per pixel.
    pub fn center_ray(&self, col: u32, row: u32) -> Ray {
        self.primary_ray(col, row, 0.5, 0.5)
    }

    /// The fixed eye position.
    pub fn eye(&self) -> Vec3 {
        self.eye
    }
}
