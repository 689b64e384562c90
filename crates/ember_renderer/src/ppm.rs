//! Tone mapping and binary PPM (P6) output.
//!
//! Radiance is clamped to [0, 1], gamma-corrected, and quantized to 8 bits
//! per channel. The stochastic render uses gamma 0.6; the direct mode
//! writes linear values (gamma 1.0).

use crate::renderer::{Framebuffer, RenderError};
use ember_math::Vec3;
use std::path::Path;

/// Gamma exponent applied to stochastic renders.
pub const STOCHASTIC_GAMMA: f32 = 0.6;

/// Gamma exponent for the direct mode: no correction.
pub const LINEAR_GAMMA: f32 = 1.0;

/// Clamp a channel to [0, 1].
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Tone map one channel: clamp, apply the gamma curve, quantize to a byte.
#[inline]
pub fn tone_map(channel: f32, gamma: f32) -> u8 {
    (255.0 * clamp_01(channel).powf(gamma)) as u8
}

/// Tone map a radiance value to 8-bit RGB.
pub fn color_to_rgb(color: Vec3, gamma: f32) -> [u8; 3] {
    [
        tone_map(color.x, gamma),
        tone_map(color.y, gamma),
        tone_map(color.z, gamma),
    ]
}

/// Encode a framebuffer as a binary PPM byte stream.
///
/// The output is exactly `"P6\n<width> <height>\n255\n"` followed by
/// `width * height * 3` RGB bytes in row-major order, no padding and no
/// trailing data.
pub fn encode(frame: &Framebuffer, gamma: f32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32 + frame.pixels.len() * 3);
    bytes.extend_from_slice(format!("P6\n{} {}\n255\n", frame.width, frame.height).as_bytes());
    for &pixel in &frame.pixels {
        bytes.extend_from_slice(&color_to_rgb(pixel, gamma));
    }
    bytes
}

/// Encode and write a framebuffer to `path`.
///
/// The image is encoded fully in memory before the file is touched, so an
/// I/O failure never leaves a truncated image behind. Open and write
/// errors surface as [`RenderError::Io`].
pub fn save(frame: &Framebuffer, gamma: f32, path: &Path) -> Result<(), RenderError> {
    let bytes = encode(frame, gamma);
    std::fs::write(path, &bytes)?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
