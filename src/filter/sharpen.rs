//! Sharpening: Laplacian highpass, unsharp masking, highboost.

use enough::Stop;

use super::convolve::{
    Plane, check_kernel_size, correlate3x3, gaussian_kernel, round_clamp, separable,
};
use super::{check_finite, luma_plane, per_channel, require_rgb};
use crate::error::TransformError;
use crate::pixel::PixelLayout;
use crate::raster::RasterImage;

/// 4-neighbor discrete Laplacian.
const LAPLACIAN: [i32; 9] = [0, 1, 0, 1, -4, 1, 0, 1, 0];

/// `min(|laplacian(luma)|, 255)`. Output is single-channel.
pub fn highpass(image: &RasterImage, stop: &dyn Stop) -> Result<RasterImage, TransformError> {
    let luma = luma_plane(image, stop)?;
    let plane = Plane::new(&luma, image.width() as usize, image.height() as usize);
    let response = correlate3x3(plane, &LAPLACIAN, stop)?;
    let out = response
        .iter()
        .map(|&v| v.unsigned_abs().min(255) as u8)
        .collect();
    Ok(RasterImage::from_parts(
        out,
        image.width(),
        image.height(),
        PixelLayout::Gray8,
    ))
}

/// Per channel: `v * (1 + strength) - gaussian(v) * strength`.
///
/// Requires an RGB raster. The blurred plane is rounded to 8 bits before
/// the weighted combination, which is rounded and clamped again.
pub fn unsharp_mask(
    image: &RasterImage,
    sigma: f64,
    strength: f64,
    size: usize,
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    require_rgb("unsharp mask", image)?;
    let sigma = check_finite("sigma", sigma, true)?;
    let strength = check_finite("strength", strength, false)?;
    let size = check_kernel_size(size)?;
    blend_with_blur(image, size, sigma, 1.0 + strength, -strength, stop)
}

/// Per channel: `v * A - gaussian(v) * (A - 1)`.
///
/// Requires an RGB raster. `A > 1` sharpens, `A == 1` is the identity.
pub fn highboost(
    image: &RasterImage,
    amplification: f64,
    sigma: f64,
    size: usize,
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    require_rgb("highboost", image)?;
    let a = check_finite("amplification", amplification, true)?;
    let sigma = check_finite("sigma", sigma, true)?;
    let size = check_kernel_size(size)?;
    blend_with_blur(image, size, sigma, a, -(a - 1.0), stop)
}

/// `round_clamp(v * w_orig + round_clamp(blur(v)) * w_blur)` per channel.
fn blend_with_blur(
    image: &RasterImage,
    size: usize,
    sigma: f64,
    w_orig: f64,
    w_blur: f64,
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    let kernel = gaussian_kernel(size, sigma);
    let (w_orig, w_blur) = (w_orig as f32, w_blur as f32);
    per_channel(image, stop, |plane, stop| {
        let blurred = separable(plane, &kernel, stop)?;
        Ok(plane
            .data
            .iter()
            .zip(&blurred)
            .map(|(&v, &b)| {
                let b = f32::from(round_clamp(b));
                round_clamp(f32::from(v) * w_orig + b * w_blur)
            })
            .collect())
    })
}
