//! Sobel gradient magnitude.

use enough::Stop;

use super::convolve::{Plane, correlate3x3};
use super::luma_plane;
use crate::error::TransformError;
use crate::pixel::PixelLayout;
use crate::raster::RasterImage;

const SOBEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
const SOBEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

/// `sqrt(Gx^2 + Gy^2)` of the luma plane, scaled so the strongest edge
/// maps to 255 and truncated. A flat image (no gradient anywhere) yields
/// all zeros.
pub fn sobel(image: &RasterImage, stop: &dyn Stop) -> Result<RasterImage, TransformError> {
    let luma = luma_plane(image, stop)?;
    let plane = Plane::new(&luma, image.width() as usize, image.height() as usize);
    let gx = correlate3x3(plane, &SOBEL_X, stop)?;
    let gy = correlate3x3(plane, &SOBEL_Y, stop)?;

    let magnitude: Vec<f64> = gx
        .iter()
        .zip(&gy)
        .map(|(&x, &y)| f64::from(x).hypot(f64::from(y)))
        .collect();
    let max = magnitude.iter().copied().fold(0.0f64, f64::max);

    let out = if max > 0.0 {
        magnitude.iter().map(|&m| (m / max * 255.0) as u8).collect()
    } else {
        #[cfg(feature = "tracing")]
        tracing::trace!("sobel: no gradient, returning zeros");
        vec![0u8; magnitude.len()]
    };
    Ok(RasterImage::from_parts(
        out,
        image.width(),
        image.height(),
        PixelLayout::Gray8,
    ))
}
