//! Point operators: each output sample depends only on the input pixel
//! at the same position.

use enough::Stop;

use super::convolve::STOP_CHECK_ROWS;
use super::{check_finite, luma_plane, map_samples};
use crate::error::TransformError;
use crate::pixel::PixelLayout;
use crate::raster::RasterImage;

/// `floor((R + G + B) / 3)` per pixel. Gray input is returned unchanged.
pub fn grayscale(image: &RasterImage, stop: &dyn Stop) -> Result<RasterImage, TransformError> {
    if image.layout() == PixelLayout::Gray8 {
        return Ok(image.clone());
    }
    let mut out = Vec::with_capacity(image.pixels().len() / 3);
    for block in image.pixels().chunks(image.row_len() * STOP_CHECK_ROWS) {
        stop.check()?;
        out.extend(
            block
                .chunks_exact(3)
                .map(|px| ((u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2])) / 3) as u8),
        );
    }
    Ok(RasterImage::from_parts(
        out,
        image.width(),
        image.height(),
        PixelLayout::Gray8,
    ))
}

/// `255 - v` for every sample.
pub fn negative(image: &RasterImage, stop: &dyn Stop) -> Result<RasterImage, TransformError> {
    let lut: [u8; 256] = core::array::from_fn(|v| 255 - v as u8);
    map_samples(image, &lut, stop)
}

/// Binary image from luma: 255 where `luma >= level`, else 0.
///
/// Luma is the BT.601 weighting, not the plain average used by
/// [`grayscale`]. Gray input is thresholded directly.
pub fn threshold(
    image: &RasterImage,
    level: u8,
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    let mut out = luma_plane(image, stop)?;
    for v in out.iter_mut() {
        *v = if *v >= level { 255 } else { 0 };
    }
    Ok(RasterImage::from_parts(
        out,
        image.width(),
        image.height(),
        PixelLayout::Gray8,
    ))
}

/// Power-law transform `255 * (v / 255)^gamma`, truncated, per channel.
pub fn gamma(
    image: &RasterImage,
    gamma: f64,
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    let gamma = check_finite("gamma", gamma, true)?;
    let lut: [u8; 256] = core::array::from_fn(|v| {
        let s = 255.0 * (v as f64 / 255.0).powf(gamma);
        // `as` saturates; s is already within [0, 255] for v in 0..=255.
        s as u8
    });
    map_samples(image, &lut, stop)
}
