//! Channel separation and intensity histograms.

use crate::error::TransformError;
use crate::pixel::{Channel, PixelLayout};
use crate::raster::RasterImage;

/// Number of distinct 8-bit intensities.
pub const INTENSITY_LEVELS: usize = 256;

fn require_rgb(operator: &'static str, image: &RasterImage) -> Result<(), TransformError> {
    if image.layout() != PixelLayout::Rgb8 {
        return Err(TransformError::UnsupportedChannelLayout {
            operator,
            expected: "3-channel RGB",
            actual: image.layout(),
        });
    }
    Ok(())
}

/// One channel of an RGB raster as a gray raster.
pub fn extract_channel(
    image: &RasterImage,
    channel: Channel,
) -> Result<RasterImage, TransformError> {
    require_rgb("extract_channel", image)?;
    let plane = image
        .pixels()
        .iter()
        .skip(channel.index())
        .step_by(3)
        .copied()
        .collect();
    Ok(RasterImage::from_parts(
        plane,
        image.width(),
        image.height(),
        PixelLayout::Gray8,
    ))
}

/// Split an RGB raster into red, green and blue gray planes.
pub fn split_channels(image: &RasterImage) -> Result<[RasterImage; 3], TransformError> {
    require_rgb("split_channels", image)?;
    Ok(split_planes(image).map(|plane| {
        RasterImage::from_parts(plane, image.width(), image.height(), PixelLayout::Gray8)
    }))
}

/// Interleave three gray planes of equal size into an RGB raster.
pub fn merge_channels(
    red: &RasterImage,
    green: &RasterImage,
    blue: &RasterImage,
) -> Result<RasterImage, TransformError> {
    for plane in [red, green, blue] {
        if plane.layout() != PixelLayout::Gray8 {
            return Err(TransformError::UnsupportedChannelLayout {
                operator: "merge_channels",
                expected: "1-channel planes",
                actual: plane.layout(),
            });
        }
    }
    if green.dimensions() != red.dimensions() || blue.dimensions() != red.dimensions() {
        return Err(TransformError::InvalidParameter(format!(
            "plane sizes differ: {:?}, {:?}, {:?}",
            red.dimensions(),
            green.dimensions(),
            blue.dimensions()
        )));
    }
    Ok(merge_planes(
        [red.pixels(), green.pixels(), blue.pixels()],
        red.width(),
        red.height(),
    ))
}

/// Deinterleave any raster into per-channel sample planes.
pub(crate) fn split_planes<const N: usize>(image: &RasterImage) -> [Vec<u8>; N] {
    debug_assert_eq!(image.channels(), N);
    let len = image.width() as usize * image.height() as usize;
    let mut planes: [Vec<u8>; N] = core::array::from_fn(|_| Vec::with_capacity(len));
    for px in image.pixels().chunks_exact(N) {
        for (plane, &v) in planes.iter_mut().zip(px) {
            plane.push(v);
        }
    }
    planes
}

/// Interleave three planes into an RGB raster of the given size.
pub(crate) fn merge_planes(planes: [&[u8]; 3], width: u32, height: u32) -> RasterImage {
    let [r, g, b] = planes;
    let pixels = r
        .iter()
        .zip(g)
        .zip(b)
        .flat_map(|((&r, &g), &b)| [r, g, b])
        .collect();
    RasterImage::from_parts(pixels, width, height, PixelLayout::Rgb8)
}

/// Counts of each intensity value in one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; INTENSITY_LEVELS],
}

impl Histogram {
    fn from_samples<'a>(samples: impl Iterator<Item = &'a u8>) -> Self {
        let mut bins = [0u64; INTENSITY_LEVELS];
        for &v in samples {
            bins[v as usize] += 1;
        }
        Self { bins }
    }

    /// Histogram of a gray raster.
    pub fn of_image(image: &RasterImage) -> Result<Self, TransformError> {
        if image.layout() != PixelLayout::Gray8 {
            return Err(TransformError::UnsupportedChannelLayout {
                operator: "histogram",
                expected: "1-channel gray",
                actual: image.layout(),
            });
        }
        Ok(Self::from_samples(image.pixels().iter()))
    }

    /// Histogram of one channel of an RGB raster.
    pub fn of_channel(image: &RasterImage, channel: Channel) -> Result<Self, TransformError> {
        require_rgb("histogram", image)?;
        Ok(Self::from_samples(
            image.pixels().iter().skip(channel.index()).step_by(3),
        ))
    }

    /// Count for each intensity, indexed by value.
    pub fn bins(&self) -> &[u64; INTENSITY_LEVELS] {
        &self.bins
    }

    pub fn count(&self, value: u8) -> u64 {
        self.bins[value as usize]
    }

    /// Number of samples counted.
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Largest bin count.
    pub fn max(&self) -> u64 {
        self.bins.iter().copied().max().unwrap_or(0)
    }
}
