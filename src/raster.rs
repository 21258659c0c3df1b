use crate::error::RasterError;
use crate::pixel::PixelLayout;

/// An owned 8-bit raster: width, height and an interleaved pixel buffer.
///
/// The buffer length always equals `width * height * layout.channels()`
/// and both dimensions are non-zero. Transforms never mutate a raster;
/// each returns a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    layout: PixelLayout,
}

impl RasterImage {
    /// Wrap a pixel buffer, validating its size against the geometry.
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Self, RasterError> {
        let expected = buffer_len(width, height, layout)?;
        if pixels.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            layout,
        })
    }

    /// Single-channel raster.
    pub fn gray(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self, RasterError> {
        Self::new(pixels, width, height, PixelLayout::Gray8)
    }

    /// Interleaved RGB raster.
    pub fn rgb(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self, RasterError> {
        Self::new(pixels, width, height, PixelLayout::Rgb8)
    }

    /// Raster filled with a single value in every sample.
    pub fn filled(
        width: u32,
        height: u32,
        layout: PixelLayout,
        value: u8,
    ) -> Result<Self, RasterError> {
        let len = buffer_len(width, height, layout)?;
        Self::new(vec![value; len], width, height, layout)
    }

    /// Build an RGB raster from interleaved RGBA bytes, discarding alpha.
    pub fn from_rgba8(rgba: &[u8], width: u32, height: u32) -> Result<Self, RasterError> {
        let pixel_count = buffer_len(width, height, PixelLayout::Gray8)?;
        let expected = pixel_count
            .checked_mul(4)
            .ok_or(RasterError::DimensionsTooLarge { width, height })?;
        if rgba.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::rgb(pixels, width, height)
    }

    /// Only called by operators that computed `pixels` from a validated
    /// raster of the same geometry.
    pub(crate) fn from_parts(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * layout.channels()
        );
        Self {
            pixels,
            width,
            height,
            layout,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Bytes in one row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }

    /// Samples of pixel `(x, y)`, one per channel.
    ///
    /// Returns `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.layout.bytes_per_pixel();
        let off = (y as usize * self.width as usize + x as usize) * bpp;
        Some(&self.pixels[off..off + bpp])
    }

    /// Rows of the raster, top to bottom.
    pub fn rows(&self) -> core::slice::ChunksExact<'_, u8> {
        self.pixels.chunks_exact(self.row_len())
    }

    /// Convert to RGB. Gray samples are replicated into all three channels.
    pub fn to_rgb(&self) -> RasterImage {
        match self.layout {
            PixelLayout::Rgb8 => self.clone(),
            PixelLayout::Gray8 => {
                let pixels = self.pixels.iter().flat_map(|&v| [v, v, v]).collect();
                Self::from_parts(pixels, self.width, self.height, PixelLayout::Rgb8)
            }
        }
    }

    /// Reinterpret RGB pixel data as typed pixels.
    ///
    /// Returns [`RasterError::LayoutMismatch`] for non-RGB rasters.
    #[cfg(feature = "rgb")]
    pub fn as_rgb_pixels(&self) -> Result<&[rgb::RGB8], RasterError> {
        use rgb::AsPixels as _;

        if self.layout != PixelLayout::Rgb8 {
            return Err(RasterError::LayoutMismatch {
                expected: PixelLayout::Rgb8,
                actual: self.layout,
            });
        }
        Ok(self.pixels[..].as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of RGB pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> Result<imgref::ImgRef<'_, rgb::RGB8>, RasterError> {
        let pixels = self.as_rgb_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Copy into an [`imgref::ImgVec`] of RGB pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> Result<imgref::ImgVec<rgb::RGB8>, RasterError> {
        let pixels = self.as_rgb_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Build an RGB raster from an [`imgref::ImgRef`], honoring its stride.
    #[cfg(feature = "imgref")]
    pub fn from_imgref(img: imgref::ImgRef<'_, rgb::RGB8>) -> Result<Self, RasterError> {
        let width = u32::try_from(img.width()).map_err(|_| RasterError::DimensionsTooLarge {
            width: u32::MAX,
            height: img.height() as u32,
        })?;
        let height = u32::try_from(img.height()).map_err(|_| RasterError::DimensionsTooLarge {
            width,
            height: u32::MAX,
        })?;
        let mut pixels = Vec::with_capacity(img.width() * img.height() * 3);
        for row in img.rows() {
            for px in row {
                pixels.extend_from_slice(&[px.r, px.g, px.b]);
            }
        }
        Self::rgb(pixels, width, height)
    }
}

/// Buffer length for a geometry, rejecting zero and overflowing sizes.
pub(crate) fn buffer_len(
    width: u32,
    height: u32,
    layout: PixelLayout,
) -> Result<usize, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::ZeroDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|wh| wh.checked_mul(layout.bytes_per_pixel()))
        .ok_or(RasterError::DimensionsTooLarge { width, height })
}
