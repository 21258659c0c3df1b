//! Trailing 256-color palette block.

use crate::error::RasterError;
use crate::pixel::PixelLayout;
use crate::raster::RasterImage;

/// Marker byte preceding the 256-color palette.
pub const PALETTE_MARKER: u8 = 0x0C;

/// Bytes of palette data after the marker (256 RGB triples).
pub const PALETTE_LEN: usize = 768;

/// Marker plus palette data, located at the very end of the file.
pub const PALETTE_BLOCK_LEN: usize = PALETTE_LEN + 1;

/// 256 RGB entries, in file order.
#[derive(Clone, PartialEq, Eq)]
pub struct ColorPalette {
    entries: [u8; PALETTE_LEN],
}

impl core::fmt::Debug for ColorPalette {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColorPalette")
            .field("first", &self.get(0))
            .field("last", &self.get(255))
            .finish()
    }
}

impl ColorPalette {
    /// Wrap 768 bytes of RGB triples. Entry `i` is bytes `3i..3i+3`.
    pub fn from_bytes(entries: &[u8; PALETTE_LEN]) -> Self {
        Self { entries: *entries }
    }

    /// Color at `index`.
    pub fn get(&self, index: u8) -> [u8; 3] {
        let off = index as usize * 3;
        [
            self.entries[off],
            self.entries[off + 1],
            self.entries[off + 2],
        ]
    }

    /// All 256 entries in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = [u8; 3]> + '_ {
        self.entries.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Raw palette bytes as stored in the file (without the marker).
    pub fn to_bytes(&self) -> [u8; PALETTE_LEN] {
        self.entries
    }

    /// Typed view of the entries.
    #[cfg(feature = "rgb")]
    pub fn as_rgb(&self) -> &[rgb::RGB8] {
        use rgb::AsPixels as _;
        self.entries[..].as_pixels()
    }

    /// 16x16 RGB image with one pixel per entry, row-major by index.
    pub fn swatch(&self) -> RasterImage {
        RasterImage::from_parts(self.entries.to_vec(), 16, 16, PixelLayout::Rgb8)
    }

    /// Map 8-bit color indices to RGB.
    ///
    /// `indices` holds one byte per pixel, row-major, as produced by an
    /// external run-length decoder for single-plane 8-bit images.
    pub fn expand_indices(
        &self,
        indices: &[u8],
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RasterError> {
        let expected = crate::raster::buffer_len(width, height, PixelLayout::Gray8)?;
        if indices.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: indices.len(),
            });
        }
        let pixels = indices.iter().flat_map(|&i| self.get(i)).collect();
        RasterImage::rgb(pixels, width, height)
    }
}

/// Read the palette block from the last 769 bytes of `data`.
///
/// Returns `None` when the file is too short or the marker is absent.
pub(crate) fn parse_palette(data: &[u8]) -> Option<ColorPalette> {
    let start = data.len().checked_sub(PALETTE_BLOCK_LEN)?;
    let block = &data[start..];
    if block[0] != PALETTE_MARKER {
        #[cfg(feature = "tracing")]
        tracing::trace!(marker = block[0], "no 256-color palette marker");
        return None;
    }
    let entries: &[u8; PALETTE_LEN] = block[1..].try_into().ok()?;
    Some(ColorPalette::from_bytes(entries))
}
