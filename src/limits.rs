use crate::error::DecodeError;
use crate::pcx::PcxHeader;

/// Bytes per pixel of the widest raster a [`PixelDecoder`](crate::PixelDecoder)
/// may hand back (interleaved RGB).
const MAX_DECODED_BPP: u64 = 3;

/// Caps applied to a header's geometry before any pixels are decoded.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes of the decoded raster, budgeted at 3 bytes per pixel.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Limit both dimensions to `max` pixels.
    pub fn square(max: u64) -> Self {
        Self {
            max_width: Some(max),
            max_height: Some(max),
            ..Self::default()
        }
    }

    /// Check the header's image window and its worst-case decoded size.
    pub(crate) fn check_header(&self, header: &PcxHeader) -> Result<(), DecodeError> {
        let (width, height) = (u64::from(header.width()), u64::from(header.height()));
        exceeds("width", width, self.max_width)?;
        exceeds("height", height, self.max_height)?;
        exceeds("pixel count", width * height, self.max_pixels)?;
        self.check_memory(width * height * MAX_DECODED_BPP)
    }

    /// Check the size of a raster actually produced by a decoder.
    pub(crate) fn check_memory(&self, bytes: u64) -> Result<(), DecodeError> {
        exceeds("decoded raster bytes", bytes, self.max_memory_bytes)
    }
}

fn exceeds(what: &str, value: u64, limit: Option<u64>) -> Result<(), DecodeError> {
    match limit {
        Some(max) if value > max => Err(DecodeError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
