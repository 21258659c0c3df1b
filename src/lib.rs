//! # zenpcx
//!
//! PCX header/palette decoding and a library of deterministic pixel-domain
//! image transforms.
//!
//! ## PCX container
//!
//! - **Header**: the fixed 128-byte little-endian header, validated and
//!   round-trippable byte-for-byte ([`PcxHeader::to_bytes`]).
//! - **Palette**: the optional 256-color block (`0x0C` + 768 bytes) at the
//!   end of the file. Absence is not an error.
//! - **Pixels**: run-length decompression of the body is delegated to a
//!   [`PixelDecoder`] collaborator; [`DecodeRequest::decode_pixels`]
//!   validates what it returns against the header.
//!
//! ## Transforms ([`filter`])
//!
//! Point operators (grayscale, negative, B/W threshold, gamma) and
//! neighborhood filters (averaging, median, Laplacian highpass, unsharp
//! mask, highboost, Sobel magnitude). All are pure functions from a
//! [`RasterImage`] to a new [`RasterImage`].
//!
//! ## Non-Goals
//!
//! - RLE decoding of the PCX pixel body
//! - Encoding PCX files (only the header serializes)
//! - Display, plotting, or any I/O
//!
//! ## Usage
//!
//! ```no_run
//! use zenpcx::{DecodeRequest, TransformKind, TransformParameters, RasterImage, Unstoppable};
//!
//! let data: &[u8] = &[]; // your PCX bytes
//!
//! let info = DecodeRequest::new(data).inspect()?;
//! println!("{}x{}, palette: {}", info.width(), info.height(), info.palette.is_some());
//!
//! let image = RasterImage::rgb(vec![10, 20, 30, 40, 50, 60], 2, 1)?;
//! let params = TransformParameters::new().with_gamma(0.5);
//! let brighter = zenpcx::transform(TransformKind::Gamma, &image, &params, Unstoppable)?;
//! # let _ = brighter;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod channels;
mod decode;
mod error;
mod limits;
mod pixel;
mod raster;

pub mod filter;
pub mod pcx;

// Re-exports
pub use channels::{Histogram, INTENSITY_LEVELS, extract_channel, merge_channels, split_channels};
pub use decode::{DecodeRequest, PixelDecoder};
pub use enough::{Stop, Unstoppable};
pub use error::{DecodeError, RasterError, TransformError};
pub use filter::{TransformKind, TransformParameters, transform};
pub use limits::Limits;
pub use pcx::{ColorPalette, HeaderStrictness, HeaderWarnings, PcxHeader, PcxInfo};
pub use pixel::{Channel, PixelLayout};
pub use raster::RasterImage;

/// Parse the first 128 bytes of `data` as a PCX header.
///
/// Non-standard manufacturer or encoding bytes are reported in
/// [`PcxHeader::warnings`]; use [`DecodeRequest::with_strictness`] to
/// reject them instead.
pub fn decode_header(data: &[u8]) -> Result<PcxHeader, DecodeError> {
    DecodeRequest::new(data).header()
}

/// The trailing 256-color palette of a complete PCX file, if present.
pub fn decode_palette(data: &[u8]) -> Option<ColorPalette> {
    DecodeRequest::new(data).palette()
}

/// Header and palette of a complete PCX file.
pub fn inspect(data: &[u8]) -> Result<PcxInfo, DecodeError> {
    DecodeRequest::new(data).inspect()
}
