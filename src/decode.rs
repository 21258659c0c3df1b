use core::fmt::Display;

use enough::Stop;

use crate::error::DecodeError;
use crate::limits::Limits;
use crate::pcx::header::{self, HeaderStrictness, PcxHeader};
use crate::pcx::palette::{self, ColorPalette};
use crate::pcx::PcxInfo;
use crate::raster::RasterImage;

/// External collaborator that turns a complete PCX file into pixels.
///
/// This crate parses only the header and palette. Run-length
/// decompression of the pixel body is delegated to an implementation of
/// this trait (typically a general-purpose image codec).
pub trait PixelDecoder {
    type Error: Display;

    /// Decode the full file into a raster.
    fn decode_pixels(&self, data: &[u8]) -> Result<RasterImage, Self::Error>;
}

impl<F, E> PixelDecoder for F
where
    F: Fn(&[u8]) -> Result<RasterImage, E>,
    E: Display,
{
    type Error = E;

    fn decode_pixels(&self, data: &[u8]) -> Result<RasterImage, E> {
        self(data)
    }
}

/// Builder for decoding a PCX file held in memory.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    strictness: HeaderStrictness,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            strictness: HeaderStrictness::default(),
        }
    }

    /// Reject headers whose geometry exceeds `limits`.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_strictness(mut self, strictness: HeaderStrictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Parse and validate the 128-byte header.
    pub fn header(&self) -> Result<PcxHeader, DecodeError> {
        let header = header::parse_header(self.data, self.strictness)?;
        if let Some(limits) = self.limits {
            limits.check_header(&header)?;
        }
        Ok(header)
    }

    /// The trailing 256-color palette, if present.
    pub fn palette(&self) -> Option<ColorPalette> {
        palette::parse_palette(self.data)
    }

    /// Header and palette together.
    pub fn inspect(&self) -> Result<PcxInfo, DecodeError> {
        let header = self.header()?;
        let palette = self.palette();
        Ok(PcxInfo {
            header,
            palette,
            file_len: self.data.len(),
        })
    }

    /// Validate the header, then hand the file to `decoder`.
    ///
    /// The returned raster must match the header's dimensions.
    pub fn decode_pixels<D: PixelDecoder + ?Sized>(
        &self,
        decoder: &D,
        stop: impl Stop,
    ) -> Result<RasterImage, DecodeError> {
        let header = self.header()?;
        stop.check()?;
        let raster = decoder
            .decode_pixels(self.data)
            .map_err(|e| DecodeError::PixelDecoder(e.to_string()))?;
        stop.check()?;

        let expected = header.dimensions();
        if raster.dimensions() != expected {
            return Err(DecodeError::GeometryMismatch {
                expected,
                actual: raster.dimensions(),
            });
        }
        if let Some(limits) = self.limits {
            limits.check_memory(raster.pixels().len() as u64)?;
        }
        Ok(raster)
    }
}
