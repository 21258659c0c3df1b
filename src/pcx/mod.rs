//! PCX container: header and trailing palette.
//!
//! The run-length pixel body is not decoded here; see
//! [`crate::PixelDecoder`] for plugging in a collaborator that does.

pub(crate) mod header;
pub(crate) mod palette;

pub use header::{
    ENCODING_RLE, HEADER_LEN, HeaderStrictness, HeaderWarnings, PCX_MANUFACTURER, PcxHeader,
};
pub use palette::{ColorPalette, PALETTE_BLOCK_LEN, PALETTE_LEN, PALETTE_MARKER};

/// Header and palette of a PCX file, as shown by an inspector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcxInfo {
    pub header: PcxHeader,
    /// `None` when the file carries no 256-color palette block.
    pub palette: Option<ColorPalette>,
    /// Total input length in bytes.
    pub file_len: usize,
}

impl PcxInfo {
    pub fn width(&self) -> u32 {
        self.header.width()
    }

    pub fn height(&self) -> u32 {
        self.header.height()
    }

    /// Whether the file has a palette block that the header says is used.
    pub fn has_extended_palette(&self) -> bool {
        self.palette.is_some() && self.header.uses_extended_palette()
    }
}
