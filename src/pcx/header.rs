//! Fixed 128-byte PCX header.
//!
//! Layout (all multi-byte fields little-endian):
//!
//! | offset | size | field                 |
//! |-------:|-----:|-----------------------|
//! |      0 |    1 | manufacturer (0x0A)   |
//! |      1 |    1 | version               |
//! |      2 |    1 | encoding (1 = RLE)    |
//! |      3 |    1 | bits per pixel        |
//! |      4 |    8 | xmin, ymin, xmax, ymax|
//! |     12 |    4 | hdpi, vdpi            |
//! |     16 |   48 | 16-color EGA palette  |
//! |     64 |    1 | reserved              |
//! |     65 |    1 | color planes          |
//! |     66 |    2 | bytes per scanline    |
//! |     68 |    2 | palette type          |
//! |     70 |    4 | hscreen, vscreen      |
//! |     74 |   54 | reserved              |

use core::fmt;

use crate::error::DecodeError;

/// Size of the PCX header in bytes.
pub const HEADER_LEN: usize = 128;

/// Manufacturer byte of every ZSoft PCX file.
pub const PCX_MANUFACTURER: u8 = 0x0A;

/// The only encoding PCX defines: byte-wise run-length.
pub const ENCODING_RLE: u8 = 1;

const EGA_PALETTE_LEN: usize = 48;
const TAIL_LEN: usize = 54;

/// How strictly [`decode_header`](crate::decode_header) validates the
/// identification bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStrictness {
    /// Reject headers whose manufacturer byte is not 0x0A or whose
    /// encoding byte is not 1.
    Strict,

    /// Default behavior. Record those inconsistencies in
    /// [`HeaderWarnings`] and keep decoding. Only empty geometry and
    /// truncation are fatal.
    #[default]
    Standard,
}

/// Non-fatal inconsistencies found while decoding a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderWarnings {
    /// Manufacturer byte is not 0x0A.
    pub unknown_manufacturer: bool,
    /// Encoding byte is not 1 (run-length).
    pub nonstandard_encoding: bool,
}

impl HeaderWarnings {
    /// Whether any warning is set.
    pub fn any(&self) -> bool {
        self.unknown_manufacturer || self.nonstandard_encoding
    }
}

/// Parsed PCX header.
///
/// Every byte of the input is retained, including the legacy EGA palette
/// and both reserved areas, so [`PcxHeader::to_bytes`] reproduces the
/// original 128 bytes exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcxHeader {
    pub manufacturer: u8,
    pub version: u8,
    pub encoding: u8,
    pub bits_per_pixel: u8,
    pub xmin: u16,
    pub ymin: u16,
    pub xmax: u16,
    pub ymax: u16,
    /// Horizontal resolution in DPI.
    pub hdpi: u16,
    /// Vertical resolution in DPI.
    pub vdpi: u16,
    /// 16-color EGA palette, 16 RGB triples. Not used for display.
    pub ega_palette: [u8; EGA_PALETTE_LEN],
    pub reserved: u8,
    pub color_planes: u8,
    pub bytes_per_line: u16,
    pub palette_type: u16,
    pub hscreen_size: u16,
    pub vscreen_size: u16,
    pub tail: [u8; TAIL_LEN],
    /// Inconsistencies tolerated under [`HeaderStrictness::Standard`].
    pub warnings: HeaderWarnings,
}

impl PcxHeader {
    /// Image width, `xmax - xmin + 1`.
    pub fn width(&self) -> u32 {
        u32::from(self.xmax) - u32::from(self.xmin) + 1
    }

    /// Image height, `ymax - ymin + 1`.
    pub fn height(&self) -> u32 {
        u32::from(self.ymax) - u32::from(self.ymin) + 1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// `(hdpi, vdpi)`.
    pub fn dpi(&self) -> (u16, u16) {
        (self.hdpi, self.vdpi)
    }

    /// Bits per pixel across all planes.
    pub fn color_depth(&self) -> u32 {
        u32::from(self.bits_per_pixel) * u32::from(self.color_planes)
    }

    /// Whether pixel values index a 256-color palette at the end of the file.
    ///
    /// True for single-plane 8-bit images, which is the only layout that
    /// uses the trailing palette block.
    pub fn uses_extended_palette(&self) -> bool {
        self.bits_per_pixel == 8 && self.color_planes == 1
    }

    /// Entry `index` (0..16) of the legacy EGA palette.
    pub fn ega_color(&self, index: usize) -> Option<[u8; 3]> {
        let off = index.checked_mul(3)?;
        let rgb = self.ega_palette.get(off..off + 3)?;
        Some([rgb[0], rgb[1], rgb[2]])
    }

    /// Serialize to the exact 128-byte on-disk layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0] = self.manufacturer;
        out[1] = self.version;
        out[2] = self.encoding;
        out[3] = self.bits_per_pixel;
        put_u16(&mut out, 4, self.xmin);
        put_u16(&mut out, 6, self.ymin);
        put_u16(&mut out, 8, self.xmax);
        put_u16(&mut out, 10, self.ymax);
        put_u16(&mut out, 12, self.hdpi);
        put_u16(&mut out, 14, self.vdpi);
        out[16..64].copy_from_slice(&self.ega_palette);
        out[64] = self.reserved;
        out[65] = self.color_planes;
        put_u16(&mut out, 66, self.bytes_per_line);
        put_u16(&mut out, 68, self.palette_type);
        put_u16(&mut out, 70, self.hscreen_size);
        put_u16(&mut out, 72, self.vscreen_size);
        out[74..].copy_from_slice(&self.tail);
        out
    }
}

impl fmt::Display for PcxHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Encoding: {}", self.encoding)?;
        writeln!(f, "Bits Per Pixel: {}", self.bits_per_pixel)?;
        writeln!(
            f,
            "Image Dimensions: {} {} {} {}",
            self.xmin, self.ymin, self.xmax, self.ymax
        )?;
        writeln!(f, "Horizontal Resolution (HDPI): {}", self.hdpi)?;
        writeln!(f, "Vertical Resolution (VDPI): {}", self.vdpi)?;
        writeln!(f, "Number of Color Planes: {}", self.color_planes)?;
        writeln!(f, "Bytes per Line: {}", self.bytes_per_line)?;
        write!(f, "Palette Type: {}", self.palette_type)
    }
}

fn put_u16(out: &mut [u8; HEADER_LEN], off: usize, v: u16) {
    out[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

// ── Cursor over the fixed-size header ───────────────────────────────

/// Forward-only reader over exactly [`HEADER_LEN`] bytes. Bounds are
/// established up front, so reads cannot fail.
struct Cursor<'a> {
    data: &'a [u8; HEADER_LEN],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8; HEADER_LEN]) -> Self {
        Self { data, pos: 0 }
    }

    fn u8(&mut self) -> u8 {
        let b = self.data[self.pos];
        self.pos += 1;
        b
    }

    fn u16_le(&mut self) -> u16 {
        let val = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        val
    }

    fn fixed<const N: usize>(&mut self) -> [u8; N] {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        buf
    }
}

/// Parse the first 128 bytes of `data` as a PCX header.
///
/// Extra bytes after the header are ignored.
pub(crate) fn parse_header(
    data: &[u8],
    strictness: HeaderStrictness,
) -> Result<PcxHeader, DecodeError> {
    let raw: &[u8; HEADER_LEN] = data
        .get(..HEADER_LEN)
        .and_then(|h| h.try_into().ok())
        .ok_or(DecodeError::TruncatedHeader { actual: data.len() })?;

    let mut c = Cursor::new(raw);
    let manufacturer = c.u8();
    let version = c.u8();
    let encoding = c.u8();
    let bits_per_pixel = c.u8();
    let xmin = c.u16_le();
    let ymin = c.u16_le();
    let xmax = c.u16_le();
    let ymax = c.u16_le();
    let hdpi = c.u16_le();
    let vdpi = c.u16_le();
    let ega_palette = c.fixed::<EGA_PALETTE_LEN>();
    let reserved = c.u8();
    let color_planes = c.u8();
    let bytes_per_line = c.u16_le();
    let palette_type = c.u16_le();
    let hscreen_size = c.u16_le();
    let vscreen_size = c.u16_le();
    let tail = c.fixed::<TAIL_LEN>();
    debug_assert_eq!(c.pos, HEADER_LEN);

    if xmax < xmin || ymax < ymin {
        return Err(DecodeError::InvalidGeometry {
            xmin,
            ymin,
            xmax,
            ymax,
        });
    }

    let warnings = HeaderWarnings {
        unknown_manufacturer: manufacturer != PCX_MANUFACTURER,
        nonstandard_encoding: encoding != ENCODING_RLE,
    };

    if strictness == HeaderStrictness::Strict {
        if warnings.unknown_manufacturer {
            return Err(DecodeError::InvalidHeader(format!(
                "manufacturer byte {manufacturer:#04x} is not {PCX_MANUFACTURER:#04x}"
            )));
        }
        if warnings.nonstandard_encoding {
            return Err(DecodeError::InvalidHeader(format!(
                "encoding {encoding} is not run-length ({ENCODING_RLE})"
            )));
        }
    }

    #[cfg(feature = "tracing")]
    if warnings.any() {
        tracing::debug!(manufacturer, encoding, "PCX header has non-standard identification bytes");
    }

    Ok(PcxHeader {
        manufacturer,
        version,
        encoding,
        bits_per_pixel,
        xmin,
        ymin,
        xmax,
        ymax,
        hdpi,
        vdpi,
        ega_palette,
        reserved,
        color_planes,
        bytes_per_line,
        palette_type,
        hscreen_size,
        vscreen_size,
        tail,
        warnings,
    })
}
