use enough::StopReason;

use crate::pixel::PixelLayout;

/// Errors from constructing or reinterpreting a [`crate::RasterImage`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    #[error("raster dimensions must be non-zero: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: PixelLayout,
        actual: PixelLayout,
    },
}

/// Errors from PCX header, palette and pixel decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("truncated PCX header: need 128 bytes, got {actual}")]
    TruncatedHeader { actual: usize },

    #[error("invalid PCX geometry: window ({xmin},{ymin})-({xmax},{ymax}) is empty")]
    InvalidGeometry {
        xmin: u16,
        ymin: u16,
        xmax: u16,
        ymax: u16,
    },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("pixel decoder failed: {0}")]
    PixelDecoder(String),

    #[error("decoded raster is {actual:?}, header declares {expected:?}")]
    GeometryMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for DecodeError {
    fn from(r: StopReason) -> Self {
        DecodeError::Cancelled(r)
    }
}

/// Errors from image transforms.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransformError {
    #[error("{operator} does not accept {actual:?} input (expected {expected})")]
    UnsupportedChannelLayout {
        operator: &'static str,
        expected: &'static str,
        actual: PixelLayout,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for TransformError {
    fn from(r: StopReason) -> Self {
        TransformError::Cancelled(r)
    }
}
