//! Pixel-domain image transforms.
//!
//! Every operator is pure: it borrows its input and returns a freshly
//! allocated [`RasterImage`]. Values outside [0, 255] are clamped, never
//! wrapped. Neighborhood operators extend the raster by replicating edge
//! samples.
//!
//! | operator      | input          | output | rounding                         |
//! |---------------|----------------|--------|----------------------------------|
//! | grayscale     | RGB or gray    | gray   | `floor((R+G+B)/3)`               |
//! | negative      | any            | same   | exact                            |
//! | threshold     | RGB or gray    | gray   | luma, then `>= t`                |
//! | gamma         | any            | same   | truncate                         |
//! | average       | any            | same   | nearest                          |
//! | median        | any            | same   | exact                            |
//! | highpass      | RGB or gray    | gray   | `min(abs, 255)`                  |
//! | unsharp       | RGB            | RGB    | nearest (blur and combination)   |
//! | highboost     | RGB            | RGB    | nearest (blur and combination)   |
//! | sobel         | RGB or gray    | gray   | scale to max, truncate           |

mod convolve;
mod edge;
mod point;
mod sharpen;
mod smooth;

pub use convolve::MAX_KERNEL_SIZE;
pub use edge::sobel;
pub use point::{gamma, grayscale, negative, threshold};
pub use sharpen::{highboost, highpass, unsharp_mask};
pub use smooth::{average, median};

use core::fmt;
use core::str::FromStr;

use enough::Stop;

use crate::channels::{merge_planes, split_planes};
use crate::error::TransformError;
use crate::pixel::{PixelLayout, luma};
use crate::raster::RasterImage;
use convolve::{Plane, STOP_CHECK_ROWS};

/// Default box size of the averaging filter.
pub const AVERAGE_KERNEL_SIZE: usize = 5;
/// Default window of the median filter.
pub const MEDIAN_KERNEL_SIZE: usize = 3;
/// Default Gaussian size used by unsharp masking.
pub const UNSHARP_KERNEL_SIZE: usize = 11;
/// Default Gaussian size used by highboost filtering.
pub const HIGHBOOST_KERNEL_SIZE: usize = 9;

/// Names of the available transforms.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Grayscale,
    Negative,
    Threshold,
    Gamma,
    Average,
    Median,
    Highpass,
    UnsharpMask,
    Highboost,
    Sobel,
}

impl TransformKind {
    pub const ALL: [TransformKind; 10] = [
        Self::Grayscale,
        Self::Negative,
        Self::Threshold,
        Self::Gamma,
        Self::Average,
        Self::Median,
        Self::Highpass,
        Self::UnsharpMask,
        Self::Highboost,
        Self::Sobel,
    ];

    /// Stable lowercase name, accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Negative => "negative",
            Self::Threshold => "threshold",
            Self::Gamma => "gamma",
            Self::Average => "average",
            Self::Median => "median",
            Self::Highpass => "highpass",
            Self::UnsharpMask => "unsharp",
            Self::Highboost => "highboost",
            Self::Sobel => "sobel",
        }
    }

    /// Point operators read only the corresponding input pixel.
    pub fn is_point_operator(self) -> bool {
        matches!(
            self,
            Self::Grayscale | Self::Negative | Self::Threshold | Self::Gamma
        )
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "grayscale" | "greyscale" | "gray" => Self::Grayscale,
            "negative" | "invert" => Self::Negative,
            "threshold" | "bw" => Self::Threshold,
            "gamma" => Self::Gamma,
            "average" | "averaging" | "box" => Self::Average,
            "median" => Self::Median,
            "highpass" | "laplacian" => Self::Highpass,
            "unsharp" | "unsharp_mask" => Self::UnsharpMask,
            "highboost" => Self::Highboost,
            "sobel" => Self::Sobel,
            _ => {
                return Err(TransformError::InvalidParameter(format!(
                    "unknown transform {s:?}"
                )));
            }
        };
        Ok(kind)
    }
}

/// Tunable inputs for [`transform`]. Each operator reads only its own
/// fields.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformParameters {
    /// B/W threshold, `0..=255`.
    pub threshold: i32,
    /// Gamma exponent, `> 0`.
    pub gamma: f64,
    /// Highboost amplification `A`, `> 0`. `A > 1` sharpens.
    pub amplification: f64,
    /// Gaussian sigma for unsharp and highboost, `> 0`.
    pub sigma: f64,
    /// Unsharp strength, `>= 0`.
    pub strength: f64,
    /// Odd neighborhood size; `None` uses the operator's default.
    pub kernel_size: Option<usize>,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            threshold: 128,
            gamma: 1.0,
            amplification: 2.0,
            sigma: 10.0,
            strength: 1.5,
            kernel_size: None,
        }
    }
}

impl TransformParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_amplification(mut self, amplification: f64) -> Self {
        self.amplification = amplification;
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_kernel_size(mut self, size: usize) -> Self {
        self.kernel_size = Some(size);
        self
    }

    fn threshold_level(&self) -> Result<u8, TransformError> {
        u8::try_from(self.threshold).map_err(|_| {
            TransformError::InvalidParameter(format!(
                "threshold must be in 0..=255, got {}",
                self.threshold
            ))
        })
    }

    fn kernel_or(&self, default: usize) -> usize {
        self.kernel_size.unwrap_or(default)
    }
}

/// Apply the transform named by `kind`.
pub fn transform(
    kind: TransformKind,
    image: &RasterImage,
    params: &TransformParameters,
    stop: impl Stop,
) -> Result<RasterImage, TransformError> {
    let stop: &dyn Stop = &stop;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        transform = kind.name(),
        width = image.width(),
        height = image.height(),
        layout = ?image.layout(),
        "applying transform"
    );

    match kind {
        TransformKind::Grayscale => grayscale(image, stop),
        TransformKind::Negative => negative(image, stop),
        TransformKind::Threshold => threshold(image, params.threshold_level()?, stop),
        TransformKind::Gamma => gamma(image, params.gamma, stop),
        TransformKind::Average => average(image, params.kernel_or(AVERAGE_KERNEL_SIZE), stop),
        TransformKind::Median => median(image, params.kernel_or(MEDIAN_KERNEL_SIZE), stop),
        TransformKind::Highpass => highpass(image, stop),
        TransformKind::UnsharpMask => unsharp_mask(
            image,
            params.sigma,
            params.strength,
            params.kernel_or(UNSHARP_KERNEL_SIZE),
            stop,
        ),
        TransformKind::Highboost => highboost(
            image,
            params.amplification,
            params.sigma,
            params.kernel_or(HIGHBOOST_KERNEL_SIZE),
            stop,
        ),
        TransformKind::Sobel => sobel(image, stop),
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

fn require_rgb(operator: &'static str, image: &RasterImage) -> Result<(), TransformError> {
    if image.layout() != PixelLayout::Rgb8 {
        return Err(TransformError::UnsupportedChannelLayout {
            operator,
            expected: "exactly 3 channels (RGB)",
            actual: image.layout(),
        });
    }
    Ok(())
}

fn check_finite(name: &str, value: f64, positive: bool) -> Result<f64, TransformError> {
    let ok = value.is_finite() && if positive { value > 0.0 } else { value >= 0.0 };
    if !ok {
        let bound = if positive { "> 0" } else { ">= 0" };
        return Err(TransformError::InvalidParameter(format!(
            "{name} must be finite and {bound}, got {value}"
        )));
    }
    Ok(value)
}

/// Gray intensity plane: luma for RGB, the samples themselves for gray.
fn luma_plane(image: &RasterImage, stop: &dyn Stop) -> Result<Vec<u8>, TransformError> {
    match image.layout() {
        PixelLayout::Gray8 => Ok(image.pixels().to_vec()),
        PixelLayout::Rgb8 => {
            let mut out = Vec::with_capacity(image.pixels().len() / 3);
            for block in image.pixels().chunks(image.row_len() * STOP_CHECK_ROWS) {
                stop.check()?;
                out.extend(block.chunks_exact(3).map(|px| luma(px[0], px[1], px[2])));
            }
            Ok(out)
        }
    }
}

/// Run `f` on each channel plane independently and reassemble.
fn per_channel<F>(
    image: &RasterImage,
    stop: &dyn Stop,
    f: F,
) -> Result<RasterImage, TransformError>
where
    F: Fn(Plane<'_>, &dyn Stop) -> Result<Vec<u8>, TransformError>,
{
    let (w, h) = (image.width() as usize, image.height() as usize);
    match image.layout() {
        PixelLayout::Gray8 => {
            let out = f(Plane::new(image.pixels(), w, h), stop)?;
            Ok(RasterImage::from_parts(
                out,
                image.width(),
                image.height(),
                PixelLayout::Gray8,
            ))
        }
        PixelLayout::Rgb8 => {
            let [r, g, b] = split_planes::<3>(image);
            let r = f(Plane::new(&r, w, h), stop)?;
            let g = f(Plane::new(&g, w, h), stop)?;
            let b = f(Plane::new(&b, w, h), stop)?;
            Ok(merge_planes([&r, &g, &b], image.width(), image.height()))
        }
    }
}

/// Map every sample through a 256-entry table, keeping the layout.
fn map_samples(
    image: &RasterImage,
    lut: &[u8; 256],
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    let mut out = Vec::with_capacity(image.pixels().len());
    for block in image.pixels().chunks(image.row_len() * STOP_CHECK_ROWS) {
        stop.check()?;
        out.extend(block.iter().map(|&v| lut[v as usize]));
    }
    Ok(RasterImage::from_parts(
        out,
        image.width(),
        image.height(),
        image.layout(),
    ))
}
