//! Neighborhood machinery shared by the spatial filters.
//!
//! Every operator here works on a single 8-bit plane and extends the
//! plane past its edges by replicating the nearest edge sample.

use enough::Stop;

use crate::error::TransformError;

/// Rows processed between cancellation checks.
pub(crate) const STOP_CHECK_ROWS: usize = 16;

/// A single-channel view: `data.len() == width * height`.
#[derive(Clone, Copy)]
pub(crate) struct Plane<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Plane<'a> {
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Sample at `(x, y)` with replicate-edge extension.
    #[inline]
    pub fn at(&self, x: isize, y: isize) -> u8 {
        let x = clamp_coord(x, self.width);
        let y = clamp_coord(y, self.height);
        self.data[y * self.width + x]
    }
}

#[inline]
fn clamp_coord(c: isize, len: usize) -> usize {
    c.clamp(0, len as isize - 1) as usize
}

/// Clamp to [0, 255], then round half away from zero.
#[inline]
pub(crate) fn round_clamp(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// Largest accepted neighborhood size. Keeps `size * size * 255`
/// comfortably inside `u64`.
pub const MAX_KERNEL_SIZE: usize = 65535;

/// Odd, non-zero neighborhood size no larger than [`MAX_KERNEL_SIZE`].
pub(crate) fn check_kernel_size(size: usize) -> Result<usize, TransformError> {
    if size == 0 || size % 2 == 0 || size > MAX_KERNEL_SIZE {
        return Err(TransformError::InvalidParameter(format!(
            "kernel size must be odd and in 1..={MAX_KERNEL_SIZE}, got {size}"
        )));
    }
    Ok(size)
}

/// How the `2r + 1` taps centered on one sample land on a replicate-edge
/// axis of `len` samples.
///
/// Taps past either end collapse onto the edge sample, so only
/// `lo..=hi` is ever visited, whatever the radius.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Taps {
    pub lo: usize,
    pub hi: usize,
    last: usize,
    below: u64,
    above: u64,
}

impl Taps {
    pub fn new(center: usize, r: usize, len: usize) -> Self {
        let last = len - 1;
        Self {
            lo: center.saturating_sub(r),
            hi: center.saturating_add(r).min(last),
            last,
            below: r.saturating_sub(center) as u64,
            above: center.saturating_add(r).saturating_sub(last) as u64,
        }
    }

    /// Number of taps reading sample `i`, for `i` in `lo..=hi`.
    #[inline]
    pub fn weight(&self, i: usize) -> u64 {
        let mut w = 1;
        if i == 0 {
            w += self.below;
        }
        if i == self.last {
            w += self.above;
        }
        w
    }

    /// `(sample index, tap count)` pairs.
    pub fn iter(self) -> impl Iterator<Item = (usize, u64)> {
        (self.lo..=self.hi).map(move |i| (i, self.weight(i)))
    }
}

/// Sum of each `size x size` window, computed separably in integers.
pub(crate) fn box_sums(
    plane: Plane<'_>,
    size: usize,
    stop: &dyn Stop,
) -> Result<Vec<u64>, TransformError> {
    let r = size / 2;
    let (w, h) = (plane.width, plane.height);
    let columns: Vec<Taps> = (0..w).map(|x| Taps::new(x, r, w)).collect();

    let mut horizontal = vec![0u64; w * h];
    for y in 0..h {
        if y % STOP_CHECK_ROWS == 0 {
            stop.check()?;
        }
        let row = &plane.data[y * w..(y + 1) * w];
        for (x, taps) in columns.iter().enumerate() {
            horizontal[y * w + x] = taps.iter().map(|(i, n)| n * u64::from(row[i])).sum();
        }
    }

    let mut out = vec![0u64; w * h];
    for y in 0..h {
        if y % STOP_CHECK_ROWS == 0 {
            stop.check()?;
        }
        let rows = Taps::new(y, r, h);
        for x in 0..w {
            out[y * w + x] = rows.iter().map(|(yy, n)| n * horizontal[yy * w + x]).sum();
        }
    }
    Ok(out)
}

/// Normalized 1-D Gaussian of `size` taps.
///
/// `g[i] = exp(-(i - (size-1)/2)^2 / (2 sigma^2))`, scaled to sum to 1.
pub(crate) fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    let center = (size as f64 - 1.0) / 2.0;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.iter().map(|&v| (v / sum) as f32).collect()
}

/// Separable convolution with the same 1-D kernel along both axes.
pub(crate) fn separable(
    plane: Plane<'_>,
    kernel: &[f32],
    stop: &dyn Stop,
) -> Result<Vec<f32>, TransformError> {
    let r = (kernel.len() / 2) as isize;
    let (w, h) = (plane.width, plane.height);

    let mut horizontal = vec![0f32; w * h];
    for y in 0..h {
        if y % STOP_CHECK_ROWS == 0 {
            stop.check()?;
        }
        for x in 0..w {
            let mut acc = 0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let dx = k as isize - r;
                acc += weight * f32::from(plane.at(x as isize + dx, y as isize));
            }
            horizontal[y * w + x] = acc;
        }
    }

    let mut out = vec![0f32; w * h];
    for y in 0..h {
        if y % STOP_CHECK_ROWS == 0 {
            stop.check()?;
        }
        for x in 0..w {
            let mut acc = 0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let yy = clamp_coord(y as isize + k as isize - r, h);
                acc += weight * horizontal[yy * w + x];
            }
            out[y * w + x] = acc;
        }
    }
    Ok(out)
}

/// 3x3 integer correlation, kernel row-major with `kernel[4]` at the center.
pub(crate) fn correlate3x3(
    plane: Plane<'_>,
    kernel: &[i32; 9],
    stop: &dyn Stop,
) -> Result<Vec<i32>, TransformError> {
    let (w, h) = (plane.width, plane.height);
    let mut out = vec![0i32; w * h];
    for y in 0..h {
        if y % STOP_CHECK_ROWS == 0 {
            stop.check()?;
        }
        for x in 0..w {
            let mut acc = 0i32;
            for (k, &weight) in kernel.iter().enumerate() {
                if weight == 0 {
                    continue;
                }
                let dx = (k % 3) as isize - 1;
                let dy = (k / 3) as isize - 1;
                acc += weight * i32::from(plane.at(x as isize + dx, y as isize + dy));
            }
            out[y * w + x] = acc;
        }
    }
    Ok(out)
}
