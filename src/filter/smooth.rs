//! Smoothing filters: box average and median.

use enough::Stop;

use super::convolve::{STOP_CHECK_ROWS, Taps, box_sums, check_kernel_size};
use super::per_channel;
use crate::error::TransformError;
use crate::raster::RasterImage;

/// Convolve each channel with a normalized `size x size` all-ones kernel.
///
/// The default size is 5 (weight 1/25 per tap). Results round to nearest.
pub fn average(
    image: &RasterImage,
    size: usize,
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    let size = check_kernel_size(size)?;
    let n = size as u64 * size as u64;
    per_channel(image, stop, |plane, stop| {
        let sums = box_sums(plane, size, stop)?;
        // Each sum is at most 255 * n, so the mean fits in a byte.
        Ok(sums.iter().map(|&s| ((s + n / 2) / n) as u8).collect())
    })
}

/// Replace each sample with the median of its `size x size` neighborhood,
/// independently per channel. The default size is 3.
pub fn median(
    image: &RasterImage,
    size: usize,
    stop: &dyn Stop,
) -> Result<RasterImage, TransformError> {
    let size = check_kernel_size(size)?;
    let r = size / 2;
    // Rank of the median among the size * size taps.
    let rank = (size as u64 * size as u64) / 2;
    per_channel(image, stop, |plane, stop| {
        let (w, h) = (plane.width, plane.height);
        let columns: Vec<Taps> = (0..w).map(|x| Taps::new(x, r, w)).collect();
        let mut out = Vec::with_capacity(plane.data.len());
        let mut window: Vec<(u8, u64)> = Vec::with_capacity(w.min(size) * h.min(size));
        for y in 0..h {
            if y % STOP_CHECK_ROWS == 0 {
                stop.check()?;
            }
            let rows = Taps::new(y, r, h);
            for cols in &columns {
                window.clear();
                for (yy, ny) in rows.iter() {
                    let row = &plane.data[yy * w..(yy + 1) * w];
                    window.extend(cols.iter().map(|(xx, nx)| (row[xx], nx * ny)));
                }
                window.sort_unstable_by_key(|&(v, _)| v);
                out.push(weighted_rank(&window, rank));
            }
        }
        Ok(out)
    })
}

/// Value at 0-based position `rank` of the multiset `(value, count)`,
/// sorted by value.
fn weighted_rank(sorted: &[(u8, u64)], rank: u64) -> u8 {
    let mut seen = 0;
    for &(v, n) in sorted {
        seen += n;
        if seen > rank {
            return v;
        }
    }
    sorted.last().map_or(0, |&(v, _)| v)
}
