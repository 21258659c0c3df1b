use std::sync::atomic::{AtomicUsize, Ordering};

use enough::{StopReason, Unstoppable};
use zenpcx::filter;
use zenpcx::*;

fn noise_rgb(w: u32, h: u32) -> RasterImage {
    let mut state: u32 = 0xDEAD_BEEF;
    let pixels = (0..w * h * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect();
    RasterImage::rgb(pixels, w, h).unwrap()
}

fn apply(kind: TransformKind, image: &RasterImage, params: &TransformParameters) -> RasterImage {
    transform(kind, image, params, Unstoppable).unwrap()
}

fn defaults() -> TransformParameters {
    TransformParameters::default()
}

// ── Grayscale ────────────────────────────────────────────────────────

#[test]
fn grayscale_averages_channels_with_floor() {
    let image = RasterImage::rgb(
        vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        2,
        2,
    )
    .unwrap();
    let gray = filter::grayscale(&image, &Unstoppable).unwrap();
    assert_eq!(gray.layout(), PixelLayout::Gray8);
    assert_eq!(gray.pixels(), &[85, 85, 85, 255]);

    // (1 + 1 + 2) / 3 = 1.33 -> 1
    let image = RasterImage::rgb(vec![1, 1, 2], 1, 1).unwrap();
    assert_eq!(filter::grayscale(&image, &Unstoppable).unwrap().pixels(), &[1]);
}

#[test]
fn grayscale_of_gray_is_identity() {
    let image = RasterImage::gray(vec![3, 200, 17], 3, 1).unwrap();
    assert_eq!(apply(TransformKind::Grayscale, &image, &defaults()), image);
}

// ── Negative ─────────────────────────────────────────────────────────

#[test]
fn negative_inverts_and_is_involutive() {
    let image = RasterImage::rgb(vec![0, 128, 255], 1, 1).unwrap();
    let neg = apply(TransformKind::Negative, &image, &defaults());
    assert_eq!(neg.pixels(), &[255, 127, 0]);

    let image = noise_rgb(13, 7);
    let twice = apply(
        TransformKind::Negative,
        &apply(TransformKind::Negative, &image, &defaults()),
        &defaults(),
    );
    assert_eq!(twice, image);
}

// ── Threshold ────────────────────────────────────────────────────────

#[test]
fn threshold_extremes() {
    let image = noise_rgb(9, 9);
    let white = apply(
        TransformKind::Threshold,
        &image,
        &defaults().with_threshold(0),
    );
    assert_eq!(white.layout(), PixelLayout::Gray8);
    assert!(white.pixels().iter().all(|&v| v == 255));

    // No pixel reaches luma 255, so nothing passes `>= 255`.
    let dim = RasterImage::rgb(vec![254, 254, 254, 0, 0, 0, 255, 255, 0], 3, 1).unwrap();
    let black = apply(TransformKind::Threshold, &dim, &defaults().with_threshold(255));
    assert_eq!(black.pixels(), &[0, 0, 0]);
}

#[test]
fn threshold_uses_luma_not_average() {
    // Pure red: luma 76, channel average 85.
    let red = RasterImage::rgb(vec![255, 0, 0], 1, 1).unwrap();
    let params = defaults().with_threshold(80);
    assert_eq!(apply(TransformKind::Threshold, &red, &params).pixels(), &[0]);
    assert_eq!(apply(TransformKind::Grayscale, &red, &params).pixels(), &[85]);

    let at_level = apply(TransformKind::Threshold, &red, &defaults().with_threshold(76));
    assert_eq!(at_level.pixels(), &[255]);
}

#[test]
fn threshold_out_of_range_is_rejected() {
    let image = noise_rgb(2, 2);
    for bad in [-1, 256, 1000] {
        let result = transform(
            TransformKind::Threshold,
            &image,
            &defaults().with_threshold(bad),
            Unstoppable,
        );
        assert!(
            matches!(result, Err(TransformError::InvalidParameter(_))),
            "threshold {bad} accepted"
        );
    }
}

// ── Gamma ────────────────────────────────────────────────────────────

#[test]
fn gamma_one_is_identity_within_rounding() {
    let ramp: Vec<u8> = (0..=255).collect();
    let image = RasterImage::gray(ramp.clone(), 256, 1).unwrap();
    let out = apply(TransformKind::Gamma, &image, &defaults().with_gamma(1.0));
    for (&a, &b) in ramp.iter().zip(out.pixels()) {
        assert!(a.abs_diff(b) <= 1, "{a} -> {b}");
    }
    assert_eq!(out.pixels()[0], 0);
    assert_eq!(out.pixels()[255], 255);
}

#[test]
fn gamma_truncates_power_law() {
    let image = RasterImage::rgb(vec![0, 128, 255], 1, 1).unwrap();
    // 255 * (128/255)^2 = 64.25
    let out = apply(TransformKind::Gamma, &image, &defaults().with_gamma(2.0));
    assert_eq!(out.pixels(), &[0, 64, 255]);
    assert_eq!(out.layout(), PixelLayout::Rgb8);

    // 255 * (128/255)^0.5 = 180.67
    let out = apply(TransformKind::Gamma, &image, &defaults().with_gamma(0.5));
    assert_eq!(out.pixels(), &[0, 180, 255]);
}

#[test]
fn gamma_must_be_positive_and_finite() {
    let image = noise_rgb(2, 2);
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            filter::gamma(&image, bad, &Unstoppable),
            Err(TransformError::InvalidParameter(_))
        ));
    }
}

// ── Averaging / median ───────────────────────────────────────────────

#[test]
fn average_spreads_impulse_over_window() {
    let mut pixels = vec![0u8; 25];
    pixels[12] = 250;
    let image = RasterImage::gray(pixels, 5, 5).unwrap();
    let out = apply(TransformKind::Average, &image, &defaults());
    // Every 5x5 window (with replicated edges) contains the impulse once.
    assert!(out.pixels().iter().all(|&v| v == 10));
}

#[test]
fn average_processes_channels_independently() {
    let image = RasterImage::filled(4, 3, PixelLayout::Rgb8, 0).unwrap();
    let mut pixels = image.into_pixels();
    for px in pixels.chunks_exact_mut(3) {
        px[1] = 200;
    }
    let image = RasterImage::rgb(pixels, 4, 3).unwrap();
    let out = apply(TransformKind::Average, &image, &defaults());
    for px in out.pixels().chunks_exact(3) {
        assert_eq!(px, &[0, 200, 0]);
    }
}

#[test]
fn even_kernel_size_is_rejected() {
    let image = noise_rgb(3, 3);
    for kind in [TransformKind::Average, TransformKind::Median] {
        let result = transform(kind, &image, &defaults().with_kernel_size(4), Unstoppable);
        assert!(matches!(result, Err(TransformError::InvalidParameter(_))));
        let result = transform(kind, &image, &defaults().with_kernel_size(0), Unstoppable);
        assert!(matches!(result, Err(TransformError::InvalidParameter(_))));
    }
}

#[test]
fn median_removes_salt_noise() {
    let mut pixels = vec![40u8; 9];
    pixels[4] = 255;
    let image = RasterImage::gray(pixels, 3, 3).unwrap();
    let out = apply(TransformKind::Median, &image, &defaults());
    assert!(out.pixels().iter().all(|&v| v == 40));
}

#[test]
fn median_is_per_channel() {
    // Each channel has its own impulse at a different pixel.
    let mut pixels = vec![10u8; 3 * 3 * 3];
    pixels[0] = 255; // red at (0,0)
    pixels[4 * 3 + 1] = 255; // green at center
    pixels[8 * 3 + 2] = 255; // blue at (2,2)
    let image = RasterImage::rgb(pixels, 3, 3).unwrap();
    let out = apply(TransformKind::Median, &image, &defaults());
    assert!(out.pixels().iter().all(|&v| v == 10));
}

#[test]
fn median_keeps_edges_of_large_regions() {
    // Left two columns dark, right two bright: a step survives the median.
    let row = [0u8, 0, 200, 200];
    let pixels: Vec<u8> = row.iter().copied().cycle().take(16).collect();
    let image = RasterImage::gray(pixels.clone(), 4, 4).unwrap();
    let out = apply(TransformKind::Median, &image, &defaults());
    assert_eq!(out.pixels(), &pixels[..]);
}

#[test]
fn oversized_kernels_saturate_to_edge_samples() {
    // Every tap of a huge window on a tiny image lands on a replicated edge.
    let white = RasterImage::gray(vec![255], 1, 1).unwrap();
    let out = apply(TransformKind::Average, &white, &defaults().with_kernel_size(4105));
    assert_eq!(out.pixels(), &[255]);

    let image = RasterImage::filled(3, 2, PixelLayout::Rgb8, 255).unwrap();
    let params = defaults().with_kernel_size(filter::MAX_KERNEL_SIZE);
    let out = apply(TransformKind::Average, &image, &params);
    assert_eq!(out, image);

    // The edge samples absorb the overhang; the middle pixel sits between
    // two equal halves.
    let ramp = RasterImage::gray(vec![10, 20, 30], 3, 1).unwrap();
    let out = apply(TransformKind::Median, &ramp, &defaults().with_kernel_size(4105));
    assert_eq!(out.pixels(), &[10, 20, 30]);
}

#[test]
fn kernel_size_above_maximum_is_rejected() {
    let image = noise_rgb(3, 3);
    let params = defaults().with_kernel_size(filter::MAX_KERNEL_SIZE + 2);
    for kind in [
        TransformKind::Average,
        TransformKind::Median,
        TransformKind::UnsharpMask,
        TransformKind::Highboost,
    ] {
        assert!(
            matches!(
                transform(kind, &image, &params, Unstoppable),
                Err(TransformError::InvalidParameter(_))
            ),
            "{kind}"
        );
    }
}

// ── Highpass ─────────────────────────────────────────────────────────

#[test]
fn highpass_of_impulse() {
    let mut pixels = vec![0u8; 9];
    pixels[4] = 100;
    let image = RasterImage::gray(pixels, 3, 3).unwrap();
    let out = apply(TransformKind::Highpass, &image, &defaults());
    // Center: |-400| clamps to 255; 4-neighbors see +100; corners see nothing.
    assert_eq!(out.pixels(), &[0, 100, 0, 100, 255, 100, 0, 100, 0]);
}

#[test]
fn highpass_output_is_single_channel() {
    let image = noise_rgb(6, 4);
    let out = apply(TransformKind::Highpass, &image, &defaults());
    assert_eq!(out.layout(), PixelLayout::Gray8);
    assert_eq!(out.dimensions(), (6, 4));
}

// ── Unsharp / highboost ──────────────────────────────────────────────

#[test]
fn unsharp_requires_rgb() {
    let gray = RasterImage::gray(vec![1, 2, 3, 4], 2, 2).unwrap();
    for kind in [TransformKind::UnsharpMask, TransformKind::Highboost] {
        match transform(kind, &gray, &defaults(), Unstoppable) {
            Err(TransformError::UnsupportedChannelLayout {
                actual: PixelLayout::Gray8,
                ..
            }) => {}
            other => panic!("{kind}: expected UnsupportedChannelLayout, got {other:?}"),
        }
    }
}

#[test]
fn unsharp_with_zero_strength_is_identity() {
    let image = noise_rgb(12, 9);
    let out = apply(
        TransformKind::UnsharpMask,
        &image,
        &defaults().with_strength(0.0),
    );
    assert_eq!(out, image);
}

#[test]
fn highboost_with_unit_amplification_is_identity() {
    let image = noise_rgb(12, 9);
    let out = apply(
        TransformKind::Highboost,
        &image,
        &defaults().with_amplification(1.0),
    );
    assert_eq!(out, image);
}

#[test]
fn sharpening_leaves_flat_image_alone() {
    let image = RasterImage::filled(15, 15, PixelLayout::Rgb8, 77).unwrap();
    for kind in [TransformKind::UnsharpMask, TransformKind::Highboost] {
        assert_eq!(apply(kind, &image, &defaults()), image, "{kind}");
    }
}

#[test]
fn sharpening_increases_step_contrast() {
    let row: Vec<u8> = (0..20)
        .flat_map(|x| if x < 10 { [60u8; 3] } else { [180u8; 3] })
        .collect();
    let pixels: Vec<u8> = row.iter().copied().cycle().take(row.len() * 5).collect();
    let image = RasterImage::rgb(pixels, 20, 5).unwrap();
    let params = defaults().with_sigma(2.0);
    for kind in [TransformKind::UnsharpMask, TransformKind::Highboost] {
        let out = apply(kind, &image, &params);
        let dark = out.pixel(9, 2).unwrap()[0];
        let bright = out.pixel(10, 2).unwrap()[0];
        assert!(dark < 60, "{kind}: dark side {dark}");
        assert!(bright > 180, "{kind}: bright side {bright}");
        // Far from the step nothing changes.
        assert_eq!(out.pixel(0, 2).unwrap(), &[60, 60, 60]);
        assert_eq!(out.pixel(19, 2).unwrap(), &[180, 180, 180]);
    }
}

/// Two mirrored ramps and a flat blue channel, 3x1.
fn mirrored_ramps() -> RasterImage {
    RasterImage::rgb(vec![40, 200, 90, 100, 100, 90, 200, 40, 90], 3, 1).unwrap()
}

#[test]
fn unsharp_mask_exact_values() {
    // 3-tap Gaussian, sigma 1: weights 0.27407, 0.45186, 0.27407.
    // Red [40, 100, 200] blurs to [56.44, 110.96, 172.59] -> [56, 111, 173].
    // 2.5 * v - 1.5 * blur: [16, 83.5, 240.5] -> [16, 84, 241].
    let params = defaults()
        .with_kernel_size(3)
        .with_sigma(1.0)
        .with_strength(1.5);
    let out = apply(TransformKind::UnsharpMask, &mirrored_ramps(), &params);
    assert_eq!(out.pixels(), &[16, 241, 90, 84, 84, 90, 241, 16, 90]);
}

#[test]
fn highboost_exact_values() {
    // Same blur as above; 2 * v - blur: [24, 89, 227].
    let params = defaults()
        .with_kernel_size(3)
        .with_sigma(1.0)
        .with_amplification(2.0);
    let out = apply(TransformKind::Highboost, &mirrored_ramps(), &params);
    assert_eq!(out.pixels(), &[24, 227, 90, 89, 89, 90, 227, 24, 90]);
}

#[test]
fn sharpening_parameters_are_validated() {
    let image = noise_rgb(4, 4);
    let cases = [
        (TransformKind::UnsharpMask, defaults().with_sigma(0.0)),
        (TransformKind::UnsharpMask, defaults().with_strength(-0.5)),
        (TransformKind::UnsharpMask, defaults().with_kernel_size(10)),
        (TransformKind::Highboost, defaults().with_amplification(0.0)),
        (TransformKind::Highboost, defaults().with_amplification(f64::NAN)),
        (TransformKind::Highboost, defaults().with_sigma(-1.0)),
    ];
    for (kind, params) in cases {
        assert!(
            matches!(
                transform(kind, &image, &params, Unstoppable),
                Err(TransformError::InvalidParameter(_))
            ),
            "{kind} accepted {params:?}"
        );
    }
}

// ── Sobel ────────────────────────────────────────────────────────────

#[test]
fn sobel_of_constant_is_zero() {
    let image = RasterImage::filled(7, 5, PixelLayout::Rgb8, 123).unwrap();
    let out = apply(TransformKind::Sobel, &image, &defaults());
    assert_eq!(out.layout(), PixelLayout::Gray8);
    assert!(out.pixels().iter().all(|&v| v == 0));
}

#[test]
fn sobel_scales_strongest_edge_to_white() {
    let row = [0u8, 0, 0, 255, 255, 255];
    let pixels: Vec<u8> = row.iter().copied().cycle().take(18).collect();
    let image = RasterImage::gray(pixels, 6, 3).unwrap();
    let out = apply(TransformKind::Sobel, &image, &defaults());
    for y in 0..3 {
        let row: Vec<u8> = (0..6).map(|x| out.pixel(x, y).unwrap()[0]).collect();
        assert_eq!(row, vec![0, 0, 255, 255, 0, 0]);
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────

#[test]
fn names_roundtrip_through_from_str() {
    for kind in TransformKind::ALL {
        assert_eq!(kind.name().parse::<TransformKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), kind.name());
    }
    assert_eq!("Laplacian".parse::<TransformKind>().unwrap(), TransformKind::Highpass);
    assert!(matches!(
        "emboss".parse::<TransformKind>(),
        Err(TransformError::InvalidParameter(_))
    ));
}

#[test]
fn transforms_never_modify_their_input() {
    let image = noise_rgb(10, 8);
    let before = image.clone();
    for kind in TransformKind::ALL {
        let _ = apply(kind, &image, &defaults());
        assert_eq!(image, before, "{kind} changed its input");
    }
}

#[test]
fn point_operator_classification() {
    let point: Vec<_> = TransformKind::ALL
        .into_iter()
        .filter(|k| k.is_point_operator())
        .collect();
    assert_eq!(
        point,
        vec![
            TransformKind::Grayscale,
            TransformKind::Negative,
            TransformKind::Threshold,
            TransformKind::Gamma
        ]
    );
}

// ── Cancellation ─────────────────────────────────────────────────────

struct StopNow;

impl Stop for StopNow {
    fn check(&self) -> Result<(), StopReason> {
        Err(StopReason::Cancelled)
    }
}

/// Allows `n` checks, then stops.
struct StopAfter(AtomicUsize);

impl Stop for StopAfter {
    fn check(&self) -> Result<(), StopReason> {
        let left = self.0.load(Ordering::Relaxed);
        if left == 0 {
            return Err(StopReason::Cancelled);
        }
        self.0.store(left - 1, Ordering::Relaxed);
        Ok(())
    }
}

#[test]
fn every_transform_honors_stop() {
    let image = noise_rgb(4, 4);
    for kind in TransformKind::ALL {
        match transform(kind, &image, &defaults(), StopNow) {
            Err(TransformError::Cancelled(StopReason::Cancelled)) => {}
            other => panic!("{kind}: expected Cancelled, got {other:?}"),
        }
    }
}

#[test]
fn stop_is_polled_between_row_blocks() {
    // The first block of rows runs, the next check cancels.
    let image = noise_rgb(8, 64);
    for kind in [TransformKind::Negative, TransformKind::Average, TransformKind::Sobel] {
        let result = transform(kind, &image, &defaults(), StopAfter(AtomicUsize::new(1)));
        assert!(
            matches!(result, Err(TransformError::Cancelled(_))),
            "{kind} ran to completion"
        );
    }
}
