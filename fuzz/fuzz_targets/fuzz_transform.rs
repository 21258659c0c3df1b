#![no_main]
use libfuzzer_sys::fuzz_target;
use zenpcx::{PixelLayout, RasterImage, TransformKind, TransformParameters};

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let width = u32::from(data[0] % 24) + 1;
    let layout = if data[1] & 1 == 0 {
        PixelLayout::Rgb8
    } else {
        PixelLayout::Gray8
    };
    let params = TransformParameters::new()
        .with_threshold(i32::from(data[2]))
        .with_gamma(f64::from(data[2]) / 64.0)
        .with_kernel_size(usize::from(data[1] >> 1) % 9);

    let body = &data[3..];
    let row = width as usize * layout.bytes_per_pixel();
    let height = (body.len() / row).min(24) as u32;
    if height == 0 {
        return;
    }
    let len = row * height as usize;
    let Ok(image) = RasterImage::new(body[..len].to_vec(), width, height, layout) else {
        return;
    };

    for kind in TransformKind::ALL {
        // Errors are fine (bad kernel sizes, gray input); panics are not
        if let Ok(out) = zenpcx::transform(kind, &image, &params, enough::Unstoppable) {
            assert_eq!(out.dimensions(), image.dimensions());
        }
    }
});
