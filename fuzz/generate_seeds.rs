#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(bpp: u8, planes: u8, xmax: u16, ymax: u16) -> Vec<u8> {
    let mut h = vec![0u8; 128];
    h[0] = 0x0A; // manufacturer
    h[1] = 5; // version
    h[2] = 1; // RLE
    h[3] = bpp;
    h[8..10].copy_from_slice(&xmax.to_le_bytes());
    h[10..12].copy_from_slice(&ymax.to_le_bytes());
    h[12..14].copy_from_slice(&72u16.to_le_bytes());
    h[14..16].copy_from_slice(&72u16.to_le_bytes());
    h[65] = planes;
    let bytes_per_line = (u16::from(bpp) * (xmax + 1)).div_ceil(8);
    h[66..68].copy_from_slice(&bytes_per_line.to_le_bytes());
    h[68..70].copy_from_slice(&1u16.to_le_bytes());
    h
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_header";
    fs::create_dir_all(dir).unwrap();

    // 8-bit indexed 4x2 with a trailing palette
    let mut indexed = header(8, 1, 3, 1);
    indexed.extend_from_slice(&[0xC8, 0x01, 0xC8, 0x02]); // two RLE rows
    indexed.push(0x0C);
    indexed.extend((0..768u32).map(|i| (i * 7 % 251) as u8));
    fs::write(format!("{dir}/indexed_4x2.pcx"), indexed).unwrap();

    // 24-bit planar 1x1, no palette
    let mut truecolor = header(8, 3, 0, 0);
    truecolor.extend_from_slice(&[0xff, 0x80, 0x00]);
    fs::write(format!("{dir}/rgb_1x1.pcx"), truecolor).unwrap();

    // 1-bit monochrome 8x1
    let mut mono = header(1, 1, 7, 0);
    mono.push(0xAA);
    fs::write(format!("{dir}/mono_8x1.pcx"), mono).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_manufacturer.bin"), b"\x0A\x05\x01\x08").unwrap();
    let mut inverted = header(8, 1, 0, 0);
    inverted[4..6].copy_from_slice(&5u16.to_le_bytes()); // xmin > xmax
    fs::write(format!("{dir}/inverted_window.bin"), inverted).unwrap();

    let dir = "fuzz/corpus/fuzz_transform";
    fs::create_dir_all(dir).unwrap();
    let mut noise = vec![7u8, 0, 128];
    let mut state: u32 = 0xDEAD_BEEF;
    for _ in 0..8 * 8 * 3 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        noise.push(state as u8);
    }
    fs::write(format!("{dir}/noise_8x8.bin"), noise).unwrap();

    println!("Generated seed corpus in fuzz/corpus/");
}
