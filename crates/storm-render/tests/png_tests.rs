//! Tests for PNG export of rendered slices.

use std::io::Read;

use storm_render::png::{encode_gray16, encode_gray8};
use storm_render::render;
use test_utils::{raw_fast_config, square_axes, three_molecule_scene};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Returns (width, height, bit_depth, color_type) from the IHDR chunk.
fn read_ihdr(png: &[u8]) -> (u32, u32, u8, u8) {
    assert_eq!(&png[..8], &SIGNATURE);
    assert_eq!(&png[12..16], b"IHDR");
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (width, height, png[24], png[25])
}

/// Concatenated, inflated IDAT payload.
fn read_scanlines(png: &[u8]) -> Vec<u8> {
    let mut pos = 8;
    let mut idat = Vec::new();
    while pos < png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        if &png[pos + 4..pos + 8] == b"IDAT" {
            idat.extend_from_slice(&png[pos + 8..pos + 8 + len]);
        }
        pos += 12 + len;
    }
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(&idat[..])
        .read_to_end(&mut out)
        .unwrap();
    out
}

// ============================================================================
// Encoder
// ============================================================================

#[test]
fn test_gray8_header() {
    let png = encode_gray8(&[0; 12], 4, 3).unwrap();
    assert_eq!(read_ihdr(&png), (4, 3, 8, 0));
    assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
}

#[test]
fn test_gray16_scanlines() {
    let png = encode_gray16(&[1, 256, 65535, 0], 2, 2).unwrap();
    assert_eq!(read_ihdr(&png), (2, 2, 16, 0));
    assert_eq!(
        read_scanlines(&png),
        vec![0, 0, 1, 1, 0, 0, 255, 255, 0, 0]
    );
}

#[test]
fn test_wrong_pixel_count() {
    assert!(encode_gray8(&[0; 5], 2, 2).is_err());
    assert!(encode_gray16(&[0; 3], 2, 2).is_err());
}

// ============================================================================
// Rendered channels
// ============================================================================

#[test]
fn test_raw_channel_exports_8_bit() {
    let config = raw_fast_config(square_axes(10.0, 1.0));
    let out = render(&[three_molecule_scene()], &config).unwrap();
    let png = out.images[&0].encode_slice_png(0).unwrap();

    assert_eq!(read_ihdr(&png), (10, 10, 8, 0));
    let lines = read_scanlines(&png);
    assert_eq!(lines.len(), 10 * 11);
    // row 2, column 2 (each scanline starts with a filter byte)
    assert_eq!(lines[2 * 11 + 1 + 2], 255);
    assert_eq!(lines[2 * 11 + 1 + 3], 0);
}

#[test]
fn test_auto_contrast_channel_exports_16_bit() {
    let mut config = raw_fast_config(square_axes(6.0, 2.0));
    config.auto_contrast = true;
    let out = render(&[three_molecule_scene()], &config).unwrap();
    let png = out.images[&0].encode_slice_png(0).unwrap();
    assert_eq!(read_ihdr(&png), (12, 12, 16, 0));
    assert_eq!(read_scanlines(&png).len(), 12 * (1 + 24));
}
