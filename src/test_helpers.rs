//! Shared test utilities for the prodshot test suite.
//!
//! Synthetic images built in memory, so no fixture files are needed.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let png = png_bytes(&DynamicImage::ImageRgb8(product_on_white(40, 30)));
//! let blob = blob("Shoe Side.png", png);
//! let decoded = decode(&blob.bytes);
//! assert_eq!(decoded.dimensions(), (40, 30));
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use crate::types::ImageBlob;

pub const DARK: Rgb<u8> = Rgb([20, 30, 40]);

// =========================================================================
// Image builders
// =========================================================================

/// White backdrop with a dark rectangle covering the middle half.
pub fn product_on_white(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let inside_x = x >= width / 4 && x < width * 3 / 4;
        let inside_y = y >= height / 4 && y < height * 3 / 4;
        if inside_x && inside_y {
            DARK
        } else {
            Rgb([255, 255, 255])
        }
    })
}

/// Dark left half, white right half. Shows which way a rotation went.
pub fn dark_left_half(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 { DARK } else { Rgb([255, 255, 255]) }
    })
}

/// Busy image that compresses poorly, for quality comparisons.
pub fn noise(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = x.wrapping_mul(7919) ^ y.wrapping_mul(104729);
        Rgb([(v % 251) as u8, (v / 7 % 241) as u8, (v / 13 % 239) as u8])
    })
}

// =========================================================================
// Encoding / decoding
// =========================================================================

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn jpeg_bytes(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img.clone())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 95))
        .unwrap();
    buf
}

/// Insert an EXIF APP1 segment carrying only an orientation tag right after SOI.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    // Big-endian TIFF header, one IFD entry: 0x0112 SHORT x1
    let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
    tiff.extend_from_slice(&[0x00, 0x01]);
    tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0x00, 0x00]);
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    let segment_len = (payload.len() + 2) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn decode(bytes: &[u8]) -> DynamicImage {
    image::load_from_memory(bytes).unwrap()
}

pub fn blob(filename: &str, bytes: Vec<u8>) -> ImageBlob {
    let mime = match filename.rsplit('.').next() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    ImageBlob::new(bytes, filename, mime)
}
