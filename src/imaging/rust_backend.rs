//! Pure Rust image processing backend.
//!
//! Everything works on in-memory buffers and is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image` crate, format sniffed from bytes |
//! | Auto-orient | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Background mask | [`masking`](super::masking) scan over the RGBA buffer |
//! | Resize | `resize_exact` with `Lanczos3`, then pad (contain) or crop (cover) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, alpha flattened onto white |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, best compression |
//! | Encode → WebP | `webp` crate (libwebp, lossy) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{self, FitPolicy, ResizePlan};
use super::color::WHITE;
use super::params::{EncodeParams, MaskParams, Replacement};
use crate::config::OutputFormat;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// AVIF encoder speed (1 slowest … 10 fastest).
const AVIF_SPEED: u8 = 6;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_err(e: ImageError) -> BackendError {
    BackendError::Decode(e.to_string())
}

fn encode_err(format: &'static str) -> impl Fn(ImageError) -> BackendError {
    move |e| BackendError::Encode {
        format,
        message: e.to_string(),
    }
}

fn reader(source: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Decode and apply the EXIF orientation, if any.
fn decode_oriented(source: &[u8]) -> Result<DynamicImage, BackendError> {
    let mut decoder = reader(source)?.into_decoder().map_err(decode_err)?;
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Composite RGBA over an opaque color and drop alpha.
fn flatten(img: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        let a = a as u32;
        let blend = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

fn flatten_dynamic(img: DynamicImage, background: Rgb<u8>) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgb8(flatten(&img.to_rgba8(), background))
    } else {
        img
    }
}

fn apply_plan(img: DynamicImage, plan: &ResizePlan) -> DynamicImage {
    let source = (img.width(), img.height());
    let Some(target) = calculations::target_box(source, plan.width, plan.height) else {
        return img;
    };
    match plan.fit {
        FitPolicy::Contain { fill } => contain(&img, target, fill),
        FitPolicy::Cover => cover(&img, target),
    }
}

/// Scale inside the box and center on a `fill` canvas.
fn contain(img: &DynamicImage, target: (u32, u32), fill: Rgba<u8>) -> DynamicImage {
    let (tgt_w, tgt_h) = target;
    let (w, h) = calculations::calculate_contain_dimensions((img.width(), img.height()), target);
    let resized = img.resize_exact(w, h, FilterType::Lanczos3);
    if (w, h) == target {
        return resized;
    }

    let mut canvas = RgbaImage::from_pixel(tgt_w, tgt_h, fill);
    imageops::replace(
        &mut canvas,
        &resized.to_rgba8(),
        calculations::center_offset(tgt_w, w) as i64,
        calculations::center_offset(tgt_h, h) as i64,
    );
    DynamicImage::ImageRgba8(canvas)
}

/// Scale to cover the box and center-crop the overflow.
fn cover(img: &DynamicImage, target: (u32, u32)) -> DynamicImage {
    let (tgt_w, tgt_h) = target;
    let (w, h) = calculations::calculate_fill_dimensions((img.width(), img.height()), target);
    let resized = img.resize_exact(w, h, FilterType::Lanczos3);
    resized.crop_imm(
        calculations::center_offset(w, tgt_w),
        calculations::center_offset(h, tgt_h),
        tgt_w,
        tgt_h,
    )
}

/// Normalize to 8-bit RGB(A); every encoder below accepts those.
fn to_8bit(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img.clone(),
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn encode_as(img: &DynamicImage, format: OutputFormat, quality: u32) -> Result<Vec<u8>, BackendError> {
    let img = to_8bit(img);
    let quality = quality.clamp(1, 100) as u8;
    let mut buf = Vec::new();

    match format {
        OutputFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder).map_err(encode_err("png"))?;
        }
        OutputFormat::Webp => {
            let encoder = webp::Encoder::from_image(&img).map_err(|e| BackendError::Encode {
                format: "webp",
                message: e.to_string(),
            })?;
            buf = encoder.encode(quality as f32).to_vec();
        }
        OutputFormat::Avif => {
            let encoder = AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, quality);
            img.write_with_encoder(encoder).map_err(encode_err("avif"))?;
        }
        // `original` has no codec of its own; the bytes are JPEG.
        // Leftover alpha (padding and removed backdrop alike) lands on white.
        OutputFormat::Jpg | OutputFormat::Original => {
            let rgb = DynamicImage::ImageRgb8(flatten_dynamic(img, WHITE).to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            rgb.write_with_encoder(encoder).map_err(encode_err("jpeg"))?;
        }
    }
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(source)?.into_dimensions().map_err(decode_err)?;
        Ok(Dimensions { width, height })
    }

    fn mask(&self, source: &[u8], params: &MaskParams) -> Result<Vec<u8>, BackendError> {
        // Orientation is baked in here: the PNG written below carries no EXIF.
        let mut rgba = decode_oriented(source)?.into_rgba8();
        params.strategy.apply_rgba(&mut rgba);

        let out = match params.replacement {
            Replacement::Transparent => DynamicImage::ImageRgba8(rgba),
            Replacement::Solid(color) => DynamicImage::ImageRgb8(flatten(&rgba, color)),
        };

        let mut buf = Vec::new();
        out.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(encode_err("png"))?;
        Ok(buf)
    }

    fn encode(&self, source: &[u8], params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
        let mut img = decode_oriented(source)?;
        if let Some(plan) = &params.plan {
            img = apply_plan(img, plan);
        }
        if let Some(color) = params.flatten {
            img = flatten_dynamic(img, color);
        }
        encode_as(&img, params.format, params.quality.value())
    }
}
