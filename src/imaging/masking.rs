//! Background detection on raw pixel buffers.
//!
//! The only strategy today is a brightness cut: a pixel whose mean of R, G
//! and B is at or above the threshold counts as background and becomes fully
//! transparent, every other pixel becomes fully opaque. Product shots on a
//! white sweep come out clean; anything darker is kept as-is.
//!
//! Two entry points share the scan. [`BackgroundStrategy::apply`] takes an
//! arbitrary [`RawPixels`] by value, checks its shape and hands the buffer
//! back. [`BackgroundStrategy::apply_rgba`] works on a decoded `RgbaImage`,
//! whose shape is already guaranteed, and cannot fail.

use crate::config::BackgroundSettings;
use image::RgbaImage;
use thiserror::Error;

/// Mean luma at or above which a pixel is treated as background.
pub const LUMA_THRESHOLD: u8 = 240;

/// Interleaved 8-bit pixel buffer straight out of a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPixels {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

/// A raw buffer the scan cannot work on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskingAnomaly {
    #[error("expected 4 channels, got {0}")]
    Channels(u8),
    #[error("buffer holds {actual} bytes, {expected} expected for {width}x{height}")]
    Length {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// How background pixels are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackgroundStrategy {
    /// Leave pixels untouched.
    None,
    /// Mean RGB ≥ `threshold` → alpha 0, else alpha 255.
    LumaThreshold { threshold: u8 },
}

impl BackgroundStrategy {
    /// Strategy implied by the user's background settings.
    pub fn for_settings(background: &BackgroundSettings) -> Self {
        if background.is_active() {
            BackgroundStrategy::LumaThreshold {
                threshold: LUMA_THRESHOLD,
            }
        } else {
            BackgroundStrategy::None
        }
    }

    pub fn apply(self, pixels: RawPixels) -> Result<RawPixels, MaskingAnomaly> {
        match self {
            BackgroundStrategy::None => Ok(pixels),
            BackgroundStrategy::LumaThreshold { threshold } => {
                apply_luma_threshold(pixels, threshold)
            }
        }
    }

    /// Rewrite alpha of a decoded image in place.
    pub fn apply_rgba(self, img: &mut RgbaImage) {
        match self {
            BackgroundStrategy::None => {}
            BackgroundStrategy::LumaThreshold { threshold } => threshold_alpha(img, threshold),
        }
    }
}

/// Rewrite the alpha channel of every pixel from its brightness.
///
/// Requires exactly 4 interleaved channels (RGBA). The comparison is done on
/// the channel sum so no rounding is involved: `(r + g + b) / 3 >= t` holds
/// exactly when `r + g + b >= 3 * t`.
pub fn apply_luma_threshold(
    mut pixels: RawPixels,
    threshold: u8,
) -> Result<RawPixels, MaskingAnomaly> {
    if pixels.channels != 4 {
        return Err(MaskingAnomaly::Channels(pixels.channels));
    }
    let expected = pixels.width as usize * pixels.height as usize * 4;
    if pixels.data.len() != expected {
        return Err(MaskingAnomaly::Length {
            width: pixels.width,
            height: pixels.height,
            expected,
            actual: pixels.data.len(),
        });
    }

    threshold_alpha(&mut pixels.data, threshold);
    Ok(pixels)
}

/// The scan itself, over interleaved RGBA.
fn threshold_alpha(rgba: &mut [u8], threshold: u8) {
    let cutoff = threshold as u16 * 3;
    for px in rgba.chunks_exact_mut(4) {
        let sum = px[0] as u16 + px[1] as u16 + px[2] as u16;
        px[3] = if sum >= cutoff { 0 } else { 255 };
    }
}
