//! High-level image operations.
//!
//! These functions combine settings with backend execution.
//! They take user settings, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::ResizePlan;
use super::color;
use super::masking::BackgroundStrategy;
use super::params::{EncodeParams, MaskParams, Quality, Replacement};
use crate::config::{BackgroundSettings, CompressionSettings, OutputFormat};
use crate::types::ImageBlob;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, source: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(source)?;
    Ok((dims.width, dims.height))
}

/// Mask parameters for the given background settings, or `None` when the
/// background stage is off.
pub fn plan_mask(background: &BackgroundSettings) -> Option<MaskParams> {
    if !background.is_active() {
        return None;
    }
    let replacement = if background.is_solid() {
        Replacement::Solid(color::fill_or_white(&background.color))
    } else {
        Replacement::Transparent
    };
    Some(MaskParams {
        strategy: BackgroundStrategy::for_settings(background),
        replacement,
    })
}

/// Run the background stage. Never fails.
///
/// When the stage is off the image is returned untouched. When the backend
/// cannot mask it (undecodable input, unexpected pixel layout) the failure is
/// logged and the original image passes through; the encode stage decides
/// whether the item is usable at all.
pub fn mask_background(
    backend: &impl ImageBackend,
    image: ImageBlob,
    background: &BackgroundSettings,
) -> ImageBlob {
    let Some(params) = plan_mask(background) else {
        return image;
    };

    match backend.mask(&image.bytes, &params) {
        Ok(bytes) => {
            tracing::debug!(file = %image.filename, bytes = bytes.len(), "background masked");
            image.with_bytes(bytes, "image/png")
        }
        Err(e) => {
            tracing::warn!(file = %image.filename, error = %e, "background masking failed, using source image");
            image
        }
    }
}

/// Build encode parameters. Pure; no backend involved.
///
/// Quality follows the compression level. A solid background adds a final
/// flatten so padding and any leftover alpha end up on the chosen color.
pub fn plan_encode(
    plan: Option<ResizePlan>,
    format: OutputFormat,
    compression: &CompressionSettings,
    background: &BackgroundSettings,
) -> EncodeParams {
    EncodeParams {
        plan,
        format,
        quality: Quality::for_level(compression.level),
        flatten: background
            .is_solid()
            .then(|| color::fill_or_white(&background.color)),
    }
}

/// Produce the final bytes for one image.
pub fn encode(
    backend: &impl ImageBackend,
    image: &ImageBlob,
    plan: Option<ResizePlan>,
    format: OutputFormat,
    compression: &CompressionSettings,
    background: &BackgroundSettings,
) -> Result<Vec<u8>> {
    let params = plan_encode(plan, format, compression, background);
    tracing::trace!(file = %image.filename, ?params, "encoding");
    backend.encode(&image.bytes, &params)
}
