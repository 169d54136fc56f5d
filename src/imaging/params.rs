//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which turns user settings into concrete requests) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock)
//! without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 70). Clamped on construction.
//! - [`Replacement`]: What masked background pixels turn into.
//! - [`MaskParams`]: Strategy + replacement for the background stage.
//! - [`EncodeParams`]: Resize plan, target format, quality and optional flatten color.

use super::calculations::ResizePlan;
use super::masking::BackgroundStrategy;
use crate::config::{CompressionLevel, OutputFormat};
use image::Rgb;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality for a compression level: low 40, medium 70, high 90.
    /// Unrecognized levels get the medium value.
    pub fn for_level(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Low => Self(40),
            CompressionLevel::High => Self(90),
            CompressionLevel::Medium | CompressionLevel::Unrecognized => Self(70),
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(70)
    }
}

/// What masked background pixels become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// Keep the alpha channel.
    Transparent,
    /// Composite onto an opaque color and drop alpha.
    Solid(Rgb<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskParams {
    pub strategy: BackgroundStrategy,
    pub replacement: Replacement,
}

/// Full specification for one final encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    /// `None` keeps the source dimensions.
    pub plan: Option<ResizePlan>,
    pub format: OutputFormat,
    pub quality: Quality,
    /// Flatten transparency onto this color after resizing.
    pub flatten: Option<Rgb<u8>>,
}
