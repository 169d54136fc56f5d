//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, mask and encode. All of them work on in-memory byte
//! buffers; nothing touches the filesystem.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate plus `webp` for lossy WebP.

use super::params::{EncodeParams, MaskParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Implementations must be `Sync`: a single backend is shared by every
/// rayon worker in a batch.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode.
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, run the background strategy, and re-encode losslessly (PNG).
    fn mask(&self, source: &[u8], params: &MaskParams) -> Result<Vec<u8>, BackendError>;

    /// Decode, orient, resize, optionally flatten, and encode to the target format.
    fn encode(&self, source: &[u8], params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
