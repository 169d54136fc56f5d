//! Image processing on in-memory buffers.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Background mask** | luma threshold scan over RGBA, PNG intermediate |
//! | **Resize** | Lanczos3 + pad (fit) or center crop (exact) |
//! | **Encode** | JPEG / PNG / AVIF via `image`, WebP via `webp` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry (unit testable)
//! - **Masking**: Background strategies over raw pixel buffers
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining settings + backend

pub mod backend;
mod calculations;
pub mod color;
pub mod masking;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    FitPolicy, ResizePlan, calculate_contain_dimensions, calculate_fill_dimensions,
    preset_dimensions, resolve_resize_plan, target_box,
};
pub use masking::{BackgroundStrategy, LUMA_THRESHOLD};
pub use operations::{encode, get_dimensions, mask_background, plan_encode};
pub use params::{EncodeParams, MaskParams, Quality, Replacement};
pub use rust_backend::RustBackend;
