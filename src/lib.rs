//! # Prodshot
//!
//! Batch processing for product photography: take a pile of uploaded shots,
//! optionally knock out the white backdrop, fit them to a marketplace-friendly
//! canvas, re-encode, rename, and hand back one file or one ZIP.
//!
//! # Architecture: Per-Item Pipeline
//!
//! Every image goes through the same stages, independently of the others:
//!
//! ```text
//! 1. Mask      ImageBlob  →  ImageBlob (PNG)   (optional background removal)
//! 2. Encode    ImageBlob  →  bytes             (orient, resize, flatten, encode)
//! 3. Name      filename   →  output filename
//! ```
//!
//! The [`batch`] orchestrator runs items in parallel, drops the ones that
//! fail, and packages the rest. A batch never fails as a whole: the worst
//! outcome is an empty archive.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`batch`] | Orchestrator: parallel per-item pipeline, skip-on-failure, single vs. archive result |
//! | [`imaging`] | Pixel work behind the [`imaging::ImageBackend`] trait: masking, geometry, encoding |
//! | [`naming`] | Output filename derivation and ASCII-safe download names |
//! | [`archive`] | In-memory ZIP writer |
//! | [`config`] | Settings types, TOML/JSON loading, layered merge, validation, stock config |
//! | [`types`] | Values flowing through the pipeline (`ImageBlob`, `ProcessedFile`, `BatchResult`) |
//! | [`intake`] | CLI input collection and upload limits |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup for the binary |
//!
//! # Design Decisions
//!
//! ## Backend Trait
//!
//! All pixel work sits behind [`imaging::ImageBackend`]. The orchestrator and the
//! high-level operations never touch `image` types directly, so they are tested
//! against a recording mock and run in milliseconds.
//!
//! ## Luma Threshold Instead of Segmentation
//!
//! Background removal is a brightness cut: pixels at or above mean luma 240
//! become transparent. It is exact for shots on a white sweep, needs no model
//! files, and runs in a single pass over the buffer. Bright areas inside the
//! product are removed too; that is the accepted trade-off.
//!
//! ## In-Memory Only
//!
//! Inputs, intermediates, and outputs are byte buffers. Only the CLI touches
//! the filesystem, at the edges.

pub mod archive;
pub mod batch;
pub mod config;
pub mod imaging;
pub mod intake;
pub mod logging;
pub mod naming;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
