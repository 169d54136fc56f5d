//! Batch orchestration: many uploads in, one downloadable result out.
//!
//! Each image runs through the same per-item pipeline:
//!
//! ```text
//! ImageBlob ─► mask background ─► resize + encode ─► name ─► ProcessedFile
//! ```
//!
//! A failing item is logged and skipped; it never aborts the batch. When
//! exactly one item survives it is returned as-is, otherwise the survivors
//! (possibly none) are bundled into a ZIP archive in their original order.
//!
//! ## Parallel Processing
//!
//! Items are processed on the global rayon pool. The indexed parallel
//! iterator collects results back in source order, so parallelism never
//! changes archive layout. Progress events are sent from the worker threads
//! as items finish, in completion order.

use crate::archive;
use crate::config::ProcessingSettings;
use crate::imaging::{self, BackendError, ImageBackend, ResizePlan, RustBackend};
use crate::naming;
use crate::types::{BatchResult, ImageBlob, ProcessedFile};
use rayon::prelude::*;
use std::sync::mpsc::Sender;

/// Progress notification for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    ItemProcessed {
        /// 1-based position in the input.
        index: usize,
        source: String,
        output: String,
        bytes: usize,
    },
    ItemSkipped {
        index: usize,
        source: String,
        reason: String,
    },
}

/// Process a batch with the built-in backend.
pub fn run(images: Vec<ImageBlob>, settings: &ProcessingSettings) -> BatchResult {
    run_with_backend(&RustBackend::new(), images, settings, None)
}

/// Like [`run`], reporting per-item progress on `events`.
pub fn run_with_events(
    images: Vec<ImageBlob>,
    settings: &ProcessingSettings,
    events: Sender<BatchEvent>,
) -> BatchResult {
    run_with_backend(&RustBackend::new(), images, settings, Some(events))
}

/// Process a batch using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    images: Vec<ImageBlob>,
    settings: &ProcessingSettings,
    events: Option<Sender<BatchEvent>>,
) -> BatchResult {
    let total = images.len();
    let plan = imaging::resolve_resize_plan(&settings.resize, &settings.background);
    tracing::debug!(items = total, ?plan, format = settings.output_format.as_str(), "batch started");

    let results: Vec<Option<ProcessedFile>> = images
        .into_par_iter()
        .enumerate()
        .map(|(i, image)| {
            let index = i + 1;
            let source = image.filename.clone();
            match process_image(backend, image, settings, plan) {
                Ok(file) => {
                    tracing::debug!(index, %source, output = %file.name, "processed");
                    if let Some(tx) = &events {
                        tx.send(BatchEvent::ItemProcessed {
                            index,
                            source,
                            output: file.name.clone(),
                            bytes: file.bytes.len(),
                        })
                        .ok();
                    }
                    Some(file)
                }
                Err(e) => {
                    tracing::warn!(index, %source, error = %e, "skipping image");
                    if let Some(tx) = &events {
                        tx.send(BatchEvent::ItemSkipped {
                            index,
                            source,
                            reason: e.to_string(),
                        })
                        .ok();
                    }
                    None
                }
            }
        })
        .collect();

    let files: Vec<ProcessedFile> = results.into_iter().flatten().collect();
    tracing::info!(processed = files.len(), skipped = total - files.len(), "batch complete");
    collect_result(files)
}

/// Run one image through mask → encode → name.
pub fn process_image(
    backend: &impl ImageBackend,
    image: ImageBlob,
    settings: &ProcessingSettings,
    plan: Option<ResizePlan>,
) -> Result<ProcessedFile, BackendError> {
    let masked = imaging::mask_background(backend, image, &settings.background);
    let bytes = imaging::encode(
        backend,
        &masked,
        plan,
        settings.output_format,
        &settings.compression,
        &settings.background,
    )?;

    let naming = &settings.file_naming;
    let name = naming::build_output_filename(
        &masked.filename,
        &naming.suffix,
        settings.output_format,
        naming.to_lowercase,
        naming.replace_spaces,
    );
    Ok(ProcessedFile { name, bytes })
}

/// What a batch would do to one item, without encoding anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPreview {
    pub index: usize,
    pub source: String,
    pub output: String,
    /// Source dimensions, or why they could not be read.
    pub source_size: Result<(u32, u32), String>,
    /// Final canvas size; `None` when no resize applies or the source is unreadable.
    pub target_size: Option<(u32, u32)>,
}

/// Dry run: output names and target sizes for every item.
pub fn preview(
    backend: &impl ImageBackend,
    images: &[ImageBlob],
    settings: &ProcessingSettings,
) -> Vec<ItemPreview> {
    let plan = imaging::resolve_resize_plan(&settings.resize, &settings.background);
    let naming = &settings.file_naming;

    images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let source_size =
                imaging::get_dimensions(backend, &image.bytes).map_err(|e| e.to_string());
            let target_size = match (&source_size, plan) {
                (Ok(size), Some(plan)) => imaging::target_box(*size, plan.width, plan.height),
                _ => None,
            };
            ItemPreview {
                index: i + 1,
                source: image.filename.clone(),
                output: naming::build_output_filename(
                    &image.filename,
                    &naming.suffix,
                    settings.output_format,
                    naming.to_lowercase,
                    naming.replace_spaces,
                ),
                source_size,
                target_size,
            }
        })
        .collect()
}

/// One survivor is returned bare; anything else becomes an archive.
pub fn collect_result(files: Vec<ProcessedFile>) -> BatchResult {
    let files = match <[ProcessedFile; 1]>::try_from(files) {
        Ok([file]) => {
            return BatchResult::Single {
                name: file.name,
                bytes: file.bytes,
            };
        }
        Err(files) => files,
    };

    match archive::build_archive(&files) {
        Ok(archive) => BatchResult::Archive {
            bytes: archive.bytes,
            entries: archive.entries,
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to write archive, returning an empty one");
            BatchResult::Archive {
                bytes: archive::build_archive(&[])
                    .map(|empty| empty.bytes)
                    .unwrap_or_default(),
                entries: 0,
            }
        }
    }
}
