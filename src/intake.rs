//! Input collection for the command line.
//!
//! Turns file and directory arguments into an ordered list of [`ImageBlob`]s
//! and enforces the upload limits from `[limits]` before any image is
//! decoded. Explicit file arguments keep their order; directories are walked
//! recursively with entries sorted by name, and only files with a known
//! image extension are picked up from them.
//!
//! The batch pipeline itself does no validation; this is the gate.

use crate::config::LimitsConfig;
use crate::types::ImageBlob;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Too many files: {count} (maximum is {max})")]
    TooManyFiles { count: usize, max: usize },
    #[error("Total size {total} bytes exceeds the {max} byte limit")]
    TooLarge { total: u64, max: u64 },
    #[error("Unsupported file type {mime} for {}", path.display())]
    UnsupportedType { path: PathBuf, mime: String },
}

const OCTET_STREAM: &str = "application/octet-stream";

const MIME_BY_EXTENSION: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("avif", "image/avif"),
];

/// MIME type implied by a path's extension (case-insensitive).
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    MIME_BY_EXTENSION
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// Whether this build can decode the given MIME type.
///
/// HEIC/HEIF are accepted uploads but have no decoder here; they pass intake
/// and are skipped by the batch.
pub fn has_decoder(mime: &str) -> bool {
    let format = ImageFormat::from_mime_type(mime)
        .or_else(|| ImageFormat::from_extension(mime.strip_prefix("image/")?));
    format.is_some_and(|f| f.reading_enabled())
}

/// Expand arguments into an ordered list of files.
pub fn collect_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, IntakeError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && mime_for_path(entry.path()).is_some() {
                    paths.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            paths.push(input.clone());
        } else {
            return Err(IntakeError::NotFound(input.clone()));
        }
    }
    Ok(paths)
}

/// Check limits, then read every file into memory.
///
/// Nothing is read until the whole list has passed the count, type and
/// cumulative size checks.
pub fn read_images(paths: &[PathBuf], limits: &LimitsConfig) -> Result<Vec<ImageBlob>, IntakeError> {
    if paths.len() > limits.max_files {
        return Err(IntakeError::TooManyFiles {
            count: paths.len(),
            max: limits.max_files,
        });
    }

    let mut mimes = Vec::with_capacity(paths.len());
    let mut total: u64 = 0;
    for path in paths {
        let mime = mime_for_path(path).unwrap_or(OCTET_STREAM);
        if !limits.allowed_types.iter().any(|allowed| allowed == mime) {
            return Err(IntakeError::UnsupportedType {
                path: path.clone(),
                mime: mime.to_string(),
            });
        }
        if !has_decoder(mime) {
            tracing::warn!(file = %path.display(), mime, "no decoder for this type; it will be skipped");
        }
        total += std::fs::metadata(path)?.len();
        if total > limits.max_total_bytes {
            return Err(IntakeError::TooLarge {
                total,
                max: limits.max_total_bytes,
            });
        }
        mimes.push(mime);
    }

    paths
        .iter()
        .zip(mimes)
        .map(|(path, mime)| -> Result<ImageBlob, IntakeError> {
            let bytes = std::fs::read(path)?;
            let filename = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            tracing::trace!(file = %filename, bytes = bytes.len(), "read input");
            Ok(ImageBlob::new(bytes, filename, mime))
        })
        .collect()
}

/// [`collect_paths`] followed by [`read_images`].
pub fn load_inputs(inputs: &[PathBuf], limits: &LimitsConfig) -> Result<Vec<ImageBlob>, IntakeError> {
    let paths = collect_paths(inputs)?;
    read_images(&paths, limits)
}
