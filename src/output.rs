//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! 001 Product Photo.JPG → product-photo_web.webp (48.2 KB)
//! 002 broken.png: skipped
//!     Reason: Failed to decode image: ...
//! 003 Mug.png → mug_web.webp (31.0 KB)
//! Wrote out/processed_images.zip (2 images, 1 skipped, 79.4 KB)
//! ```
//!
//! ## Check
//!
//! ```text
//! Settings
//!     Format: webp (quality 70)
//!     Resize: 1000x1000, fit on #ffffff
//!     Background: off
//!     Naming: suffix "_web", lowercase, spaces → dashes
//!
//! Images
//! 001 Product Photo.JPG → product-photo_web.webp
//!     Size: 4000x3000 → 1000x1000
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::batch::{BatchEvent, ItemPreview};
use crate::config::{BackgroundMode, ProcessingSettings, ResizeMode};
use crate::imaging::{self, Quality};
use crate::types::BatchResult;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn format_dims((w, h): (u32, u32)) -> String {
    format!("{}x{}", w, h)
}

// ============================================================================
// Process
// ============================================================================

/// Format one progress event.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::ItemProcessed {
            index,
            source,
            output,
            bytes,
        } => vec![format!(
            "{} {} \u{2192} {} ({})",
            format_index(*index),
            source,
            output,
            format_size(*bytes)
        )],
        BatchEvent::ItemSkipped {
            index,
            source,
            reason,
        } => vec![
            format!("{} {}: skipped", format_index(*index), source),
            format!("    Reason: {}", reason),
        ],
    }
}

/// Summary line after a batch was written to `path`.
pub fn format_batch_summary(result: &BatchResult, skipped: usize, path: &Path) -> Vec<String> {
    let mut detail = vec![plural(result.file_count(), "image")];
    if skipped > 0 {
        detail.push(format!("{} skipped", skipped));
    }
    detail.push(format_size(result.bytes().len()));

    let mut lines = vec![format!("Wrote {} ({})", path.display(), detail.join(", "))];
    if result.file_count() == 0 {
        lines.push("No images could be processed; the archive is empty".to_string());
    }
    lines
}

pub fn print_batch_summary(result: &BatchResult, skipped: usize, path: &Path) {
    for line in format_batch_summary(result, skipped, path) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Describe the effective settings.
pub fn format_settings(settings: &ProcessingSettings) -> Vec<String> {
    let mut lines = vec!["Settings".to_string()];

    let quality = Quality::for_level(settings.compression.level);
    lines.push(format!(
        "    Format: {} (quality {})",
        settings.output_format.as_str(),
        quality.value()
    ));

    let resize = match imaging::resolve_resize_plan(&settings.resize, &settings.background) {
        None => "original size".to_string(),
        Some(plan) => {
            let size = match (plan.width, plan.height) {
                (Some(w), Some(h)) => format_dims((w, h)),
                (Some(w), None) => format!("width {}", w),
                (None, Some(h)) => format!("height {}", h),
                (None, None) => "source size".to_string(),
            };
            let how = match settings.resize.mode {
                ResizeMode::Fit if settings.background.is_transparent() => {
                    "fit on transparent".to_string()
                }
                ResizeMode::Fit if settings.background.is_solid() => {
                    format!("fit on {}", settings.background.color)
                }
                ResizeMode::Fit => "fit on #ffffff".to_string(),
                ResizeMode::Exact => "exact (center crop)".to_string(),
            };
            format!("{}, {}", size, how)
        }
    };
    lines.push(format!("    Resize: {}", resize));

    let background = if !settings.background.is_active() {
        "off".to_string()
    } else {
        match settings.background.mode {
            BackgroundMode::Solid => format!("remove, fill {}", settings.background.color),
            _ => "remove, keep transparent".to_string(),
        }
    };
    lines.push(format!("    Background: {}", background));

    let naming = &settings.file_naming;
    let mut rules = Vec::new();
    if !naming.suffix.is_empty() {
        rules.push(format!("suffix {:?}", naming.suffix));
    }
    if naming.to_lowercase {
        rules.push("lowercase".to_string());
    }
    if naming.replace_spaces {
        rules.push("spaces \u{2192} dashes".to_string());
    }
    if rules.is_empty() {
        rules.push("unchanged".to_string());
    }
    lines.push(format!("    Naming: {}", rules.join(", ")));

    lines
}

/// One entry per previewed item.
pub fn format_check_output(settings: &ProcessingSettings, previews: &[ItemPreview]) -> Vec<String> {
    let mut lines = format_settings(settings);
    lines.push(String::new());
    lines.push("Images".to_string());

    let mut unreadable = 0;
    for item in previews {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(item.index),
            item.source,
            item.output
        ));
        match (&item.source_size, item.target_size) {
            (Ok(size), Some(target)) => lines.push(format!(
                "    Size: {} \u{2192} {}",
                format_dims(*size),
                format_dims(target)
            )),
            (Ok(size), None) => lines.push(format!("    Size: {}", format_dims(*size))),
            (Err(reason), _) => {
                unreadable += 1;
                lines.push(format!("    Unreadable: {}", reason));
            }
        }
    }

    lines.push(String::new());
    let mut summary = plural(previews.len(), "image");
    if unreadable > 0 {
        summary.push_str(&format!(", {} unreadable (would be skipped)", unreadable));
    }
    lines.push(summary);
    lines
}

pub fn print_check_output(settings: &ProcessingSettings, previews: &[ItemPreview]) {
    for line in format_check_output(settings, previews) {
        println!("{}", line);
    }
}
