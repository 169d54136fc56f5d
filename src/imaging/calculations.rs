//! Geometry: from resize settings to concrete target boxes.
//!
//! All functions here are pure and testable without any I/O or images.
//! [`resolve_resize_plan`] turns settings into a [`ResizePlan`]; the backend
//! later combines the plan with the decoded source size via [`target_box`],
//! [`calculate_contain_dimensions`] and [`calculate_fill_dimensions`].

use crate::config::{BackgroundSettings, ResizeMode, ResizePreset, ResizeSettings};
use crate::imaging::color;
use image::Rgba;

pub const WHITE_CANVAS: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const TRANSPARENT_CANVAS: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How the source is mapped onto the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPolicy {
    /// Scale to fit entirely inside the box, pad the rest with `fill`.
    Contain { fill: Rgba<u8> },
    /// Scale to cover the box, center-crop the overflow.
    Cover,
}

/// Resolved resize request.
///
/// A missing edge means "derive from the source aspect ratio".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitPolicy,
}

/// Fixed box for a named preset. `None` for [`ResizePreset::None`].
pub fn preset_dimensions(preset: ResizePreset) -> Option<(u32, u32)> {
    match preset {
        ResizePreset::None => None,
        ResizePreset::Square => Some((1000, 1000)),
        ResizePreset::FourFive => Some((1200, 1500)),
        ResizePreset::ThreeFour => Some((1200, 1600)),
        ResizePreset::Landscape => Some((1920, 1080)),
    }
}

/// Canvas color used to pad fit-mode output.
///
/// Solid background → that color; transparent background → fully
/// transparent; otherwise opaque white.
pub fn canvas_fill(background: &BackgroundSettings) -> Rgba<u8> {
    if background.is_solid() {
        let [r, g, b] = color::fill_or_white(&background.color).0;
        Rgba([r, g, b, 255])
    } else if background.is_transparent() {
        TRANSPARENT_CANVAS
    } else {
        WHITE_CANVAS
    }
}

/// Turn resize settings into a plan, or `None` to keep original dimensions.
///
/// A preset, when enabled and not `none`, overrides explicit width/height.
/// A width or height of 0 counts as unset.
///
/// # Examples
/// ```
/// # use prodshot::config::{BackgroundSettings, ResizePreset, ResizeSettings};
/// # use prodshot::imaging::resolve_resize_plan;
/// let resize = ResizeSettings { use_preset: true, preset: ResizePreset::Square, ..Default::default() };
/// let plan = resolve_resize_plan(&resize, &BackgroundSettings::default()).unwrap();
/// assert_eq!((plan.width, plan.height), (Some(1000), Some(1000)));
///
/// // Nothing requested → nothing to do
/// assert!(resolve_resize_plan(&ResizeSettings::default(), &BackgroundSettings::default()).is_none());
/// ```
pub fn resolve_resize_plan(
    resize: &ResizeSettings,
    background: &BackgroundSettings,
) -> Option<ResizePlan> {
    let (width, height) = match resize.use_preset.then(|| preset_dimensions(resize.preset)) {
        Some(Some((w, h))) => (Some(w), Some(h)),
        _ => (
            resize.width.filter(|w| *w > 0),
            resize.height.filter(|h| *h > 0),
        ),
    };
    if width.is_none() && height.is_none() {
        return None;
    }

    let fit = match resize.mode {
        ResizeMode::Fit => FitPolicy::Contain {
            fill: canvas_fill(background),
        },
        ResizeMode::Exact => FitPolicy::Cover,
    };

    Some(ResizePlan { width, height, fit })
}

/// Concrete target box for a source of the given size.
///
/// A single edge is completed from the source aspect ratio. Returns `None`
/// when the plan names neither edge, which leaves the image untouched.
pub fn target_box(source: (u32, u32), width: Option<u32>, height: Option<u32>) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    match (width, height) {
        (Some(w), Some(h)) => Some((w, h)),
        (Some(w), None) => {
            let h = (w as f64 * src_h as f64 / src_w as f64).round() as u32;
            Some((w, h.max(1)))
        }
        (None, Some(h)) => {
            let w = (h as f64 * src_w as f64 / src_h as f64).round() as u32;
            Some((w.max(1), h))
        }
        (None, None) => None,
    }
}

/// Largest size with the source aspect ratio that fits inside `target`.
///
/// One edge matches the target exactly; the other is at most the target.
pub fn calculate_contain_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale = (tgt_w as f64 / src_w as f64).min(tgt_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, tgt_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, tgt_h.max(1));
    (w, h)
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = ((h as f64 * src_aspect).round() as u32).max(tgt_w);
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = ((w as f64 / src_aspect).round() as u32).max(tgt_h);
        (w, h)
    }
}

/// Offset that centers `inner` inside `outer` along one axis.
pub fn center_offset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}
