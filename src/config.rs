//! Processing settings.
//!
//! One [`ProcessingSettings`] value drives a whole batch: output format,
//! resize, compression, background handling, and file naming. It is read once
//! and never mutated while the batch runs.
//!
//! ## Settings File
//!
//! The CLI reads settings from a TOML file. Every key is optional; values
//! shown below are the defaults.
//!
//! ```toml
//! output_format = "jpg"       # jpg | png | webp | avif | original
//!
//! [resize]
//! use_preset = false
//! preset = "none"             # none | square | fourFive | threeFour | landscape
//! # width = 1200              # Explicit box; omit both to keep original size
//! # height = 1500
//! mode = "fit"                # fit (contain + pad) | exact (cover + crop)
//!
//! [compression]
//! level = "medium"            # low (40) | medium (70) | high (90)
//!
//! [background]
//! enabled = false
//! mode = "none"               # none | transparent | solid
//! color = "#ffffff"           # Used only when mode = "solid"
//!
//! [file_naming]
//! suffix = ""
//! to_lowercase = false
//! replace_spaces = false
//!
//! [processing]
//! max_processes = 4           # Max parallel workers (omit for auto = CPU cores)
//!
//! [limits]
//! max_files = 200
//! max_total_bytes = 1048576000
//! allowed_types = ["image/jpeg", "image/png", ...]
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## JSON Settings
//!
//! The upload form posts the same five sections as camelCase JSON
//! (`outputFormat`, `usePreset`, `fileNaming`, ...). [`load_settings_json`]
//! accepts that shape directly.

use crate::imaging::color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

// =============================================================================
// Settings value types
// =============================================================================

/// Target encoding for every output in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "jpeg")]
    Jpg,
    Png,
    Webp,
    Avif,
    /// Keep the source file's extension in the output name. The bytes are
    /// still re-encoded as JPEG.
    Original,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Original => "original",
        }
    }
}

/// Named target boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizePreset {
    #[default]
    None,
    Square,
    #[serde(alias = "four_five")]
    FourFive,
    #[serde(alias = "three_four")]
    ThreeFour,
    Landscape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Contain within the box and pad the rest of the canvas.
    #[default]
    Fit,
    /// Cover the box and center-crop the overflow.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeSettings {
    #[serde(alias = "usePreset")]
    pub use_preset: bool,
    pub preset: ResizePreset,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mode: ResizeMode,
    /// Sent by the upload form. Both modes always preserve aspect ratio, so
    /// turning this off has no effect beyond a warning at validation time.
    #[serde(alias = "keepAspectRatio")]
    pub keep_aspect_ratio: bool,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            use_preset: false,
            preset: ResizePreset::None,
            width: None,
            height: None,
            mode: ResizeMode::Fit,
            keep_aspect_ratio: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
    /// Anything else the caller sent. Maps to the medium quality.
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionSettings {
    pub level: CompressionLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    None,
    Transparent,
    Solid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundSettings {
    pub enabled: bool,
    pub mode: BackgroundMode,
    /// Hex color, consulted only when `mode = "solid"`.
    pub color: String,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: BackgroundMode::None,
            color: "#ffffff".to_string(),
        }
    }
}

impl BackgroundSettings {
    /// Whether the background stage does anything at all.
    pub fn is_active(&self) -> bool {
        self.enabled && self.mode != BackgroundMode::None
    }

    /// Whether outputs are flattened against a solid color.
    pub fn is_solid(&self) -> bool {
        self.enabled && self.mode == BackgroundMode::Solid
    }

    pub fn is_transparent(&self) -> bool {
        self.enabled && self.mode == BackgroundMode::Transparent
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileNamingSettings {
    /// Appended to the stem, before the extension.
    pub suffix: String,
    #[serde(alias = "toLowercase")]
    pub to_lowercase: bool,
    /// Collapse whitespace runs into a single `-`.
    #[serde(alias = "replaceSpaces")]
    pub replace_spaces: bool,
}

/// Everything one batch run needs to know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingSettings {
    #[serde(alias = "outputFormat")]
    pub output_format: OutputFormat,
    pub resize: ResizeSettings,
    pub compression: CompressionSettings,
    pub background: BackgroundSettings,
    #[serde(alias = "fileNaming")]
    pub file_naming: FileNamingSettings,
}

impl ProcessingSettings {
    /// Validate values that the type system cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.use_preset && self.resize.preset == ResizePreset::None {
            tracing::warn!("resize.use_preset is on but preset is \"none\"; using width/height");
        }
        if !self.resize.keep_aspect_ratio {
            tracing::warn!("resize.keep_aspect_ratio = false is ignored; fit and exact both keep it");
        }
        if self.background.mode == BackgroundMode::Solid && !self.background.color.trim().is_empty()
        {
            color::parse_hex(&self.background.color)
                .map_err(|e| ConfigError::Validation(format!("background.color: {e}")))?;
        }
        Ok(())
    }
}

// =============================================================================
// Runtime sections (CLI only)
// =============================================================================

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Upload limits enforced by the intake step before a batch starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_files: usize,
    pub max_total_bytes: u64,
    /// MIME types accepted as input.
    pub allowed_types: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_files: 200,
            max_total_bytes: 1000 * 1024 * 1024,
            allowed_types: [
                "image/jpeg",
                "image/jpg",
                "image/png",
                "image/webp",
                "image/gif",
                "image/tiff",
                "image/heic",
                "image/heif",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Full settings file: the batch settings plus runtime sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output_format: OutputFormat,
    pub resize: ResizeSettings,
    pub compression: CompressionSettings,
    pub background: BackgroundSettings,
    pub file_naming: FileNamingSettings,
    pub processing: ProcessingConfig,
    pub limits: LimitsConfig,
}

impl Config {
    /// The batch-facing part of the config.
    pub fn settings(&self) -> ProcessingSettings {
        ProcessingSettings {
            output_format: self.output_format,
            resize: self.resize.clone(),
            compression: self.compression,
            background: self.background.clone(),
            file_naming: self.file_naming.clone(),
        }
    }

    /// Replace the batch-facing part, keeping runtime sections.
    pub fn with_settings(self, settings: ProcessingSettings) -> Self {
        Self {
            output_format: settings.output_format,
            resize: settings.resize,
            compression: settings.compression,
            background: settings.background,
            file_naming: settings.file_naming,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings().validate()?;
        if self.limits.max_files == 0 {
            return Err(ConfigError::Validation(
                "limits.max_files must be at least 1".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a settings file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load settings from an optional TOML file on top of the stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Parse settings posted by the upload form (camelCase JSON).
pub fn load_settings_json(json: &str) -> Result<ProcessingSettings, ConfigError> {
    let settings: ProcessingSettings = serde_json::from_str(json)?;
    settings.validate()?;
    Ok(settings)
}

/// Returns a fully-commented stock settings file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# prodshot settings
# =================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Output encoding: "jpg", "png", "webp", "avif" or "original".
# "original" keeps the source extension in the file name; the bytes are
# re-encoded as JPEG.
output_format = "jpg"

# ---------------------------------------------------------------------------
# Resize
# ---------------------------------------------------------------------------
[resize]
# Use a named preset instead of width/height:
#   square = 1000x1000, fourFive = 1200x1500,
#   threeFour = 1200x1600, landscape = 1920x1080
use_preset = false
preset = "none"

# Explicit target box. Set one to scale by that edge alone.
# Leave both unset or 0 (and use_preset = false) to keep the original size.
# width = 1200
# height = 1500

# "fit": contain inside the box and pad the canvas.
#        Padding is the solid background color, transparent when the
#        background mode is "transparent", white otherwise.
# "exact": cover the box and center-crop the overflow.
mode = "fit"

# Accepted for compatibility with the upload form. Both modes keep aspect ratio.
keep_aspect_ratio = true

# ---------------------------------------------------------------------------
# Compression
# ---------------------------------------------------------------------------
[compression]
# "low" = quality 40, "medium" = 70, "high" = 90. PNG ignores quality.
level = "medium"

# ---------------------------------------------------------------------------
# Background
# ---------------------------------------------------------------------------
[background]
# Pixels whose mean of R, G and B is at least 240 are treated as background.
enabled = false

# "none", "transparent" (make background see-through) or
# "solid" (replace background with `color`).
mode = "none"
color = "#ffffff"

# ---------------------------------------------------------------------------
# Output file names
# ---------------------------------------------------------------------------
[file_naming]
# Appended to the name before the extension, e.g. "_web".
suffix = ""
to_lowercase = false
# Collapse runs of whitespace into "-".
replace_spaces = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Input limits
# ---------------------------------------------------------------------------
[limits]
max_files = 200
# 1000 MiB across all inputs.
max_total_bytes = 1048576000
# heic/heif are accepted but this build has no decoder for them; such files
# pass intake with a warning and are skipped during processing.
allowed_types = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/tiff",
    "image/heic",
    "image/heif",
]
"##
}
