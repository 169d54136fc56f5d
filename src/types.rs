//! Values that flow through the pipeline.
//!
//! Ownership is linear: each stage takes an [`ImageBlob`] by value and hands
//! back a new one. Nothing here is mutated after construction.

/// Default download name for archive results.
pub const ARCHIVE_FILENAME: &str = "processed_images.zip";

/// Raw image bytes plus what the uploader told us about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    /// Declared MIME type (e.g. `image/png`). Informational only; decoders
    /// sniff the real format from the bytes.
    pub mime_type: String,
    /// Filename as uploaded, extension included.
    pub filename: String,
}

impl ImageBlob {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Same name, new contents. Used by stages that re-encode.
    pub fn with_bytes(self, bytes: Vec<u8>, mime_type: &str) -> Self {
        Self {
            bytes,
            mime_type: mime_type.to_string(),
            filename: self.filename,
        }
    }
}

/// One successfully processed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResult {
    /// Exactly one input succeeded; returned as-is without archive overhead.
    Single { name: String, bytes: Vec<u8> },
    /// Zero or several successes bundled into a ZIP container.
    Archive {
        bytes: Vec<u8>,
        /// Number of entries written. Zero means every item failed.
        entries: usize,
    },
}

impl BatchResult {
    /// Suggested download filename.
    pub fn filename(&self) -> &str {
        match self {
            BatchResult::Single { name, .. } => name,
            BatchResult::Archive { .. } => ARCHIVE_FILENAME,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            BatchResult::Single { bytes, .. } | BatchResult::Archive { bytes, .. } => bytes,
        }
    }

    /// Number of processed images carried by this result.
    pub fn file_count(&self) -> usize {
        match self {
            BatchResult::Single { .. } => 1,
            BatchResult::Archive { entries, .. } => *entries,
        }
    }
}
