//! ZIP container for multi-image results.
//!
//! Entries are deflate-compressed and written in the order given. Names are
//! taken as-is; when two files share a name the later bytes replace the
//! earlier entry in place, so the archive never carries duplicates.

use crate::types::ProcessedFile;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An in-memory archive and how many entries it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub bytes: Vec<u8>,
    pub entries: usize,
}

/// Drop name collisions: later content wins, first position is kept.
fn dedupe(files: &[ProcessedFile]) -> Vec<(&str, &[u8])> {
    let mut entries: Vec<(&str, &[u8])> = Vec::with_capacity(files.len());
    for file in files {
        match entries.iter_mut().find(|(name, _)| *name == file.name) {
            Some(existing) => {
                tracing::warn!(name = %file.name, "duplicate archive entry, keeping the later file");
                existing.1 = &file.bytes;
            }
            None => entries.push((&file.name, &file.bytes)),
        }
    }
    entries
}

/// Bundle processed files into a ZIP archive held in memory.
pub fn build_archive(files: &[ProcessedFile]) -> Result<Archive, ArchiveError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let entries = dedupe(files);
    for (name, bytes) in &entries {
        zip.start_file(*name, options)?;
        zip.write_all(bytes)?;
    }

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(entries = entries.len(), bytes = bytes.len(), "archive written");
    Ok(Archive {
        bytes,
        entries: entries.len(),
    })
}
