//! Archive service: named byte buffers in, one archive buffer out.
//!
//! [`ZipArchiveWriter`] writes entries in the order given, with a fixed
//! modification time, so identical inputs produce identical archives.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),
}

/// Builds a single archive from `(filename, bytes)` entries.
pub trait ArchiveWriter: Sync {
    fn write_archive(&self, entries: &[(&str, &[u8])]) -> Result<Vec<u8>, ArchiveError>;
}

pub struct ZipArchiveWriter {
    compression: CompressionMethod,
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Store entries without compression.
    pub fn stored() -> Self {
        Self {
            compression: CompressionMethod::Stored,
        }
    }
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn write_archive(&self, entries: &[(&str, &[u8])]) -> Result<Vec<u8>, ArchiveError> {
        let mut seen = HashSet::new();
        if let Some((name, _)) = entries.iter().find(|(name, _)| !seen.insert(*name)) {
            return Err(ArchiveError::DuplicateEntry(name.to_string()));
        }

        let options = SimpleFileOptions::default()
            .compression_method(self.compression)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in entries {
            zip.start_file(*name, options)?;
            zip.write_all(bytes)?;
        }
        Ok(zip.finish()?.into_inner())
    }
}
