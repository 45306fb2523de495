// File-level I/O helpers around the in-memory codec.
//
// Provides `decode_file()` and `encode_file()` convenience functions that
// wrap `std::fs` reads/writes and report structural stats. The stored
// checksum is compared against the recomputed value for reporting only; a
// mismatch is logged, never an error.

use std::io;
use std::path::Path;

use log::warn;
use thiserror::Error;

use crate::binarycookies::{BinaryCookiesFile, EncodeError, ParseError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure from the file helpers: either the filesystem or the container.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `decode_file()`.
#[derive(Debug, Clone)]
pub struct DecodeStats {
    /// Input file size in bytes.
    pub input_size: u64,
    /// Number of pages in the container.
    pub pages: usize,
    /// Total cookie records across all pages.
    pub cookies: usize,
    /// Checksum stored in the file.
    pub stored_checksum: u32,
    /// Checksum recomputed from the page bytes.
    pub computed_checksum: u32,
    /// Size of the trailing metadata blob.
    pub metadata_size: usize,
}

impl DecodeStats {
    pub fn checksum_matches(&self) -> bool {
        self.stored_checksum == self.computed_checksum
    }
}

/// Statistics returned by `encode_file()`.
#[derive(Debug, Clone)]
pub struct EncodeStats {
    /// Output file size in bytes.
    pub output_size: u64,
    /// Number of pages written.
    pub pages: usize,
    /// Total cookie records written.
    pub cookies: usize,
    /// Checksum written to the file.
    pub checksum: u32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read and decode a BinaryCookies file.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<(BinaryCookiesFile, DecodeStats), FileError> {
    let data = std::fs::read(path)?;
    let file = BinaryCookiesFile::decode(&data)?;
    let (stored, computed) = BinaryCookiesFile::checksums(&data)?;
    if stored != computed {
        warn!("stored checksum {stored:#010x} does not match computed {computed:#010x}");
    }
    let stats = DecodeStats {
        input_size: data.len() as u64,
        pages: file.pages.len(),
        cookies: file.cookie_count(),
        stored_checksum: stored,
        computed_checksum: computed,
        metadata_size: file.metadata.len(),
    };
    Ok((file, stats))
}

/// Encode a container and write it to `path`.
pub fn encode_file<P: AsRef<Path>>(
    file: &BinaryCookiesFile,
    path: P,
) -> Result<EncodeStats, FileError> {
    let encoded = file.encode()?;
    std::fs::write(path, &encoded)?;
    let (checksum, _) = BinaryCookiesFile::checksums(&encoded)?;
    Ok(EncodeStats {
        output_size: encoded.len() as u64,
        pages: file.pages.len(),
        cookies: file.cookie_count(),
        checksum,
    })
}
