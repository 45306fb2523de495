// BinaryCookies container format implementation.
//
// Safari and other WebKit consumers persist cookies in a proprietary
// three-level binary container: file -> pages -> cookie records. String
// fields inside a record are offset-addressed and may appear in any order
// on disk; the file carries an advisory byte-stride checksum and a trailing
// opaque property-list blob.
//
// # Modules
//
// - `reader`   -- bounded slice reader shared by all decode levels
// - `checksum` -- advisory byte-stride checksum over encoded pages
// - `record`   -- cookie record codec (fixed header, flags, string fields)
// - `page`     -- page codec (header, offset table, packed records)
// - `file`     -- outer container codec (magic, size table, footer, metadata)

pub mod checksum;
pub mod file;
pub mod page;
pub mod record;

pub(crate) mod reader;

use thiserror::Error;

// Re-export key types for convenience.
pub use file::{BinaryCookiesFile, FILE_FOOTER, MAGIC};
pub use page::{PAGE_HEADER, Page};
pub use record::{Cookie, CookieFlags};

/// Decode error for the BinaryCookies container.
///
/// Every failure is terminal for that decode attempt; the codec never
/// returns partial results. A caller probing an unknown file should treat
/// any of these as "not a BinaryCookies file" and move on to the next
/// candidate format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not start with the `cook` magic.
    #[error("bad magic {0:02x?}, expected \"cook\"")]
    BadMagic([u8; 4]),

    /// The 8-byte file footer constant is wrong.
    #[error("bad file footer {0:#018x}")]
    BadFooter(u64),

    /// A page does not start with the page header constant.
    #[error("bad page header {0:#010x}")]
    BadPageHeader(u32),

    /// A page footer word is not zero.
    #[error("bad page footer {0:#010x}")]
    BadPageFooter(u32),

    /// A declared size exceeds the bytes actually available.
    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A string field is not valid UTF-8.
    #[error("invalid UTF-8 in {field} field")]
    InvalidUtf8 { field: &'static str },
}

/// Encode rejection.
///
/// Checked before any bytes are emitted: an encode call either produces a
/// complete container or fails with no output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A string field contains an interior NUL. NUL is the wire terminator,
    /// so such a field would silently truncate on decode.
    #[error("interior NUL in {field} field")]
    InteriorNul { field: &'static str },
}
