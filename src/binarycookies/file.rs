// Outer container codec.
//
// Layout:
//
//   magic "cook" (4)
//   page count N (4, BE)
//   page sizes (4*N, BE)
//   page bytes, concatenated, sizes as declared
//   checksum (4, BE)            -- written on encode, never validated on read
//   footer (8, BE, 0x071720050000004B)
//   metadata blob (remainder)   -- serialized property list, carried verbatim
//
// The on-disk checksum is advisory: consumers of the format accept files
// where it disagrees, so decode only recomputes it for a debug log line and
// re-derives it on encode.

use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::checksum;
use super::page::Page;
use super::reader::Reader;
use super::{EncodeError, ParseError};

/// File magic, no terminator.
pub const MAGIC: [u8; 4] = *b"cook";

/// File footer constant (big-endian on the wire).
pub const FILE_FOOTER: u64 = 0x0717_2005_0000_004B;

/// A complete BinaryCookies container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinaryCookiesFile {
    pub pages: Vec<Page>,
    /// Trailing property-list blob, stored and re-emitted without
    /// interpretation.
    pub metadata: Vec<u8>,
}

impl BinaryCookiesFile {
    pub fn decode(buf: &[u8]) -> Result<Self, ParseError> {
        let mut r = Reader::new(buf);

        let magic = r.take(4)?;
        if magic != MAGIC {
            return Err(ParseError::BadMagic([
                magic[0], magic[1], magic[2], magic[3],
            ]));
        }

        let count = r.u32_be()? as usize;
        // The declared count is untrusted; cap the preallocation by what
        // the remaining input could actually hold (4 bytes per size word).
        let mut sizes = Vec::with_capacity(count.min(r.remaining() / 4));
        for _ in 0..count {
            sizes.push(r.u32_be()?);
        }

        let mut pages = Vec::with_capacity(sizes.len());
        let mut computed = 0u32;
        for size in sizes {
            let slice = r.take(size as usize)?;
            computed = computed.wrapping_add(checksum::page_checksum(slice));
            pages.push(Page::decode(slice)?);
        }

        let stored = r.u32_be()?;
        if stored != computed {
            debug!("stored checksum {stored:#010x} != computed {computed:#010x}");
        }

        let footer = r.u64_be()?;
        if footer != FILE_FOOTER {
            return Err(ParseError::BadFooter(footer));
        }

        let metadata = r.rest().to_vec();
        Ok(Self { pages, metadata })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        // Pages are independent; only the size table and checksum are
        // order-dependent, and both are derived after all pages exist.
        #[cfg(feature = "parallel")]
        let encoded = self
            .pages
            .par_iter()
            .map(Page::encode)
            .collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let encoded = self
            .pages
            .iter()
            .map(Page::encode)
            .collect::<Result<Vec<_>, _>>()?;

        let total = 8
            + 4 * encoded.len()
            + encoded.iter().map(Vec::len).sum::<usize>()
            + 12
            + self.metadata.len();
        let mut out = Vec::with_capacity(total);

        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&(encoded.len() as u32).to_be_bytes());
        for page in &encoded {
            out.extend_from_slice(&(page.len() as u32).to_be_bytes());
        }
        for page in &encoded {
            out.extend_from_slice(page);
        }

        let cksum = checksum::file_checksum(encoded.iter().map(Vec::as_slice));
        out.extend_from_slice(&cksum.to_be_bytes());
        out.extend_from_slice(&FILE_FOOTER.to_be_bytes());
        out.extend_from_slice(&self.metadata);
        Ok(out)
    }

    /// Total number of cookie records across all pages.
    pub fn cookie_count(&self) -> usize {
        self.pages.iter().map(|p| p.cookies.len()).sum()
    }

    /// Read the stored checksum of an encoded container and recompute the
    /// expected value from its page bytes, without decoding any records.
    /// Returns `(stored, computed)`.
    pub fn checksums(buf: &[u8]) -> Result<(u32, u32), ParseError> {
        let mut r = Reader::new(buf);
        let magic = r.take(4)?;
        if magic != MAGIC {
            return Err(ParseError::BadMagic([
                magic[0], magic[1], magic[2], magic[3],
            ]));
        }
        let count = r.u32_be()? as usize;
        let mut sizes = Vec::with_capacity(count.min(r.remaining() / 4));
        for _ in 0..count {
            sizes.push(r.u32_be()?);
        }
        let mut computed = 0u32;
        for size in sizes {
            let slice = r.take(size as usize)?;
            computed = computed.wrapping_add(checksum::page_checksum(slice));
        }
        let stored = r.u32_be()?;
        Ok((stored, computed))
    }
}
