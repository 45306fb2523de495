// Page codec.
//
// Layout:
//
//   header (4, BE, 0x00000100)
//   cookie count M (4, LE)
//   cookie offset table (4*M, LE)
//   footer (4, LE, 0)
//   cookie records, packed back to back
//
// Decoding trusts the sequential packing: each record starts right after
// the previous record's declared size, so the offset table is never used
// to seek. Encoding recomputes the table, which therefore always matches
// the packed layout.

use super::reader::Reader;
use super::record::Cookie;
use super::{EncodeError, ParseError};

/// Page header constant (big-endian on the wire).
pub const PAGE_HEADER: u32 = 0x0000_0100;

// Header word, cookie count, and footer word.
const PAGE_FIXED_LEN: usize = 12;

/// One page of cookie records. In practice a page holds all cookies for a
/// single domain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub cookies: Vec<Cookie>,
}

impl Page {
    /// Decode a page from its complete slice, as sized by the file-level
    /// page-size table.
    pub fn decode(buf: &[u8]) -> Result<Self, ParseError> {
        let mut r = Reader::new(buf);
        let header = r.u32_be()?;
        if header != PAGE_HEADER {
            return Err(ParseError::BadPageHeader(header));
        }
        let count = r.u32_le()? as usize;

        // Skip the offset table; records are read sequentially.
        r.take(count * 4)?;

        let footer = r.u32_le()?;
        if footer != 0 {
            return Err(ParseError::BadPageFooter(footer));
        }

        let mut cookies = Vec::with_capacity(count);
        for _ in 0..count {
            let size = r.peek_u32_le()?;
            let slice = r.take(size as usize)?;
            cookies.push(Cookie::decode(slice)?);
        }
        Ok(Self { cookies })
    }

    /// Exact byte length of the encoded page.
    pub fn encoded_len(&self) -> usize {
        PAGE_FIXED_LEN
            + 4 * self.cookies.len()
            + self.cookies.iter().map(Cookie::encoded_len).sum::<usize>()
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let encoded = self
            .cookies
            .iter()
            .map(Cookie::encode)
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Vec::with_capacity(self.encoded_len());

        out.extend_from_slice(&PAGE_HEADER.to_be_bytes());
        out.extend_from_slice(&(self.cookies.len() as u32).to_le_bytes());

        // Absolute record offsets from the page start; records begin right
        // after the footer word.
        let mut offset = (PAGE_FIXED_LEN + 4 * encoded.len()) as u32;
        for rec in &encoded {
            out.extend_from_slice(&offset.to_le_bytes());
            offset += rec.len() as u32;
        }

        out.extend_from_slice(&0u32.to_le_bytes());
        for rec in &encoded {
            out.extend_from_slice(rec);
        }
        Ok(out)
    }
}
