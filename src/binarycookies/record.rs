// Cookie record codec.
//
// Wire layout (all little-endian):
//
//   size(4) version(4) flags(4) has_port(4)
//   url_off(4) name_off(4) path_off(4) value_off(4)
//   comment_off(4) comment_url_off(4)
//   expiration(8, f64) creation(8, f64)       -- seconds since 2001-01-01 UTC
//   [port(2), only if has_port == 1]
//   string bytes, each NUL-terminated
//
// The offset words are in a fixed order but the string bytes they address
// are not: decoding reconstructs each field's span by sorting the offsets
// and pairing each with the next greater one (the last runs to `size`).
// An offset of 0 for comment/commentURL means the field is absent.
// Encoding always lays fields out back-to-back in the canonical order
// comment, commentURL, url, name, path, value.

use bitflags::bitflags;

use super::reader::Reader;
use super::{EncodeError, ParseError};

/// Fixed header length, through the creation timestamp.
pub const FIXED_HEADER_LEN: usize = 56;

bitflags! {
    /// Per-cookie flag bits.
    ///
    /// Bits 3 and 4 are seen in the wild but undocumented. They, and any
    /// other unknown bit, are carried through decode and encode verbatim
    /// rather than interpreted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CookieFlags: u32 {
        const SECURE = 1 << 0;
        const HTTP_ONLY = 1 << 2;
        const UNKNOWN_1 = 1 << 3;
        const UNKNOWN_2 = 1 << 4;
    }
}

/// One decoded cookie record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cookie {
    /// Format version, 0 or 1.
    pub version: u32,
    pub flags: CookieFlags,
    /// Server port, present only when the has-port word is 1 on disk.
    pub port: Option<u16>,
    /// Cookie domain. The wire calls this field "url".
    pub url: String,
    pub name: String,
    pub path: String,
    pub value: String,
    pub comment: Option<String>,
    pub comment_url: Option<String>,
    /// Expiration, seconds since 2001-01-01T00:00:00Z.
    pub expiration: f64,
    /// Creation, seconds since 2001-01-01T00:00:00Z.
    pub creation: f64,
}

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

// The six offset-addressed fields, in decode priority order. When two
// fields share an offset (degenerate zero-length case), each still spans
// to the next strictly greater offset, so both decode to the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Url,
    Name,
    Path,
    Value,
    Comment,
    CommentUrl,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::Url => "url",
            Field::Name => "name",
            Field::Path => "path",
            Field::Value => "value",
            Field::Comment => "comment",
            Field::CommentUrl => "commentURL",
        }
    }
}

/// Extract one NUL-terminated UTF-8 field from its `[start, end)` span.
///
/// Bytes between the terminator and the next field's offset are slack and
/// ignored; a span without a terminator means the declared sizes are
/// inconsistent.
fn read_string(buf: &[u8], field: Field, start: u32, end: u32) -> Result<String, ParseError> {
    let (start, end) = (start as usize, end as usize);
    if start >= end || end > buf.len() {
        return Err(ParseError::Truncated {
            needed: end.max(start + 1),
            available: buf.len(),
        });
    }
    let span = &buf[start..end];
    let Some(nul) = span.iter().position(|&b| b == 0) else {
        return Err(ParseError::Truncated {
            needed: end + 1,
            available: buf.len(),
        });
    };
    match std::str::from_utf8(&span[..nul]) {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => Err(ParseError::InvalidUtf8 {
            field: field.name(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

impl Cookie {
    /// Decode one record from its complete slice, including the leading
    /// size word. The slice is exactly the record's declared size when it
    /// comes from the page codec.
    pub fn decode(buf: &[u8]) -> Result<Self, ParseError> {
        let mut r = Reader::new(buf);
        let size = r.u32_le()?;
        let version = r.u32_le()?;
        let flags = CookieFlags::from_bits_retain(r.u32_le()?);
        let has_port = r.u32_le()?;

        // Offset wire order is fixed even though the string bytes are not.
        let url_off = r.u32_le()?;
        let name_off = r.u32_le()?;
        let path_off = r.u32_le()?;
        let value_off = r.u32_le()?;
        let comment_off = r.u32_le()?;
        let comment_url_off = r.u32_le()?;

        let expiration = r.f64_le()?;
        let creation = r.f64_le()?;

        let port = if has_port == 1 {
            Some(r.u16_le()?)
        } else {
            None
        };

        // Explicit (field, offset) table. Required fields always enter;
        // optional fields only with a strictly positive offset, so a zero
        // offset can never be matched even when another field happens to
        // sit at the same numeric value.
        let mut table = vec![
            (Field::Url, url_off),
            (Field::Name, name_off),
            (Field::Path, path_off),
            (Field::Value, value_off),
        ];
        if comment_off > 0 {
            table.push((Field::Comment, comment_off));
        }
        if comment_url_off > 0 {
            table.push((Field::CommentUrl, comment_url_off));
        }

        let mut bounds: Vec<u32> = table.iter().map(|&(_, off)| off).collect();
        bounds.sort_unstable();

        let mut url = String::new();
        let mut name = String::new();
        let mut path = String::new();
        let mut value = String::new();
        let mut comment = None;
        let mut comment_url = None;

        for &(field, off) in &table {
            let end = bounds.iter().copied().find(|&b| b > off).unwrap_or(size);
            let s = read_string(buf, field, off, end)?;
            match field {
                Field::Url => url = s,
                Field::Name => name = s,
                Field::Path => path = s,
                Field::Value => value = s,
                Field::Comment => comment = Some(s),
                Field::CommentUrl => comment_url = Some(s),
            }
        }

        Ok(Self {
            version,
            flags,
            port,
            url,
            name,
            path,
            value,
            comment,
            comment_url,
            expiration,
            creation,
        })
    }

    /// Present string fields in canonical wire order.
    fn present_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.comment.as_deref(),
            self.comment_url.as_deref(),
            Some(self.url.as_str()),
            Some(self.name.as_str()),
            Some(self.path.as_str()),
            Some(self.value.as_str()),
        ]
        .into_iter()
        .flatten()
    }

    /// Encoded byte length: fixed header, optional port, then every present
    /// string field with its terminator.
    pub fn encoded_len(&self) -> usize {
        let port_len = if self.port.is_some() { 2 } else { 0 };
        FIXED_HEADER_LEN
            + port_len
            + self
                .present_fields()
                .map(|s| s.len() + 1)
                .sum::<usize>()
    }

    // The wire cannot represent a string containing NUL: the terminator
    // would cut the field short on decode. Checked before emitting bytes.
    fn check_fields(&self) -> Result<(), EncodeError> {
        let fields = [
            (Field::Comment, self.comment.as_deref()),
            (Field::CommentUrl, self.comment_url.as_deref()),
            (Field::Url, Some(self.url.as_str())),
            (Field::Name, Some(self.name.as_str())),
            (Field::Path, Some(self.path.as_str())),
            (Field::Value, Some(self.value.as_str())),
        ];
        for (field, s) in fields {
            if s.is_some_and(|s| s.bytes().any(|b| b == 0)) {
                return Err(EncodeError::InteriorNul {
                    field: field.name(),
                });
            }
        }
        Ok(())
    }

    /// Encode the record, normalizing string fields to canonical order.
    /// Fails, producing no bytes, if any field contains an interior NUL.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        self.check_fields()?;
        let size = self.encoded_len();
        let mut out = Vec::with_capacity(size);

        // Running-total offsets in canonical order. Absent optional fields
        // stay at offset 0 and do not advance the total, so present fields
        // pack back to back.
        let mut next = (FIXED_HEADER_LEN + if self.port.is_some() { 2 } else { 0 }) as u32;
        let mut place = |s: Option<&str>| -> u32 {
            match s {
                Some(s) => {
                    let off = next;
                    next += s.len() as u32 + 1;
                    off
                }
                None => 0,
            }
        };
        let comment_off = place(self.comment.as_deref());
        let comment_url_off = place(self.comment_url.as_deref());
        let url_off = place(Some(&self.url));
        let name_off = place(Some(&self.name));
        let path_off = place(Some(&self.path));
        let value_off = place(Some(&self.value));

        out.extend_from_slice(&(size as u32).to_le_bytes());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.flags.bits().to_le_bytes());
        out.extend_from_slice(&u32::from(self.port.is_some()).to_le_bytes());
        out.extend_from_slice(&url_off.to_le_bytes());
        out.extend_from_slice(&name_off.to_le_bytes());
        out.extend_from_slice(&path_off.to_le_bytes());
        out.extend_from_slice(&value_off.to_le_bytes());
        out.extend_from_slice(&comment_off.to_le_bytes());
        out.extend_from_slice(&comment_url_off.to_le_bytes());
        out.extend_from_slice(&self.expiration.to_le_bytes());
        out.extend_from_slice(&self.creation.to_le_bytes());
        if let Some(port) = self.port {
            out.extend_from_slice(&port.to_le_bytes());
        }
        for s in self.present_fields() {
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        debug_assert_eq!(out.len(), size);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
