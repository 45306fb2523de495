// Format-neutral cookie record model.
//
// `CookieRecord` is the exchange type between the binary codec and other
// cookie persistence formats. Timestamps stay as f64 seconds since the
// 2001-01-01 UTC epoch so the wire doubles round-trip exactly; `time`
// conversions are provided at the edges for callers that want calendar
// values.

use std::collections::HashMap;

use time::{Duration, OffsetDateTime};

use crate::binarycookies::record::{Cookie, CookieFlags};
use crate::binarycookies::{BinaryCookiesFile, Page};

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z.
pub const ABSOLUTE_EPOCH_OFFSET: i64 = 978_307_200;

/// One cookie, independent of any persistence format.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CookieRecord {
    pub domain: String,
    pub name: String,
    pub path: String,
    pub value: String,
    pub secure: bool,
    pub http_only: bool,
    /// Creation, seconds since the 2001 epoch.
    pub creation: f64,
    /// Expiration, seconds since the 2001 epoch.
    pub expiration: f64,
    pub comment: Option<String>,
    pub comment_url: Option<String>,
    pub port: Option<u16>,
    pub version: u32,
}

impl CookieRecord {
    /// Creation time as a calendar timestamp. Non-positive stored values
    /// carry no meaningful date and map to `None`.
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        absolute_to_datetime(self.creation)
    }

    /// Expiration time as a calendar timestamp.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        absolute_to_datetime(self.expiration)
    }
}

/// Convert 2001-epoch seconds to a timestamp.
///
/// The whole seconds and the fraction are converted separately so the
/// fraction keeps full double precision instead of being swamped by the
/// epoch offset.
pub fn absolute_to_datetime(seconds: f64) -> Option<OffsetDateTime> {
    if seconds <= 0.0 {
        return None;
    }
    let whole = seconds.floor();
    let frac = seconds - whole;
    let base = OffsetDateTime::from_unix_timestamp(whole as i64 + ABSOLUTE_EPOCH_OFFSET).ok()?;
    Some(base + Duration::seconds_f64(frac))
}

/// Convert a timestamp to 2001-epoch seconds.
pub fn datetime_to_absolute(when: OffsetDateTime) -> f64 {
    (when.unix_timestamp() - ABSOLUTE_EPOCH_OFFSET) as f64 + f64::from(when.nanosecond()) / 1e9
}

impl From<&Cookie> for CookieRecord {
    fn from(c: &Cookie) -> Self {
        Self {
            domain: c.url.clone(),
            name: c.name.clone(),
            path: c.path.clone(),
            value: c.value.clone(),
            secure: c.flags.contains(CookieFlags::SECURE),
            http_only: c.flags.contains(CookieFlags::HTTP_ONLY),
            creation: c.creation,
            expiration: c.expiration,
            comment: c.comment.clone(),
            comment_url: c.comment_url.clone(),
            port: c.port,
            version: c.version,
        }
    }
}

impl From<&CookieRecord> for Cookie {
    fn from(r: &CookieRecord) -> Self {
        let mut flags = CookieFlags::empty();
        flags.set(CookieFlags::SECURE, r.secure);
        flags.set(CookieFlags::HTTP_ONLY, r.http_only);
        Self {
            version: r.version,
            flags,
            port: r.port,
            url: r.domain.clone(),
            name: r.name.clone(),
            path: r.path.clone(),
            value: r.value.clone(),
            comment: r.comment.clone(),
            comment_url: r.comment_url.clone(),
            expiration: r.expiration,
            creation: r.creation,
        }
    }
}

impl BinaryCookiesFile {
    /// Flatten all pages into canonical records, preserving page order and
    /// within-page order.
    pub fn to_records(&self) -> Vec<CookieRecord> {
        self.pages
            .iter()
            .flat_map(|p| p.cookies.iter().map(CookieRecord::from))
            .collect()
    }

    /// Group a flat sequence of records into one page per distinct domain,
    /// in first-seen domain order, keeping within-domain insertion order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CookieRecord>,
    {
        let mut pages: Vec<Page> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in records {
            let cookie = Cookie::from(&record);
            match index.get(&record.domain) {
                Some(&i) => pages[i].cookies.push(cookie),
                None => {
                    index.insert(record.domain.clone(), pages.len());
                    pages.push(Page {
                        cookies: vec![cookie],
                    });
                }
            }
        }
        Self {
            pages,
            metadata: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(domain: &str, name: &str) -> CookieRecord {
        CookieRecord {
            domain: domain.into(),
            name: name.into(),
            path: "/".into(),
            value: "v".into(),
            ..CookieRecord::default()
        }
    }

    #[test]
    fn groups_by_domain_in_first_seen_order() {
        let file = BinaryCookiesFile::from_records(vec![
            record("b.com", "1"),
            record("a.com", "2"),
            record("b.com", "3"),
            record("c.com", "4"),
        ]);
        let domains: Vec<&str> = file
            .pages
            .iter()
            .map(|p| p.cookies[0].url.as_str())
            .collect();
        assert_eq!(domains, ["b.com", "a.com", "c.com"]);
        assert_eq!(file.pages[0].cookies.len(), 2);
        assert_eq!(file.pages[0].cookies[1].name, "3");
    }

    #[test]
    fn to_records_preserves_order() {
        let file = BinaryCookiesFile::from_records(vec![
            record("b.com", "1"),
            record("a.com", "2"),
            record("b.com", "3"),
        ]);
        let records = file.to_records();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        // b.com's page comes first and holds both of its cookies.
        assert_eq!(names, ["1", "3", "2"]);
    }

    #[test]
    fn flags_map_to_booleans_and_back() {
        let mut rec = record("a.com", "n");
        rec.secure = true;
        rec.http_only = true;
        let cookie = Cookie::from(&rec);
        assert!(cookie.flags.contains(CookieFlags::SECURE));
        assert!(cookie.flags.contains(CookieFlags::HTTP_ONLY));
        let back = CookieRecord::from(&cookie);
        assert_eq!(back, rec);
    }

    #[test]
    fn epoch_conversion() {
        // 2001-01-01T00:00:01Z is one second past the epoch.
        let t = absolute_to_datetime(1.0).unwrap();
        assert_eq!(t.year(), 2001);
        assert_eq!(t.unix_timestamp(), ABSOLUTE_EPOCH_OFFSET + 1);
        assert_eq!(datetime_to_absolute(t), 1.0);
    }

    #[test]
    fn non_positive_timestamps_have_no_date() {
        assert_eq!(absolute_to_datetime(0.0), None);
        assert_eq!(absolute_to_datetime(-5.0), None);
        assert_eq!(record("a.com", "n").created_at(), None);
    }

    #[test]
    fn fractional_seconds_survive_conversion() {
        let t = absolute_to_datetime(700_000_000.5).unwrap();
        let back = datetime_to_absolute(t);
        assert!((back - 700_000_000.5).abs() < 1e-3);
    }
}
