use bincookies::binarycookies::{BinaryCookiesFile, Cookie, CookieFlags, Page};
use bincookies::model::CookieRecord;
use proptest::prelude::*;

// NUL cannot appear inside a field: it is the wire terminator.
fn arb_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ./=_-]{0,16}"
}

fn arb_cookie() -> impl Strategy<Value = Cookie> {
    (
        (0u32..=1, any::<u32>(), proptest::option::of(any::<u16>())),
        (arb_field(), arb_field(), arb_field(), arb_field()),
        (
            proptest::option::of(arb_field()),
            proptest::option::of(arb_field()),
        ),
        (-1.0e9..1.0e9f64, -1.0e9..1.0e9f64),
    )
        .prop_map(
            |(
                (version, bits, port),
                (url, name, path, value),
                (comment, comment_url),
                (expiration, creation),
            )| Cookie {
                version,
                flags: CookieFlags::from_bits_retain(bits),
                port,
                url,
                name,
                path,
                value,
                comment,
                comment_url,
                expiration,
                creation,
            },
        )
}

proptest! {
    #[test]
    fn prop_record_roundtrip(cookie in arb_cookie()) {
        let bytes = cookie.encode().unwrap();
        prop_assert_eq!(bytes.len(), cookie.encoded_len());
        let decoded = Cookie::decode(&bytes).unwrap();
        prop_assert_eq!(decoded, cookie);
    }

    #[test]
    fn prop_file_roundtrip(
        pages in proptest::collection::vec(
            proptest::collection::vec(arb_cookie(), 0..4),
            0..4,
        ),
        metadata in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let file = BinaryCookiesFile {
            pages: pages.into_iter().map(|cookies| Page { cookies }).collect(),
            metadata,
        };
        let bytes = file.encode().unwrap();
        let decoded = BinaryCookiesFile::decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &file);
        // Re-encoding a decoded container is byte-identical.
        prop_assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn prop_size_table_matches_page_lengths(
        pages in proptest::collection::vec(
            proptest::collection::vec(arb_cookie(), 0..3),
            1..4,
        ),
    ) {
        let file = BinaryCookiesFile {
            pages: pages.into_iter().map(|cookies| Page { cookies }).collect(),
            metadata: Vec::new(),
        };
        let bytes = file.encode().unwrap();
        for (i, page) in file.pages.iter().enumerate() {
            let at = 8 + 4 * i;
            let declared = u32::from_be_bytes([
                bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3],
            ]) as usize;
            prop_assert_eq!(declared, page.encoded_len());
        }
    }

    #[test]
    fn prop_grouping_preserves_every_record(
        records in proptest::collection::vec(
            ("[a-c]\\.com", arb_field(), arb_field()).prop_map(|(domain, name, value)| {
                CookieRecord {
                    domain,
                    name,
                    value,
                    path: "/".to_string(),
                    ..CookieRecord::default()
                }
            }),
            0..12,
        ),
    ) {
        let file = BinaryCookiesFile::from_records(records.clone());
        prop_assert_eq!(file.cookie_count(), records.len());
        // One page per distinct domain.
        let mut seen = Vec::new();
        for record in &records {
            if !seen.contains(&record.domain) {
                seen.push(record.domain.clone());
            }
        }
        prop_assert_eq!(file.pages.len(), seen.len());
        // Every record survives the container roundtrip.
        let decoded = BinaryCookiesFile::decode(&file.encode().unwrap()).unwrap();
        let mut got = decoded.to_records();
        got.sort_by(|a, b| (&a.domain, &a.name, &a.value).cmp(&(&b.domain, &b.name, &b.value)));
        let mut want = records;
        want.sort_by(|a, b| (&a.domain, &a.name, &a.value).cmp(&(&b.domain, &b.name, &b.value)));
        prop_assert_eq!(got, want);
    }
}
