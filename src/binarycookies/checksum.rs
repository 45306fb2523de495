// Byte-stride checksum over encoded pages.
//
// Each page contributes the wrapping u32 sum of every 4th byte of its
// encoded form (positions 0, 4, 8, ...); the file checksum is the wrapping
// sum of page contributions in page order. Writers of the format emit this
// value but readers do not reject files where it disagrees, so decoding
// only recomputes it for diagnostics while encoding must reproduce it
// exactly.

/// Checksum contribution of one fully encoded page.
pub fn page_checksum(encoded_page: &[u8]) -> u32 {
    encoded_page
        .iter()
        .step_by(4)
        .fold(0u32, |sum, &b| sum.wrapping_add(u32::from(b)))
}

/// Whole-file checksum over encoded pages, in page order.
pub fn file_checksum<'a, I>(encoded_pages: I) -> u32
where
    I: IntoIterator<Item = &'a [u8]>,
{
    encoded_pages
        .into_iter()
        .fold(0u32, |sum, page| sum.wrapping_add(page_checksum(page)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_every_fourth_byte() {
        // Positions 0, 4, 8 contribute; the rest are ignored.
        let page = [10u8, 1, 2, 3, 20, 4, 5, 6, 30];
        assert_eq!(page_checksum(&page), 60);
    }

    #[test]
    fn empty_page_is_zero() {
        assert_eq!(page_checksum(&[]), 0);
    }

    #[test]
    fn short_page_counts_first_byte() {
        assert_eq!(page_checksum(&[7, 8, 9]), 7);
    }

    #[test]
    fn file_checksum_sums_pages_with_wraparound() {
        let a = [0xFF; 4];
        let b = [0xFF; 4];
        assert_eq!(file_checksum([&a[..], &b[..]]), 0x1FE);

        let big = [0xFFu8; 1]; // single byte, contribution 255
        let pages: Vec<&[u8]> = vec![&big; 3];
        assert_eq!(file_checksum(pages), 765);
    }

    #[test]
    fn deterministic() {
        let page = b"cooked bytes, arbitrary content";
        assert_eq!(page_checksum(page), page_checksum(page));
    }
}
