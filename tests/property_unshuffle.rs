use proptest::prelude::*;

use nc1020_simplify::{unshuffle, unshuffle_pages, HALF_SIZE, PAGE_SIZE};

/// `page_counts` ページ分の任意バイト列。
fn pages(page_counts: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    page_counts.prop_flat_map(|n| prop::collection::vec(any::<u8>(), n * PAGE_SIZE))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_unshuffle_is_self_inverse(buf in pages(0..6)) {
        let once = unshuffle(&buf).unwrap();
        let twice = unshuffle(&once).unwrap();

        prop_assert_eq!(once.len(), buf.len());
        prop_assert_eq!(twice, buf);
    }

    #[test]
    fn prop_halves_are_swapped(buf in pages(1..4)) {
        let out = unshuffle(&buf).unwrap();

        for (src, dst) in buf.chunks(PAGE_SIZE).zip(out.chunks(PAGE_SIZE)) {
            prop_assert_eq!(&dst[..HALF_SIZE], &src[HALF_SIZE..]);
            prop_assert_eq!(&dst[HALF_SIZE..], &src[..HALF_SIZE]);
        }
    }

    #[test]
    fn prop_streaming_matches_buffer(buf in pages(0..4)) {
        let page_count = buf.len() / PAGE_SIZE;

        let mut streamed: Vec<u8> = vec![];
        unshuffle_pages(&buf[..], &mut streamed, page_count).unwrap();

        prop_assert_eq!(streamed, unshuffle(&buf).unwrap());
    }

    #[test]
    fn prop_missing_bytes_fail(page_count in 1usize..4, missing in 1usize..PAGE_SIZE) {
        let buf = vec![0xA5u8; page_count * PAGE_SIZE - missing];

        let mut out: Vec<u8> = vec![];
        let err = unshuffle_pages(&buf[..], &mut out, page_count).unwrap_err();

        prop_assert!(err.is_truncated_input());
        prop_assert_eq!(out.len(), (page_count - 1) * PAGE_SIZE);
    }
}
