use magika::features::encoder::encode_mid;
use magika::features::{FeatureEncoder, FeatureExtractor, WindowSizes};
use proptest::prelude::*;
use std::io::Cursor;

const PAD: i32 = 256;

fn content_strategy() -> impl Strategy<Value = Vec<u8>> {
    let byte = prop_oneof![
        3 => Just(b' '),
        1 => Just(b'\n'),
        1 => Just(b'\t'),
        5 => any::<u8>(),
    ];
    (
        0usize..200,
        prop::collection::vec(byte, 0..600),
        0usize..200,
    )
        .prop_map(|(lead, body, trail)| {
            let mut content = vec![b' '; lead];
            content.extend(body);
            content.extend(std::iter::repeat_n(b'\r', trail));
            content
        })
}

fn extractor_strategy() -> impl Strategy<Value = FeatureExtractor> {
    (0usize..48, 0usize..48, 0usize..48, 1usize..64).prop_map(|(beg, mid, end, block)| {
        FeatureExtractor::new(
            FeatureEncoder::new(WindowSizes::new(beg, mid, end), PAD),
            block,
        )
    })
}

proptest! {
    #[test]
    fn streaming_and_whole_buffer_agree(content in content_strategy(),
                                        extractor in extractor_strategy()) {
        let small = extractor.extract_small(&content);
        let mut cursor = Cursor::new(&content[..]);
        let streamed = extractor
            .extract_streaming(&mut cursor, content.len() as u64)
            .unwrap();
        prop_assert_eq!(small, streamed);
    }

    #[test]
    fn windows_always_have_configured_length(content in content_strategy(),
                                             extractor in extractor_strategy()) {
        let sizes = extractor.encoder().sizes();
        let features = extractor.extract_from_bytes(&content);
        prop_assert_eq!(features.beg().len(), sizes.beg);
        prop_assert_eq!(features.mid().len(), sizes.mid);
        prop_assert_eq!(features.end().len(), sizes.end);
        prop_assert!(features.iter().all(|v| (0..=PAD).contains(&v)));
    }

    #[test]
    fn mid_padding_is_split_floor_left_ceil_right(len in 0usize..64, size in 0usize..64) {
        prop_assume!(len < size);
        let bytes: Vec<u8> = (0..len).map(|i| (i % 200) as u8).collect();
        let mid = encode_mid(&bytes, size, PAD);
        let deficit = size - len;
        let left = mid.iter().take_while(|&&v| v == PAD).count();
        let right = mid.iter().rev().take_while(|&&v| v == PAD).count();
        prop_assert_eq!(mid.len(), size);
        if len > 0 {
            prop_assert_eq!(left, deficit / 2);
            prop_assert_eq!(right, deficit - deficit / 2);
        }
    }
}
