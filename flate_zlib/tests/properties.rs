//! Property tests for the process-wide entry points.
//!
//! Each case runs through the same shared contexts, so every case after the
//! first also checks that the previous one left them reusable.
use flate_core::FlateConfig;
use flate_zlib::runtime::{compress, decompress, on_load};
use proptest::prelude::*;

fn load() {
    // idempotent; every case shares one pair of contexts
    on_load(&FlateConfig::default()).unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip_through_shared_contexts(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        dict in proptest::option::of(proptest::collection::vec(any::<u8>(), 1..1024)),
        level in proptest::option::of(-1i32..=9),
    ) {
        load();
        let compressed = compress(Some(&data), dict.as_deref(), level).unwrap().unwrap();
        let restored = decompress(Some(&compressed), dict.as_deref()).unwrap().unwrap();
        prop_assert_eq!(restored, data);
    }

    #[test]
    fn bad_level_leaves_shared_contexts_usable(
        data in proptest::collection::vec(any::<u8>(), 1..2048),
        level in prop_oneof![-1000i32..-1, 10i32..1000],
    ) {
        load();
        prop_assert!(compress(Some(&data), None, Some(level)).is_err());
        let compressed = compress(Some(&data), None, None).unwrap().unwrap();
        prop_assert_eq!(decompress(Some(&compressed), None).unwrap().unwrap(), data);
    }
}
