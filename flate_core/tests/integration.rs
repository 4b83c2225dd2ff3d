//! End-to-end tests against the flate2-backed engines.
//!
//! Every test builds its own pair of contexts and then reuses it across
//! several calls, which is the point of the design: the same compressor and
//! decompressor must keep producing correct results after successes and
//! failures alike.
use std::sync::Arc;
use std::thread;

use flate_core::{
    CodecCall, CodecOp, CodecStatus, Flate, FlateConfig, FlateError, Mode, TrailingData,
};
use flate_zlib::initialize;

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

/// Generate `len` highly compressible bytes (repeating pattern).
fn compressible_bytes(len: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    (0..len).map(|i| pattern[i % pattern.len()]).collect()
}

// ── helpers ───────────────────────────────────────────────────────────────

fn contexts() -> Flate {
    initialize(&FlateConfig::default()).unwrap()
}

fn compress(flate: &Flate, data: &[u8], dict: Option<&[u8]>, level: Option<i32>) -> Vec<u8> {
    flate.compress(Some(data), dict, level).unwrap().unwrap()
}

fn decompress(flate: &Flate, data: &[u8], dict: Option<&[u8]>) -> Vec<u8> {
    flate.decompress(Some(data), dict).unwrap().unwrap()
}

const DICT: &[u8] = b"GET /api/v1/catalog/items?category=electronics HTTP/1.1 200 OK";
const MESSAGE: &[u8] = b"GET /api/v1/catalog/items?category=electronics HTTP/1.1 404";

// ── tests ──────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_every_level() {
    let flate = contexts();
    let data = compressible_bytes(20_000);

    for level in -1..=9 {
        let compressed = compress(&flate, &data, None, Some(level));
        assert_eq!(
            decompress(&flate, &compressed, None),
            data,
            "level {level} should round-trip"
        );
    }
    let compressed = compress(&flate, &data, None, None);
    assert_eq!(decompress(&flate, &compressed, None), data);
}

#[test]
fn test_output_is_raw_deflate() {
    let flate = contexts();
    let compressed = compress(&flate, b"hello hello hello", None, None);

    // A zlib header would start with 0x78; raw output starts with a block header.
    assert_ne!(compressed[0], 0x78);
    assert_eq!(compressed[0] & 0x01, 0x01, "single final block expected");
}

#[test]
fn test_repeat_calls_are_identical() {
    let flate = contexts();
    let data = compressible_bytes(5_000);

    let first = compress(&flate, &data, Some(DICT), Some(6));
    let second = compress(&flate, &data, Some(DICT), Some(6));
    assert_eq!(first, second, "no state may leak from one call into the next");
}

#[test]
fn test_dictionary_roundtrip() {
    let flate = contexts();

    let with_dict = compress(&flate, MESSAGE, Some(DICT), None);
    let without_dict = compress(&flate, MESSAGE, None, None);
    assert!(
        with_dict.len() < without_dict.len(),
        "dictionary should help: {} vs {}",
        with_dict.len(),
        without_dict.len()
    );
    assert_eq!(decompress(&flate, &with_dict, Some(DICT)), MESSAGE);
}

#[test]
fn test_missing_or_wrong_dictionary_never_silently_succeeds() {
    let flate = contexts();
    let compressed = compress(&flate, MESSAGE, Some(DICT), None);

    match flate.decompress(Some(&compressed), None) {
        Ok(Some(out)) => assert_ne!(out, MESSAGE),
        Ok(None) => panic!("non-null input must not yield null"),
        Err(err) => assert!(!err.is_fatal()),
    }

    let wrong = b"POST /api/v2/orders HTTP/2 500 Internal Server Error ........";
    match flate.decompress(Some(&compressed), Some(wrong)) {
        Ok(Some(out)) => assert_ne!(out, MESSAGE),
        Ok(None) => panic!("non-null input must not yield null"),
        Err(err) => assert!(!err.is_fatal()),
    }

    // the right dictionary still works afterwards
    assert_eq!(decompress(&flate, &compressed, Some(DICT)), MESSAGE);
}

#[test]
fn test_null_input_propagates() {
    let flate = contexts();

    assert!(flate.compress(None, None, None).unwrap().is_none());
    assert!(flate.compress(None, Some(DICT), Some(999)).unwrap().is_none());
    assert!(flate.decompress(None, Some(DICT)).unwrap().is_none());

    let compressed = compress(&flate, b"after null", None, None);
    assert_eq!(decompress(&flate, &compressed, None), b"after null");
}

#[test]
fn test_empty_input() {
    let flate = contexts();

    let compressed = compress(&flate, b"", None, None);
    assert!(!compressed.is_empty(), "an empty stream still has a final block");
    assert_eq!(decompress(&flate, &compressed, None), b"");
}

#[test]
fn test_large_input_spans_many_chunks() {
    let flate = contexts();

    // Incompressible: compressed output is itself several transfer buffers.
    let noisy = pseudo_random_bytes(100_000, 0xDEAD_BEEF);
    let compressed = compress(&flate, &noisy, None, None);
    assert!(compressed.len() > 3 * flate_core::DEFAULT_CHUNK_SIZE);
    assert_eq!(decompress(&flate, &compressed, None), noisy);

    // Compressible: decompressed output spans several transfer buffers.
    let repetitive = compressible_bytes(100_000);
    let compressed = compress(&flate, &repetitive, None, Some(9));
    assert!(compressed.len() < repetitive.len() / 10);
    assert_eq!(decompress(&flate, &compressed, None), repetitive);
}

#[test]
fn test_tiny_transfer_buffer_still_roundtrips() {
    let config = FlateConfig {
        chunk_size: 7,
        ..FlateConfig::default()
    };
    let flate = initialize(&config).unwrap();
    let data = pseudo_random_bytes(3_000, 7);

    let compressed = compress(&flate, &data, None, Some(1));
    assert_eq!(decompress(&flate, &compressed, None), data);
}

#[test]
fn test_invalid_level_rejected_and_context_reusable() {
    let flate = contexts();

    let err = flate.compress(Some(b"payload"), None, Some(999)).unwrap_err();
    assert!(!err.is_fatal());
    match &err {
        FlateError::Codec { call, status, .. } => {
            assert_eq!(*call, CodecCall::new(Mode::Compress, CodecOp::SetParams));
            assert_eq!(*status, CodecStatus::StreamError);
        }
        other => panic!("expected codec error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("deflateParams failed: -2"), "{err}");

    let compressed = compress(&flate, b"payload", None, None);
    assert_eq!(decompress(&flate, &compressed, None), b"payload");
}

#[test]
fn test_corrupted_stream_rejected_and_context_reusable() {
    let flate = contexts();

    // BFINAL=1 with the reserved block type 0b11.
    let err = flate.decompress(Some(&[0xFF; 64]), None).unwrap_err();
    assert!(!err.is_fatal());
    match &err {
        FlateError::Codec { call, status, .. } => {
            assert_eq!(*call, CodecCall::new(Mode::Decompress, CodecOp::Step));
            assert_eq!(*status, CodecStatus::DataError);
        }
        other => panic!("expected codec error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("inflate failed: -3"), "{err}");

    let compressed = compress(&flate, b"recovered", None, None);
    assert_eq!(decompress(&flate, &compressed, None), b"recovered");
}

#[test]
fn test_truncated_stream_rejected() {
    let flate = contexts();
    let data = pseudo_random_bytes(40_000, 11);
    let compressed = compress(&flate, &data, None, None);

    let err = flate
        .decompress(Some(&compressed[..compressed.len() / 2]), None)
        .unwrap_err();
    assert!(matches!(
        err,
        FlateError::Codec {
            status: CodecStatus::BufError,
            ..
        }
    ));

    assert_eq!(decompress(&flate, &compressed, None), data);
}

#[test]
fn test_trailing_data_policy() {
    let mut stream = contexts().compress(Some(b"first member"), None, None).unwrap().unwrap();
    stream.extend_from_slice(b"junk");

    let lenient = contexts();
    assert_eq!(decompress(&lenient, &stream, None), b"first member");

    let strict = initialize(&FlateConfig {
        trailing_data: TrailingData::Reject,
        ..FlateConfig::default()
    })
    .unwrap();
    let err = strict.decompress(Some(&stream), None).unwrap_err();
    assert!(matches!(err, FlateError::TrailingData { bytes: 4 }), "{err:?}");
    assert!(!err.is_fatal());

    let clean = compress(&strict, b"second", None, None);
    assert_eq!(decompress(&strict, &clean, None), b"second");
}

#[test]
fn test_small_window_output_decodes() {
    let flate = initialize(&FlateConfig {
        window_bits: 9,
        ..FlateConfig::default()
    })
    .unwrap();
    let data = compressible_bytes(10_000);

    let compressed = compress(&flate, &data, None, None);
    assert_eq!(decompress(&contexts(), &compressed, None), data);
}

#[test]
fn test_invalid_config_is_fatal() {
    for config in [
        FlateConfig {
            window_bits: 8,
            ..FlateConfig::default()
        },
        FlateConfig {
            default_level: 12,
            ..FlateConfig::default()
        },
        FlateConfig {
            chunk_size: 0,
            ..FlateConfig::default()
        },
    ] {
        let err = initialize(&config).err().unwrap();
        assert!(err.is_fatal(), "{err}");
    }
}

#[test]
fn test_config_from_json() {
    let config: FlateConfig =
        serde_json::from_str(r#"{ "chunk_size": 4096, "trailing_data": "reject" }"#).unwrap();
    assert_eq!(config.chunk_size, 4096);
    assert_eq!(config.trailing_data, TrailingData::Reject);
    assert_eq!(config.default_level, -1);
    assert_eq!(config.window_bits, 15);

    assert!(serde_json::from_str::<FlateConfig>(r#"{ "chunk": 1 }"#).is_err());
}

#[test]
fn test_contexts_serialize_concurrent_callers() {
    let flate = Arc::new(contexts());

    let handles: Vec<_> = (0..8u64)
        .map(|seed| {
            let flate = Arc::clone(&flate);
            thread::spawn(move || {
                for round in 0..20 {
                    let data = pseudo_random_bytes(5_000 + round * 100, seed * 1000 + round as u64);
                    let level = (round % 10) as i32;
                    let compressed = compress(&flate, &data, Some(DICT), Some(level));
                    assert_eq!(decompress(&flate, &compressed, Some(DICT)), data);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn roundtrip_any_input(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            dict in proptest::option::of(proptest::collection::vec(any::<u8>(), 1..512)),
            level in -1i32..=9,
        ) {
            let flate = contexts();
            let compressed = compress(&flate, &data, dict.as_deref(), Some(level));
            prop_assert_eq!(decompress(&flate, &compressed, dict.as_deref()), data);
        }
    }
}
