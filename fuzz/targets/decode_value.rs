#![no_main]

use arbitrary::Arbitrary;
use graphbinary::{CodecConfig, Cursor, Reader, TypeRegistry, Writer};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    data: Vec<u8>,
    /// Exercises the depth guard at small limits too.
    max_depth: u8,
}

fuzz_target!(|input: FuzzInput| {
    let registry = TypeRegistry::global();
    let config = CodecConfig::default()
        .with_max_depth(usize::from(input.max_depth % 48) + 1)
        .with_max_prealloc(256);

    let mut reader = Reader::with_config(registry, &config);
    let mut cursor = Cursor::new(&input.data);

    // Any byte string either decodes or yields an error; it never panics.
    let Ok(value) = reader.decode(&mut cursor) else {
        return;
    };
    assert!(cursor.position() <= input.data.len());

    // Whatever was decoded must encode again, and encoding is idempotent
    // after one normalizing pass.
    let first = Writer::new(registry)
        .encode(&value)
        .unwrap_or_else(|e| panic!("re-encode failed for {value:?}: {e}"))
        .to_vec();
    let again = Reader::new(registry)
        .decode(&mut Cursor::new(&first))
        .unwrap_or_else(|e| panic!("decode of re-encoded bytes failed: {e}"));
    let second = Writer::new(registry)
        .encode(&again)
        .unwrap_or_else(|e| panic!("second encode failed: {e}"))
        .to_vec();
    assert_eq!(first, second);
});
