#![no_main]
use libfuzzer_sys::fuzz_target;
use lzw12::engine::{self, CompressOptions, DecompressOptions};
use lzw12::pack::Framing;

fuzz_target!(|data: &[u8]| {
    let packed = engine::compress_all(data).unwrap();
    let decoded = engine::decompress_all(&packed).unwrap();
    assert_eq!(decoded, data, "counted roundtrip mismatch");

    if data.is_empty() {
        return;
    }

    let packed = engine::compress(
        data,
        &CompressOptions {
            framing: Framing::Raw,
            checksum: false,
        },
    )
    .unwrap();
    let decoded = engine::decompress(
        &packed,
        &DecompressOptions {
            framing: Framing::Raw,
            verify_checksum: false,
        },
    )
    .unwrap();
    assert_eq!(decoded, data, "raw roundtrip mismatch");
});
