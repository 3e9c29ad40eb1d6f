#![no_main]
use libfuzzer_sys::fuzz_target;
use lzw12::engine::{self, DecompressOptions};
use lzw12::pack::Framing;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce errors, never panics.
    let _ = engine::decompress_all(data);

    let raw = DecompressOptions {
        framing: Framing::Raw,
        verify_checksum: false,
    };
    let _ = engine::decompress(data, &raw);
});
