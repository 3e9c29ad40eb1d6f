#![no_main]
use libfuzzer_sys::fuzz_target;
use lzw12::lzw;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary 16-bit values straight into the decoder.
    let codes: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();

    if let Ok(bytes) = lzw::decode(&codes) {
        // Non-greedy code sequences are accepted, so compare bytes, not codes.
        let reencoded = lzw::encode(&bytes).unwrap();
        assert_eq!(lzw::decode(&reencoded).unwrap(), bytes);
    }
});
