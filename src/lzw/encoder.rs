// LZW encoder: bytes -> 12-bit codes.
//
// Keeps the longest matched prefix `w` between calls, so input can be fed
// in arbitrary slices. The dictionary resets on its own when code 4095 is
// assigned; `w` survives the reset.

use log::trace;

use super::Code;
use super::dictionary::SymbolTable;
use crate::error::{CodecError, Result};

/// Incremental LZW encoder.
///
/// # Example
/// ```
/// use lzw12::lzw::Encoder;
///
/// let mut enc = Encoder::new();
/// let mut codes = Vec::new();
/// enc.encode_into(b"AAAA", &mut codes).unwrap();
/// let summary = enc.finish(&mut codes).unwrap();
/// assert_eq!(codes, vec![65, 256, 65]);
/// assert_eq!(summary.codes_out, 3);
/// ```
/// Counters reported by [`Encoder::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub bytes_in: u64,
    pub codes_out: u64,
    /// Dictionary epoch resets performed.
    pub epochs: u64,
}

#[derive(Debug, Default)]
pub struct Encoder {
    dict: SymbolTable,
    /// Current match. Empty only before the first byte.
    w: Vec<u8>,
    bytes_in: u64,
    codes_out: u64,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one input byte, appending any completed code to `out`.
    pub fn push(&mut self, byte: u8, out: &mut Vec<Code>) -> Result<()> {
        self.bytes_in += 1;

        if self.w.is_empty() {
            self.w.push(byte);
            return Ok(());
        }

        self.w.push(byte);
        if self.dict.contains(self.w.as_slice()) {
            return Ok(());
        }

        // `w + byte` is new: emit `w`, learn `w + byte`, restart from `byte`.
        let wc = std::mem::replace(&mut self.w, vec![byte]);
        let code = self.code_of(&wc[..wc.len() - 1])?;
        out.push(code);
        self.codes_out += 1;
        self.dict.register(wc)?;
        Ok(())
    }

    /// Consume a slice of input bytes.
    pub fn encode_into(&mut self, input: &[u8], out: &mut Vec<Code>) -> Result<()> {
        for &byte in input {
            self.push(byte, out)?;
        }
        Ok(())
    }

    /// Emit the code for the pending match, if any, and end the stream.
    ///
    /// Consumes the encoder: the dictionary state it leaves behind only
    /// matches a decoder that has seen the stream so far.
    pub fn finish(mut self, out: &mut Vec<Code>) -> Result<EncodeSummary> {
        if !self.w.is_empty() {
            let w = std::mem::take(&mut self.w);
            out.push(self.code_of(&w)?);
            self.codes_out += 1;
        }

        let summary = EncodeSummary {
            bytes_in: self.bytes_in,
            codes_out: self.codes_out,
            epochs: self.dict.epoch(),
        };
        trace!(
            "lzw: encoded {} bytes into {} codes across {} epoch resets",
            summary.bytes_in, summary.codes_out, summary.epochs
        );
        Ok(summary)
    }

    fn code_of(&self, symbol: &[u8]) -> Result<Code> {
        // `w` is only ever extended into bound symbols or restarted as a
        // single byte, so a miss means the dictionary lost a binding.
        self.dict
            .lookup(symbol)
            .copied()
            .ok_or(CodecError::MissingBinding { len: symbol.len() })
    }

    /// Input bytes consumed so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Codes emitted so far.
    pub fn codes_out(&self) -> u64 {
        self.codes_out
    }

    /// Code the dictionary will assign next.
    pub fn next_code(&self) -> Code {
        self.dict.next_code()
    }

    /// Epoch resets performed so far.
    pub fn epoch(&self) -> u64 {
        self.dict.epoch()
    }

    /// Non-singleton bindings in the current epoch.
    pub fn live_bindings(&self) -> usize {
        self.dict.live_bindings()
    }
}

/// Encode `input` into a sequence of 12-bit codes.
///
/// An empty input produces an empty code sequence.
pub fn encode(input: &[u8]) -> Result<Vec<Code>> {
    let mut out = Vec::with_capacity(input.len() / 2 + 1);
    let mut enc = Encoder::new();
    enc.encode_into(input, &mut out)?;
    enc.finish(&mut out)?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lzw::dictionary::MAX_LIVE_BINDINGS;
    use crate::lzw::{FIRST_FREE_CODE, MAX_CODE};

    #[test]
    fn repeated_byte() {
        assert_eq!(encode(b"AAAA").unwrap(), vec![65, 256, 65]);
    }

    #[test]
    fn empty_input() {
        assert!(encode(b"").unwrap().is_empty());
    }

    #[test]
    fn single_zero_byte() {
        assert_eq!(encode(&[0x00]).unwrap(), vec![0]);
    }

    #[test]
    fn classic_tobeornot() {
        let codes = encode(b"TOBEORNOTTOBEORTOBEORNOT").unwrap();
        assert_eq!(
            codes,
            vec![
                84, 79, 66, 69, 79, 82, 78, 79, 84, 256, 258, 260, 265, 259, 261, 263
            ]
        );
    }

    #[test]
    fn chunked_input_matches_whole_input() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 13) as u8).collect();
        let whole = encode(&data).unwrap();

        let mut enc = Encoder::new();
        let mut chunked = Vec::new();
        for chunk in data.chunks(37) {
            enc.encode_into(chunk, &mut chunked).unwrap();
        }
        assert_eq!(enc.bytes_in(), data.len() as u64);
        let summary = enc.finish(&mut chunked).unwrap();

        assert_eq!(chunked, whole);
        assert_eq!(summary.bytes_in, data.len() as u64);
        assert_eq!(summary.codes_out, whole.len() as u64);
    }

    #[test]
    fn codes_stay_in_range_across_resets() {
        let data: Vec<u8> = (0..200_000u32)
            .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
            .collect();
        let mut enc = Encoder::new();
        let mut codes = Vec::new();
        for &b in &data {
            enc.push(b, &mut codes).unwrap();
            assert!(enc.live_bindings() < MAX_LIVE_BINDINGS);
            assert!(enc.next_code() >= FIRST_FREE_CODE);
        }
        let summary = enc.finish(&mut codes).unwrap();

        assert!(summary.epochs >= 1, "expected at least one epoch reset");
        assert!(codes.iter().all(|&c| c <= MAX_CODE));
    }

    #[test]
    fn one_insertion_per_code_after_the_first() {
        let data = b"abababababcabcabcabcd".repeat(50);
        let mut enc = Encoder::new();
        let mut codes = Vec::new();
        enc.encode_into(&data, &mut codes).unwrap();
        // The final code registers nothing, so the counter is settled here.
        let next_code = enc.next_code();
        let summary = enc.finish(&mut codes).unwrap();

        let insertions = codes.len() as u64 - 1;
        let expected_next = FIRST_FREE_CODE as u64 + insertions % MAX_LIVE_BINDINGS as u64;
        assert_eq!(u64::from(next_code), expected_next);
        assert_eq!(summary.epochs, insertions / MAX_LIVE_BINDINGS as u64);
    }

    #[test]
    fn finish_reports_counters_of_the_whole_stream() {
        let mut enc = Encoder::new();
        let mut codes = Vec::new();
        enc.encode_into(b"AAAA", &mut codes).unwrap();
        assert_eq!(codes, vec![65, 256]);

        let summary = enc.finish(&mut codes).unwrap();
        assert_eq!(codes, vec![65, 256, 65]);
        assert_eq!(
            summary,
            EncodeSummary {
                bytes_in: 4,
                codes_out: 3,
                epochs: 0
            }
        );
    }

    #[test]
    fn finish_on_empty_input_emits_nothing() {
        let mut codes = Vec::new();
        let summary = Encoder::new().finish(&mut codes).unwrap();
        assert!(codes.is_empty());
        assert_eq!(summary.codes_out, 0);
    }
}
