// Variable-length integers for frame header fields.
//
// Base-128, big-endian: most-significant group first.
// Each byte has bit 7 set except the final byte.

use thiserror::Error;

/// Maximum encoded length for a 64-bit value (ceil(64/7) = 10).
pub const MAX_VARINT_LEN: usize = 10;

/// Overflow guard: if these bits are set before a shift, the next `<< 7`
/// would overflow.
const U64_OVERFLOW_MASK: u64 = 0xFE00_0000_0000_0000;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a `u64` into the tail of `buf`.
/// Returns the number of bytes written (1..=10); they occupy
/// `buf[MAX_VARINT_LEN - len..]`.
#[inline]
pub fn encode_u64(mut num: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut i = MAX_VARINT_LEN;
    loop {
        i -= 1;
        buf[i] = (num as u8 & 0x7F) | 0x80;
        num >>= 7;
        if num == 0 {
            break;
        }
    }
    buf[MAX_VARINT_LEN - 1] &= 0x7F; // clear continuation bit on last byte
    MAX_VARINT_LEN - i
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a `u64` from the front of `data`.
/// Returns `(value, bytes_consumed)`.
pub fn read_u64(data: &[u8]) -> Result<(u64, usize), VarIntError> {
    let mut val: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if val & U64_OVERFLOW_MASK != 0 {
            return Err(VarIntError::Overflow);
        }
        val = (val << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((val, i + 1));
        }
    }
    Err(VarIntError::Underflow)
}

/// Encoded byte-length of a `u64` value.
#[inline]
pub fn sizeof_u64(num: u64) -> usize {
    let bits = 64 - num.leading_zeros();
    (bits.max(1).div_ceil(7) as usize).min(MAX_VARINT_LEN)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarIntError {
    /// Not enough input bytes to complete the integer.
    #[error("truncated varint")]
    Underflow,
    /// Value would overflow the target integer type.
    #[error("varint overflow")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(num: u64) -> Vec<u8> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = encode_u64(num, &mut buf);
        buf[MAX_VARINT_LEN - len..].to_vec()
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(127), vec![0x7F]);
        assert_eq!(encoded(128), vec![0x81, 0x00]);
        assert_eq!(encoded(4096), vec![0xA0, 0x00]);
        assert_eq!(encoded(16_384), vec![0x81, 0x80, 0x00]);
    }

    #[test]
    fn sizes_match_encodings() {
        for num in [0u64, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            assert_eq!(sizeof_u64(num), encoded(num).len(), "num={num}");
        }
    }

    #[test]
    fn read_reports_consumed_length() {
        let mut data = encoded(300);
        data.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(read_u64(&data).unwrap(), (300, 2));
    }

    #[test]
    fn read_max_value() {
        let data = encoded(u64::MAX);
        assert_eq!(data.len(), MAX_VARINT_LEN);
        assert_eq!(read_u64(&data).unwrap(), (u64::MAX, MAX_VARINT_LEN));
    }

    #[test]
    fn truncated_input_underflows() {
        assert_eq!(read_u64(&[]), Err(VarIntError::Underflow));
        assert_eq!(read_u64(&[0x81, 0x80]), Err(VarIntError::Underflow));
    }

    #[test]
    fn oversized_input_overflows() {
        let data = [0xFFu8; 11];
        assert_eq!(read_u64(&data), Err(VarIntError::Overflow));
    }
}
