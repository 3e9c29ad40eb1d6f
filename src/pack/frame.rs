// Stream framing.
//
// Counted frame layout:
//   1. flags          (1 byte, `FrameFlags`)
//   2. code count     (varint)
//   3. decoded length (varint)
//   4. [adler32]      (4 bytes, big-endian, if ADLER32)
//   5. packed body    (exactly `packed_len(code count)` bytes)
//
// The raw framing is the bare packed body with no header at all. Its code
// count is recovered from the body length alone.

use std::io::{self, Write};

use bitflags::bitflags;
use log::debug;

use super::bits::packed_len;
use super::varint;
use crate::error::{Malformed, Result};

bitflags! {
    /// Frame header indicator bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameFlags: u8 {
        /// An Adler-32 of the decoded bytes follows the length fields.
        const ADLER32 = 1 << 0;
    }
}

/// How a packed code stream is wrapped on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Header with code count, decoded length and optional checksum.
    #[default]
    Counted,
    /// Bare packed body, compatible with headerless 12-bit LZW files.
    Raw,
}

// ---------------------------------------------------------------------------
// Frame header
// ---------------------------------------------------------------------------

/// Parsed counted-frame header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub flags: FrameFlags,
    /// Number of 12-bit codes in the body.
    pub code_count: u64,
    /// Length of the original, uncompressed data.
    pub decoded_len: u64,
    /// Adler-32 of the original data (if `ADLER32`).
    pub adler32: Option<u32>,
}

impl FrameHeader {
    /// Build a header for `code_count` codes decoding to `data`.
    pub fn describe(code_count: usize, data: &[u8], checksum: bool) -> Self {
        let adler32 = checksum.then(|| adler32(data));
        Self {
            flags: if checksum {
                FrameFlags::ADLER32
            } else {
                FrameFlags::empty()
            },
            code_count: code_count as u64,
            decoded_len: data.len() as u64,
            adler32,
        }
    }

    /// Encoded size of this header in bytes.
    pub fn encoded_len(&self) -> usize {
        let mut len = 1 + varint::sizeof_u64(self.code_count) + varint::sizeof_u64(self.decoded_len);
        if self.flags.contains(FrameFlags::ADLER32) {
            len += 4;
        }
        len
    }

    /// Code count as a `usize`, rejecting counts whose body could not be
    /// addressed.
    pub fn codes(&self) -> Result<usize> {
        let count = usize::try_from(self.code_count)
            .ok()
            .filter(|count| count.checked_mul(3).is_some())
            .ok_or(Malformed::VarInt(varint::VarIntError::Overflow))?;
        Ok(count)
    }

    /// Length of the packed body this header announces.
    pub fn body_len(&self) -> Result<usize> {
        Ok(packed_len(self.codes()?))
    }

    /// Append the encoded header to `out`.
    pub fn append_to(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; varint::MAX_VARINT_LEN];
        out.push(self.flags.bits());
        for num in [self.code_count, self.decoded_len] {
            let len = varint::encode_u64(num, &mut buf);
            out.extend_from_slice(&buf[varint::MAX_VARINT_LEN - len..]);
        }
        if self.flags.contains(FrameFlags::ADLER32) {
            let cksum = self.adler32.unwrap_or(0);
            out.extend_from_slice(&cksum.to_be_bytes());
        }
    }

    /// Write the header.
    pub fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.append_to(&mut buf);
        w.write_all(&buf)
    }

    /// Parse a header from the front of `data`.
    /// Returns the header and the number of bytes it occupied.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let (&bits, _) = data.split_first().ok_or(Malformed::TruncatedHeader)?;
        let flags =
            FrameFlags::from_bits(bits).ok_or(Malformed::InvalidFlags { bits })?;
        let mut pos = 1;

        let (code_count, n) = varint::read_u64(&data[pos..]).map_err(truncated)?;
        pos += n;
        let (decoded_len, n) = varint::read_u64(&data[pos..]).map_err(truncated)?;
        pos += n;

        let adler32 = if flags.contains(FrameFlags::ADLER32) {
            let bytes: [u8; 4] = data
                .get(pos..pos + 4)
                .and_then(|s| s.try_into().ok())
                .ok_or(Malformed::TruncatedHeader)?;
            pos += 4;
            Some(u32::from_be_bytes(bytes))
        } else {
            None
        };

        let header = Self {
            flags,
            code_count,
            decoded_len,
            adler32,
        };
        debug!(
            "frame: {} codes, {} decoded bytes, checksum {:?}",
            header.code_count, header.decoded_len, header.adler32
        );
        Ok((header, pos))
    }
}

fn truncated(e: varint::VarIntError) -> Malformed {
    match e {
        varint::VarIntError::Underflow => Malformed::TruncatedHeader,
        other => Malformed::VarInt(other),
    }
}

// ---------------------------------------------------------------------------
// Adler-32
// ---------------------------------------------------------------------------

/// Adler-32 of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    #[cfg(feature = "adler32")]
    {
        let mut hasher = simd_adler32::Adler32::new();
        hasher.write(data);
        hasher.finish()
    }
    #[cfg(not(feature = "adler32"))]
    {
        const MOD_ADLER: u32 = 65521;
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        for &byte in data {
            a = (a + u32::from(byte)) % MOD_ADLER;
            b = (b + a) % MOD_ADLER;
        }
        (b << 16) | a
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
