// 12-bit code <-> 8-bit byte packing.
//
// Two codes share three bytes, most significant bits first:
//
//   code0 = aaaaaaaa bbbb        byte0 = aaaaaaaa
//   code1 = cccc dddddddd        byte1 = bbbbcccc
//                                byte2 = dddddddd
//
// An unpaired trailing code takes two bytes, `aaaaaaaa bbbb0000`.

use crate::error::{Malformed, Result};
use crate::lzw::{Code, MAX_CODE};

/// Number of bytes `count` packed codes occupy.
#[inline]
pub const fn packed_len(count: usize) -> usize {
    count / 2 * 3 + (count % 2) * 2
}

/// Number of codes a headerless body of `len` bytes holds.
///
/// Returns `None` for lengths no code sequence packs to.
#[inline]
pub const fn raw_code_count(len: usize) -> Option<usize> {
    match len % 3 {
        0 => Some(len / 3 * 2),
        2 => Some(len / 3 * 2 + 1),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// BitPacker
// ---------------------------------------------------------------------------

/// Serializes codes into bytes, holding back one code until its partner
/// arrives.
#[derive(Debug, Default)]
pub struct BitPacker {
    out: Vec<u8>,
    pending: Option<Code>,
    count: usize,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a packer sized for `codes` codes.
    pub fn with_capacity(codes: usize) -> Self {
        Self {
            out: Vec::with_capacity(packed_len(codes)),
            pending: None,
            count: 0,
        }
    }

    /// Append one code. Codes above 4095 are rejected.
    pub fn push(&mut self, code: Code) -> Result<()> {
        if code > MAX_CODE {
            return Err(Malformed::CodeOutOfRange {
                code: u32::from(code),
            }
            .into());
        }
        self.count += 1;

        match self.pending.take() {
            None => self.pending = Some(code),
            Some(first) => {
                self.out.push((first >> 4) as u8);
                self.out.push(((first & 0x0F) << 4 | code >> 8) as u8);
                self.out.push((code & 0xFF) as u8);
            }
        }
        Ok(())
    }

    /// Codes pushed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flush any unpaired code and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if let Some(last) = self.pending.take() {
            self.out.push((last >> 4) as u8);
            self.out.push(((last & 0x0F) << 4) as u8);
        }
        debug_assert_eq!(self.out.len(), packed_len(self.count));
        self.out
    }
}

/// Pack a code sequence into bytes.
pub fn pack(codes: &[Code]) -> Result<Vec<u8>> {
    let mut packer = BitPacker::with_capacity(codes.len());
    for &code in codes {
        packer.push(code)?;
    }
    Ok(packer.finish())
}

// ---------------------------------------------------------------------------
// BitUnpacker
// ---------------------------------------------------------------------------

/// Iterator recovering a known number of codes from a packed body.
///
/// The body length is checked up front; the pad nibble of an odd trailing
/// code is checked when that code is reached.
#[derive(Debug)]
pub struct BitUnpacker<'a> {
    data: &'a [u8],
    pos: usize,
    remaining: usize,
    /// Low code of the current three-byte group, not yet yielded.
    held: Option<Code>,
}

impl<'a> BitUnpacker<'a> {
    /// Prepare to read exactly `count` codes from `data`.
    pub fn new(data: &'a [u8], count: usize) -> Result<Self> {
        let expected = packed_len(count);
        if data.len() != expected {
            return Err(Malformed::BodyLength {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            data,
            pos: 0,
            remaining: count,
            held: None,
        })
    }

    /// Prepare to read a headerless body, inferring the code count from its
    /// length.
    pub fn raw(data: &'a [u8]) -> Result<Self> {
        let count = raw_code_count(data.len()).ok_or(Malformed::RawLength { len: data.len() })?;
        Self::new(data, count)
    }

    /// Codes not yet yielded.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn next_code(&mut self) -> Result<Code> {
        if let Some(code) = self.held.take() {
            return Ok(code);
        }

        let d = &self.data[self.pos..];
        if self.remaining >= 2 {
            let first = Code::from(d[0]) << 4 | Code::from(d[1] >> 4);
            self.held = Some(Code::from(d[1] & 0x0F) << 8 | Code::from(d[2]));
            self.pos += 3;
            Ok(first)
        } else {
            if d[1] & 0x0F != 0 {
                return Err(Malformed::NonZeroPadding.into());
            }
            self.pos += 2;
            Ok(Code::from(d[0]) << 4 | Code::from(d[1] >> 4))
        }
    }
}

impl Iterator for BitUnpacker<'_> {
    type Item = Result<Code>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.next_code();
        if result.is_ok() {
            self.remaining -= 1;
        } else {
            self.remaining = 0;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Unpack exactly `count` codes from `data`.
pub fn unpack(data: &[u8], count: usize) -> Result<Vec<Code>> {
    BitUnpacker::new(data, count)?.collect()
}

/// Unpack a headerless body, inferring the code count from its length.
pub fn unpack_raw(data: &[u8]) -> Result<Vec<Code>> {
    BitUnpacker::raw(data)?.collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
