// Compression engine: ties the LZW codec to the packed stream format.
//
// compress:   bytes -> Encoder -> codes -> BitPacker -> [frame header +] body
// decompress: [frame header +] body -> BitUnpacker -> codes -> Decoder -> bytes

use log::debug;

use crate::error::{Malformed, Result};
use crate::lzw::{Decoder, Encoder};
use crate::pack::bits::{BitPacker, BitUnpacker};
use crate::pack::frame::{self, FrameHeader, Framing};

/// Cap on the output buffer reserved up front from a frame header's
/// declared length.
const MAX_PREALLOC: usize = 1 << 26; // 64 MiB

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for compression.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Stream framing.
    pub framing: Framing,
    /// Store an Adler-32 of the input in the frame header (counted framing only).
    pub checksum: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            framing: Framing::Counted,
            checksum: true,
        }
    }
}

/// Configuration for decompression.
#[derive(Debug, Clone)]
pub struct DecompressOptions {
    /// Stream framing; must match the framing used to compress.
    pub framing: Framing,
    /// Verify the frame's Adler-32 when one is present.
    pub verify_checksum: bool,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self {
            framing: Framing::Counted,
            verify_checksum: true,
        }
    }
}

/// Counters from one compress or decompress run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecStats {
    /// Bytes consumed.
    pub bytes_in: u64,
    /// Bytes produced.
    pub bytes_out: u64,
    /// 12-bit codes emitted or consumed.
    pub codes: u64,
    /// Dictionary epoch resets performed.
    pub epochs: u64,
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

/// Compress `input`, appending the stream to `output`.
///
/// On error `output` is truncated back to its length before the call.
pub fn compress_into(
    input: &[u8],
    output: &mut Vec<u8>,
    opts: &CompressOptions,
) -> Result<CodecStats> {
    let start = output.len();
    compress_tail(input, output, start, opts).inspect_err(|_| output.truncate(start))
}

fn compress_tail(
    input: &[u8],
    output: &mut Vec<u8>,
    start: usize,
    opts: &CompressOptions,
) -> Result<CodecStats> {
    let mut encoder = Encoder::new();
    let mut codes = Vec::with_capacity(input.len() / 2 + 1);
    encoder.encode_into(input, &mut codes)?;
    let summary = encoder.finish(&mut codes)?;

    if opts.framing == Framing::Counted {
        FrameHeader::describe(codes.len(), input, opts.checksum).append_to(output);
    }

    let mut packer = BitPacker::with_capacity(codes.len());
    for &code in &codes {
        packer.push(code)?;
    }
    output.extend_from_slice(&packer.finish());

    let stats = CodecStats {
        bytes_in: input.len() as u64,
        bytes_out: (output.len() - start) as u64,
        codes: codes.len() as u64,
        epochs: summary.epochs,
    };
    debug!(
        "compress: {} bytes -> {} codes -> {} bytes ({:?} framing, {} epoch resets)",
        stats.bytes_in, stats.codes, stats.bytes_out, opts.framing, stats.epochs
    );
    Ok(stats)
}

/// Compress `input` into a new buffer.
pub fn compress(input: &[u8], opts: &CompressOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress_into(input, &mut output, opts)?;
    Ok(output)
}

/// Compress `input` with default options (counted framing, checksum on).
pub fn compress_all(input: &[u8]) -> Result<Vec<u8>> {
    compress(input, &CompressOptions::default())
}

// ---------------------------------------------------------------------------
// Decompression
// ---------------------------------------------------------------------------

/// Decompress `packed`, appending the original bytes to `output`.
///
/// On error `output` is truncated back to its length before the call, so no
/// partially decoded bytes are left behind.
pub fn decompress_into(
    packed: &[u8],
    output: &mut Vec<u8>,
    opts: &DecompressOptions,
) -> Result<CodecStats> {
    let start = output.len();
    decompress_tail(packed, output, start, opts).inspect_err(|_| output.truncate(start))
}

fn decompress_tail(
    packed: &[u8],
    output: &mut Vec<u8>,
    start: usize,
    opts: &DecompressOptions,
) -> Result<CodecStats> {
    let (header, unpacker) = match opts.framing {
        Framing::Counted => {
            let (header, used) = FrameHeader::decode(packed)?;
            let body = &packed[used..];
            let count = header.codes()?;
            (Some(header), BitUnpacker::new(body, count)?)
        }
        Framing::Raw => {
            let unpacker = BitUnpacker::raw(packed)?;
            if unpacker.remaining() == 0 {
                return Err(Malformed::EmptyStream.into());
            }
            (None, unpacker)
        }
    };

    if let Some(ref h) = header {
        let reserve = usize::try_from(h.decoded_len).unwrap_or(usize::MAX);
        output.reserve(reserve.min(MAX_PREALLOC));
    }

    let mut decoder = Decoder::new();
    for code in unpacker {
        decoder.push(code?, output)?;
    }
    let produced = &output[start..];

    if let Some(h) = header {
        if produced.len() as u64 != h.decoded_len {
            return Err(Malformed::LengthMismatch {
                expected: h.decoded_len,
                actual: produced.len() as u64,
            }
            .into());
        }
        if opts.verify_checksum
            && let Some(expected) = h.adler32
        {
            let actual = frame::adler32(produced);
            if actual != expected {
                return Err(Malformed::ChecksumMismatch { expected, actual }.into());
            }
        }
    }

    let stats = CodecStats {
        bytes_in: packed.len() as u64,
        bytes_out: produced.len() as u64,
        codes: decoder.codes_in(),
        epochs: decoder.epoch(),
    };
    debug!(
        "decompress: {} bytes -> {} codes -> {} bytes ({:?} framing, {} epoch resets)",
        stats.bytes_in, stats.codes, stats.bytes_out, opts.framing, stats.epochs
    );
    Ok(stats)
}

/// Decompress `packed` into a new buffer.
pub fn decompress(packed: &[u8], opts: &DecompressOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_into(packed, &mut output, opts)?;
    Ok(output)
}

/// Decompress a counted-frame stream with checksum verification.
pub fn decompress_all(packed: &[u8]) -> Result<Vec<u8>> {
    decompress(packed, &DecompressOptions::default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
