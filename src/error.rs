// Error types shared by the codec, the bit packer and the frame parser.

use thiserror::Error;

use crate::lzw::Code;
use crate::pack::varint::VarIntError;

/// Errors produced by encoding, decoding, packing and unpacking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The input is not a stream this codec could have produced.
    #[error("malformed stream: {0}")]
    MalformedStream(#[from] Malformed),

    /// A code was about to be assigned past the end of the code space.
    ///
    /// The epoch reset must have fired before this point, so this is an
    /// internal defect rather than a property of the input.
    #[error("dictionary overflow: attempted to assign code {code} without an epoch reset")]
    DictionaryOverflow { code: u32 },

    /// The encoder's current match had no binding in the dictionary.
    ///
    /// The match only ever grows into bound symbols, so this is an internal
    /// defect as well.
    #[error("encoder match of {len} bytes has no dictionary binding")]
    MissingBinding { len: usize },
}

/// The specific way a stream failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("code sequence is empty")]
    EmptyStream,

    #[error("code {code} is outside the 12-bit code space")]
    CodeOutOfRange { code: u32 },

    #[error("first code {code} is not a single-byte symbol")]
    UnboundFirstCode { code: Code },

    #[error("code {code} is not bound (next assignable code is {next})")]
    UnexpectedCode { code: Code, next: Code },

    #[error("packed body is {actual} bytes, expected {expected}")]
    BodyLength { expected: usize, actual: usize },

    #[error("packed length {len} does not hold a whole number of codes")]
    RawLength { len: usize },

    #[error("trailing pad nibble is not zero")]
    NonZeroPadding,

    #[error("frame header is truncated")]
    TruncatedHeader,

    #[error("invalid frame flag bits: {bits:#04X}")]
    InvalidFlags { bits: u8 },

    #[error("invalid varint in frame header: {0}")]
    VarInt(#[from] VarIntError),

    #[error("decoded {actual} bytes, frame header declares {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("checksum mismatch: expected {expected:#010X}, got {actual:#010X}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

impl From<VarIntError> for CodecError {
    fn from(e: VarIntError) -> Self {
        Self::MalformedStream(Malformed::VarInt(e))
    }
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
