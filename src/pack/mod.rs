// Byte-level representation of a code stream.
//
// - `bits`   — 12-bit code <-> byte packing (BitPacker / BitUnpacker)
// - `varint` — base-128 integers used by frame headers
// - `frame`  — counted frame header and the headerless raw framing

pub mod bits;
pub mod frame;
pub mod varint;

pub use bits::{BitPacker, BitUnpacker, pack, packed_len, unpack, unpack_raw};
pub use frame::{FrameFlags, FrameHeader, Framing};
