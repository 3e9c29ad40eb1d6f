// LZW codec with a fixed 12-bit code space.
//
// - `dictionary` — epoch-scoped symbol/code table shared by both directions
// - `encoder`    — bytes -> codes
// - `decoder`    — codes -> bytes
//
// Encoder and decoder never exchange state. They stay in lockstep because
// both assign exactly one code per emitted/received code (after the first)
// and both reset through `Dictionary::register` when code 4095 is used.

pub mod decoder;
pub mod dictionary;
pub mod encoder;

pub use decoder::{Decoder, decode};
pub use dictionary::{CodeTable, Dictionary, SymbolTable};
pub use encoder::{EncodeSummary, Encoder, encode};

/// A 12-bit LZW code, stored in the low bits of a `u16`.
pub type Code = u16;

/// A byte sequence bound to a code.
pub type Symbol = Vec<u8>;

/// Width of every code in the packed stream.
pub const CODE_BITS: u32 = 12;

/// Size of the code space; assigning code `CODE_LIMIT - 1` ends an epoch.
pub const CODE_LIMIT: Code = 1 << CODE_BITS;

/// Largest valid code.
pub const MAX_CODE: Code = CODE_LIMIT - 1;

/// First code available for multi-byte symbols in every epoch.
pub const FIRST_FREE_CODE: Code = 256;
