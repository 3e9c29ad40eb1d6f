//! lzw12: fixed-width 12-bit LZW compression in Rust.
//!
//! The crate provides:
//! - The LZW codec and its epoch-scoped dictionary (`lzw`)
//! - 12-bit code packing and stream framing (`pack`)
//! - Whole-buffer compression APIs (`engine`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use lzw12::engine::{compress_all, decompress_all};
//!
//! let input = b"TOBEORNOTTOBEORTOBEORNOT";
//! let packed = compress_all(input).unwrap();
//! let decoded = decompress_all(&packed).unwrap();
//! assert_eq!(decoded, input);
//! ```

pub mod engine;
pub mod error;
pub mod io;
pub mod lzw;
pub mod pack;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{CodecError, Malformed};
