// File-level helpers for compression/decompression.
//
// Provides `compress_file()` and `decompress_file()`, which read the whole
// input into memory, run the engine, and write the result through a
// `BufWriter`. Optionally computes SHA-256 digests of the uncompressed side
// (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;
use thiserror::Error;

use crate::engine::{self, CodecStats, CompressOptions, DecompressOptions};
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Bytes read from the input file.
    pub bytes_read: u64,
    /// Bytes written to the output file.
    pub bytes_written: u64,
    /// Number of 12-bit codes emitted.
    pub codes: u64,
    /// Dictionary epoch resets performed.
    pub epochs: u64,
    /// SHA-256 of the input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decompress_file()`.
#[derive(Debug, Clone)]
pub struct DecompressStats {
    /// Bytes read from the compressed file.
    pub bytes_read: u64,
    /// Bytes written to the output file.
    pub bytes_written: u64,
    /// Number of 12-bit codes decoded.
    pub codes: u64,
    /// Dictionary epoch resets performed.
    pub epochs: u64,
    /// SHA-256 of the reconstructed output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Codec error.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// compress_file
// ---------------------------------------------------------------------------

/// Compress `input_path` into `output_path`.
///
/// The input is read fully into memory; the output is written through a
/// `BufWriter`.
pub fn compress_file(
    input_path: &Path,
    output_path: &Path,
    opts: &CompressOptions,
) -> Result<CompressStats, IoError> {
    let input = std::fs::read(input_path)?;

    let mut packed = Vec::new();
    let stats = engine::compress_into(&input, &mut packed, opts)?;
    write_output(output_path, &packed)?;

    Ok(CompressStats {
        bytes_read: stats.bytes_in,
        bytes_written: stats.bytes_out,
        codes: stats.codes,
        epochs: stats.epochs,
        input_sha256: sha256(&input),
    })
}

// ---------------------------------------------------------------------------
// decompress_file
// ---------------------------------------------------------------------------

/// Decompress `input_path` into `output_path`.
///
/// Nothing is written if the stream fails validation.
pub fn decompress_file(
    input_path: &Path,
    output_path: &Path,
    opts: &DecompressOptions,
) -> Result<DecompressStats, IoError> {
    let packed = std::fs::read(input_path)?;

    let mut output = Vec::new();
    let stats: CodecStats = engine::decompress_into(&packed, &mut output, opts)?;
    write_output(output_path, &output)?;

    Ok(DecompressStats {
        bytes_read: stats.bytes_in,
        bytes_written: stats.bytes_out,
        codes: stats.codes,
        epochs: stats.epochs,
        output_sha256: sha256(&output),
    })
}

fn write_output(path: &Path, data: &[u8]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(BUF_SIZE, file);
    writer.write_all(data)?;
    writer.flush()
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    Some(sha2::Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::Framing;

    fn write_temp_file(name: &str, data: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("lzw12_io_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    fn cleanup_temp_files(paths: &[&Path]) {
        for p in paths {
            let _ = std::fs::remove_file(p);
        }
    }

    #[test]
    fn compress_decompress_file_roundtrip() {
        let data = b"The quick brown fox jumps over the lazy dog. The quick brown fox!";

        let input_path = write_temp_file("input.bin", data);
        let packed_path = write_temp_file("packed.lzw", b"");
        let output_path = write_temp_file("output.bin", b"");

        let c = compress_file(&input_path, &packed_path, &CompressOptions::default()).unwrap();
        assert_eq!(c.bytes_read, data.len() as u64);
        assert_eq!(
            c.bytes_written,
            std::fs::metadata(&packed_path).unwrap().len()
        );
        assert!(c.codes > 0);

        let d =
            decompress_file(&packed_path, &output_path, &DecompressOptions::default()).unwrap();
        assert_eq!(d.bytes_read, c.bytes_written);
        assert_eq!(d.bytes_written, data.len() as u64);
        assert_eq!(d.codes, c.codes);

        assert_eq!(std::fs::read(&output_path).unwrap(), data);

        cleanup_temp_files(&[&input_path, &packed_path, &output_path]);
    }

    #[test]
    fn raw_framing_file_roundtrip() {
        let data = b"abababababababababab";
        let input_path = write_temp_file("raw_input.bin", data);
        let packed_path = write_temp_file("raw_packed.lzw", b"");
        let output_path = write_temp_file("raw_output.bin", b"");

        let copts = CompressOptions {
            framing: Framing::Raw,
            checksum: false,
        };
        let dopts = DecompressOptions {
            framing: Framing::Raw,
            verify_checksum: false,
        };
        compress_file(&input_path, &packed_path, &copts).unwrap();
        decompress_file(&packed_path, &output_path, &dopts).unwrap();
        assert_eq!(std::fs::read(&output_path).unwrap(), data);

        cleanup_temp_files(&[&input_path, &packed_path, &output_path]);
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = std::env::temp_dir().join("lzw12_io_test");
        let err = compress_file(
            &dir.join("does-not-exist.bin"),
            &dir.join("never-written.lzw"),
            &CompressOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }

    #[test]
    fn malformed_input_is_codec_error() {
        let packed_path = write_temp_file("garbage.lzw", &[0xFF, 0x00, 0x00]);
        let output_path = std::env::temp_dir()
            .join("lzw12_io_test")
            .join("garbage_out.bin");

        let err = decompress_file(&packed_path, &output_path, &DecompressOptions::default())
            .unwrap_err();
        assert!(matches!(err, IoError::Codec(CodecError::MalformedStream(_))));
        assert!(!output_path.exists());

        cleanup_temp_files(&[&packed_path]);
    }

    #[cfg(feature = "file-io")]
    #[test]
    fn sha256_digests_match() {
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let input_path = write_temp_file("sha_input.bin", &data);
        let packed_path = write_temp_file("sha_packed.lzw", b"");
        let output_path = write_temp_file("sha_output.bin", b"");

        let c = compress_file(&input_path, &packed_path, &CompressOptions::default()).unwrap();
        let d =
            decompress_file(&packed_path, &output_path, &DecompressOptions::default()).unwrap();

        assert!(c.input_sha256.is_some());
        assert_eq!(c.input_sha256, d.output_sha256);

        cleanup_temp_files(&[&input_path, &packed_path, &output_path]);
    }
}
