// Command-line interface for lzw12.
//
// Explicit subcommands with long-form options. File contents are loaded
// whole; the library does the rest.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use log::info;

use crate::engine::{CompressOptions, DecompressOptions};
use crate::io::{self as file_io, IoError};
use crate::lzw::{CODE_BITS, CODE_LIMIT, FIRST_FREE_CODE};
use crate::pack::bits::{packed_len, raw_code_count};
use crate::pack::frame::{FrameFlags, FrameHeader, Framing};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// 12-bit LZW compressor/decompressor.
#[derive(Parser, Debug)]
#[command(
    name = "lzw12",
    version,
    about = "12-bit LZW compressor/decompressor",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode: report bytes read and written (repeat for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress a file.
    #[command(visible_alias = "c")]
    Compress(CodecArgs),
    /// Decompress a file.
    #[command(visible_alias = "d")]
    Decompress(CodecArgs),
    /// Print the frame header of a compressed file.
    Inspect(InspectArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Use the headerless format (no code count, no checksum).
    #[arg(long)]
    raw: bool,

    /// Do not write (compress) or verify (decompress) the Adler-32 checksum.
    #[arg(long = "no-checksum")]
    no_checksum: bool,

    /// Input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Treat the file as headerless.
    #[arg(long)]
    raw: bool,

    /// Compressed input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Compress,
    Decompress,
    Inspect,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    framing: Framing,
    checksum: bool,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

fn framing(raw: bool) -> Framing {
    if raw { Framing::Raw } else { Framing::Counted }
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Config,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        framing: Framing::Counted,
        checksum: true,
        input_file: None,
        output_file: None,
    };

    match cli.command {
        Cmd::Compress(args) => {
            opts.command = Command::Compress;
            apply_codec_args(&mut opts, args);
        }
        Cmd::Decompress(args) => {
            opts.command = Command::Decompress;
            apply_codec_args(&mut opts, args);
        }
        Cmd::Inspect(args) => {
            opts.command = Command::Inspect;
            opts.framing = framing(args.raw);
            opts.input_file = Some(args.input);
        }
        Cmd::Config => {}
    }
    opts
}

fn apply_codec_args(opts: &mut Options, args: CodecArgs) {
    opts.framing = framing(args.raw);
    // The headerless format has nowhere to store a checksum.
    opts.checksum = !args.no_checksum && !args.raw;
    opts.input_file = Some(args.input);
    opts.output_file = Some(args.output);
}

fn build_compress_options(opts: &Options) -> CompressOptions {
    CompressOptions {
        framing: opts.framing,
        checksum: opts.checksum,
    }
}

fn build_decompress_options(opts: &Options) -> DecompressOptions {
    DecompressOptions {
        framing: opts.framing,
        verify_checksum: opts.checksum,
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("lzw12 version {version} (Rust)");

    let adler32 = cfg!(feature = "adler32") as u8;
    let file_io = cfg!(feature = "file-io") as u8;

    eprintln!("ADLER32_SIMD={adler32}");
    eprintln!("FILE_IO={file_io}");
    eprintln!("CODE_BITS={CODE_BITS}");
    eprintln!("CODE_LIMIT={CODE_LIMIT}");
    eprintln!("FIRST_FREE_CODE={FIRST_FREE_CODE}");

    0
}

// ---------------------------------------------------------------------------
// Compress / decompress commands
// ---------------------------------------------------------------------------

/// Refuse to clobber an existing output unless `--force` was given.
fn check_output(opts: &Options, path: &Path) -> bool {
    if path.exists() && !opts.force {
        eprintln!(
            "lzw12: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return false;
    }
    true
}

fn report(opts: &Options, command: &str, bytes_read: u64, bytes_written: u64, codes: u64, epochs: u64) {
    if opts.verbose > 0 && !opts.quiet {
        println!("bytes read = {bytes_read}, bytes written = {bytes_written}");
        if opts.verbose > 1 {
            eprintln!("lzw12: {command}: codes: {codes}, epoch resets: {epochs}");
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": command,
            "bytes_read": bytes_read,
            "bytes_written": bytes_written,
            "codes": codes,
            "epochs": epochs,
            "framing": format!("{:?}", opts.framing).to_lowercase(),
        });
        match serde_json::to_string_pretty(&json) {
            Ok(s) => eprintln!("{s}"),
            Err(e) => eprintln!("lzw12: json: {e}"),
        }
    }
}

fn io_failure(command: &str, path: &Path, e: &IoError) -> i32 {
    match e {
        IoError::Io(err) => eprintln!("lzw12: {}: {err}", path.display()),
        IoError::Codec(err) => eprintln!("lzw12: {command} error: {err}"),
    }
    1
}

fn cmd_compress(opts: &Options) -> i32 {
    let (Some(input), Some(output)) = (&opts.input_file, &opts.output_file) else {
        eprintln!("lzw12: compress requires an input and an output file");
        return 1;
    };
    if !check_output(opts, output) {
        return 1;
    }

    info!("compressing {} -> {}", input.display(), output.display());
    match file_io::compress_file(input, output, &build_compress_options(opts)) {
        Ok(stats) => {
            report(
                opts,
                "compress",
                stats.bytes_read,
                stats.bytes_written,
                stats.codes,
                stats.epochs,
            );
            0
        }
        Err(e) => io_failure("compress", input, &e),
    }
}

fn cmd_decompress(opts: &Options) -> i32 {
    let (Some(input), Some(output)) = (&opts.input_file, &opts.output_file) else {
        eprintln!("lzw12: decompress requires an input and an output file");
        return 1;
    };
    if !check_output(opts, output) {
        return 1;
    }

    info!("decompressing {} -> {}", input.display(), output.display());
    match file_io::decompress_file(input, output, &build_decompress_options(opts)) {
        Ok(stats) => {
            report(
                opts,
                "decompress",
                stats.bytes_read,
                stats.bytes_written,
                stats.codes,
                stats.epochs,
            );
            0
        }
        Err(e) => io_failure("decompress", input, &e),
    }
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

fn cmd_inspect(opts: &Options) -> i32 {
    let Some(input) = &opts.input_file else {
        eprintln!("lzw12: inspect requires an input file");
        return 1;
    };
    let data = match std::fs::read(input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("lzw12: {}: {e}", input.display());
            return 1;
        }
    };

    println!("file size:          {}", data.len());

    if opts.framing == Framing::Raw {
        match raw_code_count(data.len()) {
            Some(count) => {
                println!("framing:            raw");
                println!("code count:         {count}");
                println!("padded:             {}", count % 2 == 1);
                0
            }
            None => {
                eprintln!(
                    "lzw12: {}: length {} is not a whole number of codes",
                    input.display(),
                    data.len()
                );
                1
            }
        }
    } else {
        let (hdr, used) = match FrameHeader::decode(&data) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("lzw12: invalid frame header: {e}");
                return 1;
            }
        };
        let body = data.len() - used;

        println!("framing:            counted");
        println!("header size:        {used}");
        print!("flags:              ");
        if hdr.flags.contains(FrameFlags::ADLER32) {
            println!("ADLER32");
        } else {
            println!("none");
        }
        println!("code count:         {}", hdr.code_count);
        println!("decoded length:     {}", hdr.decoded_len);
        if let Some(cksum) = hdr.adler32 {
            println!("adler32 checksum:   {cksum:08X}");
        }
        println!("body length:        {body}");

        match hdr.codes() {
            Ok(count) if packed_len(count) == body => {
                if hdr.decoded_len > 0 {
                    let ratio = data.len() as f64 / hdr.decoded_len as f64;
                    println!("ratio:              {ratio:.3}");
                }
                0
            }
            Ok(count) => {
                eprintln!(
                    "lzw12: body is {body} bytes, {count} codes need {}",
                    packed_len(count)
                );
                1
            }
            Err(e) => {
                eprintln!("lzw12: {e}");
                1
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fuzzing helper
// ---------------------------------------------------------------------------

#[cfg(feature = "fuzzing")]
pub fn fuzz_try_parse_args(args: &[String]) {
    if let Ok(cli) = Cli::try_parse_from(args) {
        let opts = resolve_options(cli);
        let _ = build_compress_options(&opts);
        let _ = build_decompress_options(&opts);
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let exit_code = match opts.command {
        Command::Compress => cmd_compress(&opts),
        Command::Decompress => cmd_decompress(&opts),
        Command::Inspect => cmd_inspect(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
