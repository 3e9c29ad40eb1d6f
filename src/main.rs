fn main() {
    #[cfg(feature = "cli")]
    lzw12::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("lzw12: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
