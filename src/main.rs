fn main() {
    #[cfg(feature = "cli")]
    bincookies::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("bincookies: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
