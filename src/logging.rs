use tracing_subscriber::EnvFilter;

/// Initialize diagnostic logging on stderr.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or sitesnap's debug events
/// with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,sitesnap=debug,sitesnap_lib=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
