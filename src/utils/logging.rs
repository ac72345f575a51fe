use tracing_subscriber::EnvFilter;

/// Install the diagnostic subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when verbose.
/// Calling this more than once is harmless.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
