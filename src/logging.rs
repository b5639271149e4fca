use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber, writing to stderr so stdout stays pipeable.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `warn`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "leadrank=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding hosts)
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
