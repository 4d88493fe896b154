use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// The level defaults to `info` and can be overridden through `RUST_LOG`.
/// `verbose` forces `debug` regardless of the environment.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
