use tracing_subscriber::EnvFilter;

/// Installs the `fmt` subscriber on stderr, filtered by `RUST_LOG` (default `info`).
///
/// Stdout is left to the query tables and reports.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
