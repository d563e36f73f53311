use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::prelude::*;

/// Installs the diagnostics subscriber.
///
/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`), so the
/// tools' own status output on stdout stays clean. Calling this twice is
/// harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = tracing_fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init();
}
