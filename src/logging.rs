//! Logging initialization.
//!
//! The session reports every store failure as a `tracing` error event; this
//! is the only place those failures surface. The level comes from `RUST_LOG`
//! and defaults to `info` (`debug` when verbose).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "bookshelf=debug,info"
    } else {
        "info"
    }
}

/// Install a stderr subscriber. Safe to call more than once; later calls are
/// ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}
