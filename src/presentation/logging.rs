//! Tracing subscriber setup for the binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for a verbosity count; `RUST_LOG` takes precedence
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "gitship=info",
        1 => "gitship=debug",
        _ => "gitship=trace",
    }
}

/// Install the global subscriber, writing to stderr
pub fn init(verbose: u8) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(verbose).into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
