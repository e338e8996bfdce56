//! Tracing setup for the stride binary.
//!
//! `stride compile` writes documents to stdout, so every log line goes to
//! stderr and the default filter only lets warnings through. Fallback
//! mappings for unrecognized step values are logged at WARN and therefore
//! show up without any extra flags.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber at WARN; `RUST_LOG` takes precedence
pub fn init() {
    init_with_level("warn")
}

/// Install the stderr subscriber with `default_level` unless `RUST_LOG` is set
///
/// `RUST_LOG=stride_core=debug` adds per-workout totals and outbox ids.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::debug!("subscriber installed once");
    }
}
