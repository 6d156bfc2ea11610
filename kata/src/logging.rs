//! Tracing setup shared by the `kata` and `drill` binaries.
//!
//! Diagnostics go to stderr so they never mix with command output on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber: `RUST_LOG` filter, compact lines on stderr.
///
/// ```bash
/// RUST_LOG=kata=debug,drill=info cargo run -p drill -- run
/// ```
///
/// A second call keeps the first subscriber.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        tracing::debug!("still logging after a second init");
    }
}
