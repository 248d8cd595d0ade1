//! Tracing setup for the `gofold` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global subscriber. Levels come from `GOFOLD_LOG`, e.g.
/// `GOFOLD_LOG=gofold_consteval=debug`; unset or invalid falls back to
/// warnings only. Logs go to stderr so they never mix with listings.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("GOFOLD_LOG").unwrap_or_else(|_| EnvFilter::new("gofold=warn"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
