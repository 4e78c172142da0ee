//! Tracing/logging initialization.
//!
//! JSON events with timestamps, filtered via `RUST_LOG`. Alert events emitted
//! by the sourcing pipeline carry the `shipsource::alerts` target so
//! deployments can route them separately.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Filter comes from `RUST_LOG` when set, else `info` plus alert events.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_filter("info,shipsource::alerts=error");
}

/// Initialize with an explicit default filter directive (still overridable
/// via `RUST_LOG`).
pub fn init_with_filter(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init();
}
