//! Tracing subscriber installation for hosts without their own.
//!
//! `RUST_LOG` wins when set; otherwise the filter from
//! [`BridgeConfig::log_filter`](labelbridge_engine::BridgeConfig) applies.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`.
///
/// Returns `false` when a global subscriber was already installed; calling
/// it more than once is harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
