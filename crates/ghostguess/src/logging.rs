//! Log output setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once: only the first call installs anything,
/// and an already-installed global subscriber is left alone.
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Like [`init`], with a different fallback filter.
pub fn init_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt().with_env_filter(filter).with_target(false).try_init().ok();
}
