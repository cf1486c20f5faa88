//! Tracing subscriber setup shared by every binary that embeds this crate.
//!
//! The library itself never installs a global subscriber - only a binary's
//! `main` should do that - so this is an opt-in helper rather than anything
//! run from `lib.rs`.

/// Installs a `tracing_subscriber::fmt` subscriber. Level is controlled by
/// `RUST_LOG` (default `info`), format by `LOG_FORMAT` (`pretty`, the
/// default, or `json`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
