//! Logging and tracing initialization.
//!
//! The wrapper and the built-in views emit `tracing` events; install a
//! subscriber once at startup to see them:
//!
//! ```rust,no_run
//! chopin_jsonable::logging::init_logging();
//! ```
//!
//! The level is controlled by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=chopin_jsonable=debug,sqlx=warn cargo run
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with `RUST_LOG`, defaulting to `info`.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging() {
    init_logging_with_level("info");
}

/// Initialize logging with a fallback level used when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize JSON-formatted logging (recommended for production).
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
