//! Tracing initialization.
//!
//! A transport binary calls [`init`] once at startup. Filtering follows the
//! standard `RUST_LOG` convention (e.g. `RUST_LOG=cardex_db=debug,info`).

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// Falls back to `info` level when `RUST_LOG` is unset. Calling this twice
/// is a no-op (the second set_global_default fails and is ignored), which
/// keeps it safe for tests.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
