//! Logging utilities for docrel
//!
//! Provides helpers for initializing tracing subscribers. Statement-level
//! events are emitted under the `docrel::sql` target, lifecycle events under
//! the module paths of `docrel_core::engine`.

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// Target used for every statement issued against a connection.
pub const SQL_TARGET: &str = "docrel::sql";

/// `info` 레벨로 docrel 로깅 초기화
///
/// Collection, attribute, index and namespace operations log under
/// `docrel_core::engine` at `info`; per-statement SQL under [`SQL_TARGET`]
/// only shows at `debug`. `RUST_LOG` overrides the level, for example
/// `RUST_LOG=docrel::sql=debug` to trace every statement.
///
/// ```rust
/// docrel_core::logging::init();
/// ```
#[cfg(feature = "logging")]
pub fn init() {
    init_with_level("info")
}

/// Same as [`init`], with `level` as the fallback filter when `RUST_LOG`
/// is unset. Accepts any `EnvFilter` directive, e.g. `"docrel::sql=debug,warn"`.
///
/// Calling it twice is harmless: the second subscriber is discarded.
#[cfg(feature = "logging")]
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Initialize logging for tests
///
/// Shows every statement (`docrel::sql=debug`) through the test writer.
#[cfg(feature = "logging")]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(format!("{SQL_TARGET}=debug,docrel_core=debug")))
        .with_test_writer()
        .try_init();
}

// `logging` 비활성화 시 no-op
#[cfg(not(feature = "logging"))]
pub fn init() {}

#[cfg(not(feature = "logging"))]
pub fn init_with_level(_level: &str) {}

#[cfg(not(feature = "logging"))]
pub fn init_test() {}
