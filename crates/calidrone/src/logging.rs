//! Logging configuration for calidrone.
//!
//! Everything is logged under the `calidrone` target tree:
//!
//! | Target | Level | Events (fields) |
//! |---|---|---|
//! | `calidrone::path::draft` | debug | waypoint edits (`index`, `waypoint`), path loaded (`id`, `waypoints`) |
//! | `calidrone::path::draft` | info | path saved (`id`, `waypoints`) |
//! | `calidrone::station` | info | path duplicated (`source`, `id`), recording filed (`id`, `total`) |
//! | `calidrone::recording::session` | info | recording started (`source`, `format`, `quality`) and finished (`id`, `duration`, `size`) |
//! | `calidrone::recording::session` | warn | camera fallback and finalize failures (`error`) |
//! | `calidrone::recording::session` | debug | stale ticks (`generation`), demo limit (`elapsed`, `limit`), screenshots |
//! | `calidrone::recording::artifact` | debug | playback handle revoked or deferred (`url`, `players`) |
//! | `calidrone::catalog` | debug/info | catalog changes and exports (`id`, `path`, `count`) |
//!
//! `RUST_LOG=calidrone::recording=debug` follows the recorder alone.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Saves, recordings and camera fallbacks.
    #[default]
    Normal,
    /// Adds every draft edit, tick decision and handle release (`-v`).
    Verbose,
    /// Every `calidrone` event down to trace (`-vv`).
    Trace,
}

impl Verbosity {
    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset, e.g. `calidrone=DEBUG`.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("calidrone={}", self.to_level_filter())
    }
}

/// Install the fmt subscriber for the `calidrone` binary.
///
/// Call once at startup. `RUST_LOG` replaces the directive built from
/// `verbosity`. Event targets are printed so planner and recorder lines can be
/// told apart.
///
/// # Examples
///
/// ```no_run
/// use calidrone::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Ignore the error if a subscriber is already installed
    let _ = subscriber.try_init();
}

/// Capture recorder warnings in test output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
