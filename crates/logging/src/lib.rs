//! Verbosity flag system bridged to [`tracing`].
//!
//! Downstream code never constructs its own subscriber; it calls
//! [`init`] once at startup with a [`Verbosity`] derived from CLI flags and
//! then logs through ordinary `tracing::{info,warn,error,debug}!` call
//! sites. `RUST_LOG` still overrides the derived level, matching the
//! standard `tracing-subscriber` `EnvFilter` behavior.

mod verbosity;

pub use verbosity::Verbosity;

use tracing_subscriber::EnvFilter;

/// Installs a process-wide `tracing` subscriber at the given verbosity.
///
/// Safe to call at most once; a second call is a logic error in the caller,
/// not something this crate tries to paper over.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
