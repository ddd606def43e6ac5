use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::PlatformError;

/// A flag the driver loop polls between passes to decide whether to keep
/// looping (§4.F: "terminated by external signal"; §5: "the only points
/// where a thread may be blocked are at the sweep's join barrier").
///
/// Cloning shares the same underlying flag; the signal handlers installed
/// by [`ShutdownFlag::install`] hold one clone, the driver loop holds
/// another.
#[derive(Clone)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Installs `SIGINT`/`SIGTERM` handlers that flip the returned flag.
    /// The engine never observes the signal directly; it only ever sees
    /// this boolean go from `false` to `true` between passes.
    pub fn install() -> Result<Self, PlatformError> {
        let flag = Arc::new(AtomicBool::new(false));
        for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&flag))
                .map_err(|source| PlatformError::SignalHandler { source })?;
        }
        Ok(ShutdownFlag { flag })
    }

    /// Returns `true` once a shutdown signal has been observed.
    #[must_use]
    pub fn requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Builds a flag with no signal handlers attached, for tests that want
    /// to drive shutdown manually.
    #[must_use]
    pub fn manual() -> Self {
        ShutdownFlag {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sets the flag directly; only meaningful on a [`Self::manual`] flag.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_flag_starts_clear_and_latches() {
        let flag = ShutdownFlag::manual();
        assert!(!flag.requested());
        flag.trigger();
        assert!(flag.requested());
    }

    #[test]
    fn clones_share_state() {
        let flag = ShutdownFlag::manual();
        let clone = flag.clone();
        clone.trigger();
        assert!(flag.requested());
    }
}
