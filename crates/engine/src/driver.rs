//! Driver loop machinery (§4.F). The loop itself — iterate the registry
//! forever, polling a shutdown flag between passes — lives in the `cli`
//! binary, since only it has access to `platform::shutdown::ShutdownFlag`;
//! this module owns the one-pass unit of work and its report, so the
//! engine stays testable against a plain `Vec<u8>` with no platform
//! dependency.

use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::routines::{RoutineName, TestRoutine};
use crate::Engine;

/// Describes one completed invocation of one routine (§3 "Pass report"):
/// consumed by `logging` for structured output and by the CLI for
/// stdout summaries.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub routine: RoutineName,
    pub elapsed: std::time::Duration,
    pub bytes_processed: u64,
    pub cumulative_errors: u64,
}

impl PassReport {
    /// Bytes/second, or `0.0` for an immeasurably short pass.
    #[must_use]
    pub fn bandwidth_bytes_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            0.0
        } else {
            self.bytes_processed as f64 / secs
        }
    }
}

/// Runs `routine` once against `buf` and reports elapsed time, bytes
/// processed, bandwidth, and the engine's cumulative error count at
/// completion (§4.F).
pub fn run_pass(engine: &mut Engine, routine: &TestRoutine, buf: &mut [u8]) -> PassReport {
    let bytes_before = engine.bytes_processed.load(Ordering::Relaxed);
    let start = Instant::now();
    routine.run(engine, buf);
    let elapsed = start.elapsed();
    let bytes_processed = engine.bytes_processed.load(Ordering::Relaxed) - bytes_before;
    PassReport {
        routine: routine.name,
        elapsed,
        bytes_processed,
        cumulative_errors: engine.error_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn pass_report_tracks_cumulative_errors_not_just_this_pass() {
        let mut engine = Engine::new(1, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 32];
        let routines = crate::registry();
        let basic = routines.iter().find(|r| r.name == RoutineName::Basic).unwrap();

        let first = run_pass(&mut engine, basic, &mut buf);
        assert_eq!(first.cumulative_errors, 0);

        buf[0] ^= 0xFF;
        engine.errors.fetch_add(0, Ordering::Relaxed); // no-op: errors only change via verify
        let second = run_pass(&mut engine, basic, &mut buf);
        // `basic` rewrites the whole buffer before it reads anything, so
        // the manual corruption above never survives to a verify call;
        // cumulative errors stay zero across passes.
        assert_eq!(second.cumulative_errors, 0);
        assert!(second.bytes_processed > 0);
    }
}
