//! The pattern-testing engine: block iteration, SIMD store/verify
//! primitives, pattern generators, the RNG, and the named test routines
//! that compose them. The engine never touches the OS — it is handed a
//! plain mutable byte slice by its caller (the `cli` binary, backed by a
//! page-locked `platform::buffer::LockedBuffer` in production, or a
//! `Vec<u8>` in tests) and never frees or resizes it.

mod iterator;
mod patterns;
mod raw_buffer;
mod rng;
mod simd;

pub mod driver;
pub mod routines;

pub use driver::{run_pass, PassReport};
pub use iterator::Direction;
pub use routines::{RoutineName, TestRoutine, registry};
pub use simd::Isa;

use rng::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide engine state (§3): worker count, cumulative error
/// counter, the RNG, and the selected ISA, fixed at construction and
/// held for the process's lifetime.
pub struct Engine {
    pub(crate) cpus: usize,
    pub(crate) isa: Isa,
    pub(crate) errors: AtomicU64,
    pub(crate) rng: Rng,
    pub(crate) bytes_processed: AtomicU64,
}

impl Engine {
    /// Builds an engine for `cpus` workers at the given ISA, seeding the
    /// RNG from a hardware-sourced `(s0, s1)` pair. The error counter
    /// starts at zero.
    #[must_use]
    pub fn new(cpus: usize, isa: Isa, seed: (u64, u64)) -> Self {
        Engine {
            cpus,
            isa,
            errors: AtomicU64::new(0),
            rng: Rng::seeded(isa, seed),
            bytes_processed: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn cpus(&self) -> usize {
        self.cpus
    }

    #[must_use]
    pub fn isa(&self) -> Isa {
        self.isa
    }

    /// Cumulative mismatched-byte count observed across every routine run
    /// against this engine so far. Monotonically non-decreasing (§3).
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_engine_has_no_errors() {
        let engine = Engine::new(1, Isa::Avx2, (1, 2));
        assert_eq!(engine.error_count(), 0);
    }
}
