//! Test routines (§4.D): fixed, named compositions of the block iterator,
//! SIMD primitives, and pattern generators. Each routine's sequence of
//! sweeps and directions is a design-level contract, not an
//! implementation detail — do not reorder steps while "cleaning up."

mod addressing;
mod anti_patterns;
mod basic;
mod march;
mod moving;
mod random_inversions;
mod walking;

use crate::iterator::{self, Direction};
use crate::simd::{self, Isa, Vector};
use crate::Engine;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Writes `pattern(global_off)` at every offset of one UP or DOWN sweep.
/// `pattern` is evaluated at the buffer-wide offset (not the worker's
/// local one) since patterns like `address-derived` depend on global
/// position; the store itself uses the worker's own chunk-local offset.
fn write_sweep(engine: &Engine, buf: &mut [u8], dir: Direction, pattern: impl Fn(usize) -> Vector + Sync) {
    let isa = engine.isa;
    iterator::sweep(engine.cpus, isa.vector_bytes(), buf, dir, move |b, local, global| unsafe {
        simd::store(isa, b, local, pattern(global));
    });
    engine.bytes_processed.fetch_add(buf.len() as u64, Ordering::Relaxed);
}

/// Verifies `pattern(global_off)` at every offset of one UP or DOWN
/// sweep, reporting and counting any mismatch (§4.B).
fn read_sweep(engine: &Engine, buf: &mut [u8], dir: Direction, pattern: impl Fn(usize) -> Vector + Sync) {
    let isa = engine.isa;
    let errors = &engine.errors;
    iterator::sweep(engine.cpus, isa.vector_bytes(), buf, dir, move |b, local, global| unsafe {
        if let Some(outcome) = simd::verify(isa, b, local, pattern(global)) {
            simd::report(isa, errors, global, &outcome);
        }
    });
    engine.bytes_processed.fetch_add(buf.len() as u64, Ordering::Relaxed);
}

/// Runs `script` once per offset of one UP or DOWN sweep, with the
/// *entire* per-offset op sequence executed inside a single call to
/// `script` before the sweep advances to the next offset (§4.A: "the
/// per-offset script is executed inside the inner loop"; "reordering
/// sweeps ... is not permitted"). Used by routines like `march` whose
/// defining property is that the full read/write script at one offset
/// completes before any other offset is touched, rather than running as
/// separate whole-buffer passes.
///
/// `ops_per_offset` is the number of store/verify calls `script` makes
/// per offset, so the byte-accounting tally reflects the whole script
/// rather than a single pass over the buffer.
fn scripted_sweep<F>(engine: &Engine, buf: &mut [u8], dir: Direction, ops_per_offset: u64, script: F)
where
    F: Fn(Isa, &AtomicU64, &mut [u8], usize, usize) + Sync,
{
    let isa = engine.isa;
    let errors = &engine.errors;
    iterator::sweep(engine.cpus, isa.vector_bytes(), buf, dir, move |b, local, global| {
        script(isa, errors, b, local, global);
    });
    engine
        .bytes_processed
        .fetch_add(buf.len() as u64 * ops_per_offset, Ordering::Relaxed);
}

/// Stable, human-readable name for a registered routine; used in pass
/// reports (§3 "Pass report", §4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineName {
    Basic,
    March,
    RandomInversions,
    MovingInversionsLeft64,
    MovingInversionsRight32,
    MovingInversionsLeft16,
    MovingInversionsRight8,
    MovingInversionsLeft4,
    MovingSaturations16,
    MovingSaturations8,
    Addressing,
    Walking1,
    Walking0,
    Checkerboard,
    AddressLine,
    AntiPatterns,
    InverseDataPatterns,
}

impl fmt::Display for RoutineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoutineName::Basic => "basic",
            RoutineName::March => "march",
            RoutineName::RandomInversions => "random-inversions",
            RoutineName::MovingInversionsLeft64 => "moving-inversions-left-64",
            RoutineName::MovingInversionsRight32 => "moving-inversions-right-32",
            RoutineName::MovingInversionsLeft16 => "moving-inversions-left-16",
            RoutineName::MovingInversionsRight8 => "moving-inversions-right-8",
            RoutineName::MovingInversionsLeft4 => "moving-inversions-left-4",
            RoutineName::MovingSaturations16 => "moving-saturations-16",
            RoutineName::MovingSaturations8 => "moving-saturations-8",
            RoutineName::Addressing => "addressing",
            RoutineName::Walking1 => "walking-1",
            RoutineName::Walking0 => "walking-0",
            RoutineName::Checkerboard => "checkerboard",
            RoutineName::AddressLine => "address-line",
            RoutineName::AntiPatterns => "anti-patterns",
            RoutineName::InverseDataPatterns => "inverse-data-patterns",
        };
        f.write_str(s)
    }
}

/// One registry entry: a name paired with the function that runs it.
pub struct TestRoutine {
    pub name: RoutineName,
    run_fn: fn(&mut Engine, &mut [u8]),
}

impl TestRoutine {
    pub fn run(&self, engine: &mut Engine, buf: &mut [u8]) {
        (self.run_fn)(engine, buf);
    }
}

/// Builds the ordered list of registered routines (§4.D "Routine
/// registry"): the driver loop (§4.F) iterates this once per pass rather
/// than a hand-written call sequence.
#[must_use]
pub fn registry() -> Vec<TestRoutine> {
    vec![
        TestRoutine { name: RoutineName::Basic, run_fn: basic::run },
        TestRoutine { name: RoutineName::March, run_fn: march::run },
        TestRoutine { name: RoutineName::RandomInversions, run_fn: random_inversions::run },
        TestRoutine { name: RoutineName::MovingInversionsLeft64, run_fn: moving::inversions_left_64 },
        TestRoutine { name: RoutineName::MovingInversionsRight32, run_fn: moving::inversions_right_32 },
        TestRoutine { name: RoutineName::MovingInversionsLeft16, run_fn: moving::inversions_left_16 },
        TestRoutine { name: RoutineName::MovingInversionsRight8, run_fn: moving::inversions_right_8 },
        TestRoutine { name: RoutineName::MovingInversionsLeft4, run_fn: moving::inversions_left_4 },
        TestRoutine { name: RoutineName::MovingSaturations16, run_fn: moving::saturations_16 },
        TestRoutine { name: RoutineName::MovingSaturations8, run_fn: moving::saturations_8 },
        TestRoutine { name: RoutineName::Addressing, run_fn: addressing::addressing },
        TestRoutine { name: RoutineName::Walking1, run_fn: walking::walking_one },
        TestRoutine { name: RoutineName::Walking0, run_fn: walking::walking_zero },
        TestRoutine { name: RoutineName::Checkerboard, run_fn: walking::checkerboard },
        TestRoutine { name: RoutineName::AddressLine, run_fn: addressing::address_line },
        TestRoutine { name: RoutineName::AntiPatterns, run_fn: anti_patterns::anti_patterns },
        TestRoutine { name: RoutineName::InverseDataPatterns, run_fn: anti_patterns::inverse_data_patterns },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;
    use crate::Isa;

    #[test]
    fn registry_lists_every_routine_exactly_once() {
        let names: Vec<RoutineName> = registry().into_iter().map(|r| r.name).collect();
        assert_eq!(names.len(), 17);
    }

    #[test]
    fn injected_single_byte_fault_is_counted_once() {
        let mut engine = Engine::new(1, Isa::Avx2, (5, 6));
        let mut buf = vec![0u8; 32];
        let isa = engine.isa;
        let zeros = move |_off: usize| unsafe { patterns::constant_byte(isa, 0x00) };

        write_sweep(&engine, &mut buf, Direction::Up, zeros);
        buf[0] = 0x40; // flip a bit that verify must catch
        read_sweep(&engine, &mut buf, Direction::Up, zeros);

        assert_eq!(engine.error_count(), 1);
    }
}
