use super::{scripted_sweep, write_sweep};
use crate::iterator::Direction;
use crate::patterns;
use crate::simd::{self, Isa};
use crate::Engine;
use std::sync::atomic::AtomicU64;

/// Verifies `expected` at `(local, global)`, reporting and counting any
/// mismatch, then returns — callers chain several of these per offset to
/// build the full march script (§4.D "march").
///
/// # Safety
/// `local` must be a vector-aligned, in-bounds offset into `buf`.
unsafe fn verify_step(isa: Isa, errors: &AtomicU64, buf: &mut [u8], local: usize, global: usize, expected: u8) {
    let pattern = unsafe { patterns::constant_byte(isa, expected) };
    if let Some(outcome) = unsafe { simd::verify(isa, buf, local, pattern) } {
        unsafe { simd::report(isa, errors, global, &outcome) };
    }
}

/// Writes `value` at `(local, global)`.
///
/// # Safety
/// `local` must be a vector-aligned, in-bounds offset into `buf`.
unsafe fn write_step(isa: Isa, buf: &mut [u8], local: usize, value: u8) {
    let pattern = unsafe { patterns::constant_byte(isa, value) };
    unsafe { simd::store(isa, buf, local, pattern) };
}

/// Two repetitions of the per-offset march script (§4.D "march"): each
/// offset's entire read/write sequence runs to completion — via
/// [`scripted_sweep`] — before the sweep advances to the next offset;
/// direction governs only the traversal order, never the script. This is
/// the defining property of a march test: it catches coupling faults
/// precisely because the per-cell op sequence is atomic with respect to
/// traversal.
///
/// Script per repetition: write-DOWN zeros (initialization); UP `[read z,
/// write 1s, read 1s, write z, read z, write 1s]`; UP `[read 1s, write z,
/// write 1s]`; DOWN `[read 1s, write z, write 1s, write z]`; DOWN `[read
/// z, write 1s, write z]`.
pub(super) fn run(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    let zeros = move |_off: usize| unsafe { patterns::constant_byte(isa, 0x00) };

    for _ in 0..2 {
        write_sweep(engine, buf, Direction::Down, zeros);

        scripted_sweep(engine, buf, Direction::Up, 6, |isa, errors, b, local, global| unsafe {
            verify_step(isa, errors, b, local, global, 0x00);
            write_step(isa, b, local, 0xFF);
            verify_step(isa, errors, b, local, global, 0xFF);
            write_step(isa, b, local, 0x00);
            verify_step(isa, errors, b, local, global, 0x00);
            write_step(isa, b, local, 0xFF);
        });

        scripted_sweep(engine, buf, Direction::Up, 3, |isa, errors, b, local, global| unsafe {
            verify_step(isa, errors, b, local, global, 0xFF);
            write_step(isa, b, local, 0x00);
            write_step(isa, b, local, 0xFF);
        });

        scripted_sweep(engine, buf, Direction::Down, 4, |isa, errors, b, local, global| unsafe {
            verify_step(isa, errors, b, local, global, 0xFF);
            write_step(isa, b, local, 0x00);
            write_step(isa, b, local, 0xFF);
            write_step(isa, b, local, 0x00);
        });

        scripted_sweep(engine, buf, Direction::Down, 3, |isa, errors, b, local, global| unsafe {
            verify_step(isa, errors, b, local, global, 0x00);
            write_step(isa, b, local, 0xFF);
            write_step(isa, b, local, 0x00);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn fault_free_buffer_ends_all_zero_with_no_errors() {
        let mut engine = Engine::new(2, Isa::Avx2, (3, 4));
        let mut buf = vec![0u8; 2 * 32 * 4];
        run(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
        assert!(buf.iter().all(|&b| b == 0x00));
    }
}
