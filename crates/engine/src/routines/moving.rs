//! Moving-inversions and moving-saturations (§4.D, 7 variants total).
//! Each moving-inversions variant walks a single shifted bit (or
//! replicated byte) through a lane width; each moving-saturations
//! variant walks a saturating 16-bit pattern interleaved with zero/one
//! reference sweeps.

use super::{read_sweep, write_sweep};
use crate::iterator::Direction;
use crate::patterns::{self, LaneWidth, ShiftDir};
use crate::Engine;

/// write-UP `p`, read-UP `p`, write-UP `~p`, read-UP `~p`, once per
/// shifted step (§4.D "moving-inversions": both `p` and its inverse run
/// in the UP direction).
fn inversions_schedule(engine: &mut Engine, buf: &mut [u8], initial: u64, iterations: u32, width: LaneWidth, dir: ShiftDir) {
    let isa = engine.isa;
    for i in 0..iterations {
        let p = unsafe { patterns::shifted(isa, initial, i, width, dir) };
        let anti_p = unsafe { patterns::anti(isa, p) };
        write_sweep(engine, buf, Direction::Up, move |_| p);
        read_sweep(engine, buf, Direction::Up, move |_| p);
        write_sweep(engine, buf, Direction::Up, move |_| anti_p);
        read_sweep(engine, buf, Direction::Up, move |_| anti_p);
    }
}

pub(super) fn inversions_left_64(engine: &mut Engine, buf: &mut [u8]) {
    inversions_schedule(engine, buf, 0x0000_0000_0000_0001, 64, LaneWidth::Qword, ShiftDir::Left);
}

pub(super) fn inversions_right_32(engine: &mut Engine, buf: &mut [u8]) {
    inversions_schedule(engine, buf, 0x8000_0000_8000_0000, 32, LaneWidth::Dword, ShiftDir::Right);
}

pub(super) fn inversions_left_16(engine: &mut Engine, buf: &mut [u8]) {
    inversions_schedule(engine, buf, 0x0001_0001_0001_0001, 16, LaneWidth::Word, ShiftDir::Left);
}

pub(super) fn inversions_right_8(engine: &mut Engine, buf: &mut [u8]) {
    inversions_schedule(engine, buf, 0x80, 8, LaneWidth::Byte, ShiftDir::Right);
}

/// Uses an 8-bit-lane base rather than a 64-bit one (§9: no native
/// 8-bit-lane shift exists, so [`patterns::shifted`] computes this lane
/// width in scalar Rust before broadcasting).
pub(super) fn inversions_left_4(engine: &mut Engine, buf: &mut [u8]) {
    inversions_schedule(engine, buf, 0x11, 4, LaneWidth::Byte, ShiftDir::Left);
}

/// write-UP `p`, read-UP `p`, write-UP zeros, read-UP zeros, write-UP
/// `p`, read-UP `p`, write-UP ones, read-UP ones, once per saturation
/// step (§4.D "moving-saturations": the pattern is rewritten and
/// reverified between the zero and one reference sweeps, not just
/// bracketing them once).
fn saturations_schedule(engine: &mut Engine, buf: &mut [u8], base: u16, iterations: u32, dir: ShiftDir) {
    let isa = engine.isa;
    let zeros = move |_off: usize| unsafe { patterns::constant_byte(isa, 0x00) };
    let ones = move |_off: usize| unsafe { patterns::constant_byte(isa, 0xFF) };
    for i in 0..iterations {
        let p = unsafe { patterns::saturation(isa, base, i, dir) };
        write_sweep(engine, buf, Direction::Up, move |_| p);
        read_sweep(engine, buf, Direction::Up, move |_| p);
        write_sweep(engine, buf, Direction::Up, zeros);
        read_sweep(engine, buf, Direction::Up, zeros);
        write_sweep(engine, buf, Direction::Up, move |_| p);
        read_sweep(engine, buf, Direction::Up, move |_| p);
        write_sweep(engine, buf, Direction::Up, ones);
        read_sweep(engine, buf, Direction::Up, ones);
    }
}

pub(super) fn saturations_16(engine: &mut Engine, buf: &mut [u8]) {
    saturations_schedule(engine, buf, 0x8000, 16, ShiftDir::Left);
}

pub(super) fn saturations_8(engine: &mut Engine, buf: &mut [u8]) {
    saturations_schedule(engine, buf, 0x0001, 8, ShiftDir::Right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn left_64_variant_reports_no_errors_on_fault_free_buffer() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        inversions_left_64(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }

    #[test]
    fn left_4_variant_reports_no_errors_on_fault_free_buffer() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        inversions_left_4(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }

    #[test]
    fn saturations_16_variant_reports_no_errors_on_fault_free_buffer() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        saturations_16(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }
}
