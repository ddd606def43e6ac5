use super::{read_sweep, write_sweep};
use crate::iterator::Direction;
use crate::patterns;
use crate::Engine;

/// For each `bit ∈ [0, 64)`: write-UP+read-UP of the walking-one
/// pattern, then of its inverse (§4.D "walking-1").
pub(super) fn walking_one(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    for bit in 0..64 {
        let p = move |_off: usize| unsafe { patterns::walking_one(isa, bit) };
        write_sweep(engine, buf, Direction::Up, p);
        read_sweep(engine, buf, Direction::Up, p);

        let anti_p = move |_off: usize| unsafe { patterns::anti(isa, patterns::walking_one(isa, bit)) };
        write_sweep(engine, buf, Direction::Up, anti_p);
        read_sweep(engine, buf, Direction::Up, anti_p);
    }
}

/// For each `bit ∈ [0, 64)`: write-UP+read-UP of the walking-zero
/// pattern, then of its inverse (§4.D "walking-0").
pub(super) fn walking_zero(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    for bit in 0..64 {
        let p = move |_off: usize| unsafe { patterns::walking_zero(isa, bit) };
        write_sweep(engine, buf, Direction::Up, p);
        read_sweep(engine, buf, Direction::Up, p);

        let anti_p = move |_off: usize| unsafe { patterns::anti(isa, patterns::walking_zero(isa, bit)) };
        write_sweep(engine, buf, Direction::Up, anti_p);
        read_sweep(engine, buf, Direction::Up, anti_p);
    }
}

/// Pattern byte alternates by `(off / VECTOR_BYTES) & 1` (§4.D
/// "checkerboard"), then the parity-swapped pattern on the return sweep.
pub(super) fn checkerboard(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    let vector_bytes = isa.vector_bytes();

    let parity_byte = move |off: usize| if (off / vector_bytes) & 1 == 0 { 0xAA } else { 0x55 };
    let checker = move |off: usize| unsafe { patterns::constant_byte(isa, parity_byte(off)) };
    write_sweep(engine, buf, Direction::Up, checker);
    read_sweep(engine, buf, Direction::Up, checker);

    let inverse_checker = move |off: usize| unsafe { patterns::constant_byte(isa, !parity_byte(off)) };
    write_sweep(engine, buf, Direction::Down, inverse_checker);
    read_sweep(engine, buf, Direction::Down, inverse_checker);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn walking_one_reports_no_errors_on_fault_free_buffer() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        walking_one(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }

    #[test]
    fn walking_one_ends_with_all_bits_set() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        walking_one(&mut engine, &mut buf);
        // The last step writes `anti(walking_one(63))`, i.e. every qword
        // lane holds `!(1 << 63)`.
        let last_qword = u64::from_le_bytes(buf[buf.len() - 8..].try_into().unwrap());
        assert_eq!(last_qword, !(1u64 << 63));
    }

    #[test]
    fn checkerboard_reports_no_errors_on_fault_free_buffer() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        checkerboard(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }
}
