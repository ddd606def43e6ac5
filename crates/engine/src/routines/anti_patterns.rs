use super::{read_sweep, write_sweep};
use crate::iterator::Direction;
use crate::patterns;
use crate::Engine;

/// 34-entry byte table exercising alternating, walking, and rotated-bit
/// patterns (§4.D "anti-patterns").
const TABLE: [u8; 34] = [
    0x00, 0xFF, 0x55, 0xAA, 0x33, 0xCC, 0x0F, 0xF0, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80,
    0xFE, 0xFD, 0xFB, 0xF7, 0xEF, 0xDF, 0xBF, 0x7F, 0x99, 0x66, 0x24, 0xDB, 0x49, 0x92, 0x11, 0x88,
    0x6D, 0xB6,
];

/// For each byte in [`TABLE`]: write-UP+read-UP, then write-DOWN+
/// read-DOWN (§4.D "anti-patterns").
pub(super) fn anti_patterns(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    for &b in &TABLE {
        let pattern = move |_off: usize| unsafe { patterns::constant_byte(isa, b) };
        write_sweep(engine, buf, Direction::Up, pattern);
        read_sweep(engine, buf, Direction::Up, pattern);
        write_sweep(engine, buf, Direction::Down, pattern);
        read_sweep(engine, buf, Direction::Down, pattern);
    }
}

/// `0xFF..FF` with one byte, then one word, then one dword zeroed,
/// walked across every lane position; each step followed by its inverse
/// (§4.D "inverse-data-patterns").
pub(super) fn inverse_data_patterns(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    let vector_bytes = isa.vector_bytes();

    for zero_len in [1usize, 2, 4] {
        let mut start = 0;
        while start + zero_len <= vector_bytes {
            let pattern = move |_off: usize| unsafe { patterns::zeroed_run(isa, start, zero_len) };
            write_sweep(engine, buf, Direction::Up, pattern);
            read_sweep(engine, buf, Direction::Up, pattern);

            let inverse = move |_off: usize| unsafe { patterns::anti(isa, patterns::zeroed_run(isa, start, zero_len)) };
            write_sweep(engine, buf, Direction::Up, inverse);
            read_sweep(engine, buf, Direction::Up, inverse);

            start += zero_len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn anti_patterns_reports_no_errors_on_fault_free_buffer() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        anti_patterns(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }

    #[test]
    fn inverse_data_patterns_reports_no_errors_on_fault_free_buffer() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        inverse_data_patterns(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }
}
