use super::{read_sweep, write_sweep};
use crate::iterator::Direction;
use crate::patterns;
use crate::Engine;

const BYTES: [u8; 6] = [0x00, 0xFF, 0x0F, 0xF0, 0x55, 0xAA];

/// For each byte pattern: write-UP, read-UP, write-DOWN, read-DOWN
/// (§4.D "basic").
pub(super) fn run(engine: &mut Engine, buf: &mut [u8]) {
    for &b in &BYTES {
        let isa = engine.isa;
        let pattern = move |_off: usize| unsafe { patterns::constant_byte(isa, b) };
        write_sweep(engine, buf, Direction::Up, pattern);
        read_sweep(engine, buf, Direction::Up, pattern);
        write_sweep(engine, buf, Direction::Down, pattern);
        read_sweep(engine, buf, Direction::Down, pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn fault_free_buffer_ends_on_last_pattern_with_no_errors() {
        let mut engine = Engine::new(2, Isa::Avx2, (11, 22));
        let mut buf = vec![0u8; 2 * 32 * 4];
        run(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
        assert!(buf.iter().all(|&b| b == 0xAA));
    }
}
