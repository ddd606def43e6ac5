use super::{read_sweep, write_sweep};
use crate::iterator::Direction;
use crate::patterns;
use crate::Engine;

const SHIFTS: [u32; 5] = [1, 2, 4, 8, 16];

/// 16 repetitions of UP-write/UP-read/DOWN-write/DOWN-read with
/// `broadcast64(off) + lane_index` (§4.D "addressing").
pub(super) fn addressing(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    let pattern = move |off: usize| unsafe { patterns::addressing(isa, off as u64) };
    for _ in 0..16 {
        write_sweep(engine, buf, Direction::Up, pattern);
        read_sweep(engine, buf, Direction::Up, pattern);
        write_sweep(engine, buf, Direction::Down, pattern);
        read_sweep(engine, buf, Direction::Down, pattern);
    }
}

/// write-UP/read-UP of `broadcast64(off)`; write-DOWN/read-DOWN of
/// `broadcast64(~off)`; for each shift in `{1,2,4,8,16}`: write-UP/
/// read-UP of `broadcast64(off ^ (off << shift))` (§4.D "address-line").
pub(super) fn address_line(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;

    let direct = move |off: usize| unsafe { patterns::address_derived(isa, off as u64, None) };
    write_sweep(engine, buf, Direction::Up, direct);
    read_sweep(engine, buf, Direction::Up, direct);

    let inverted = move |off: usize| unsafe { patterns::address_derived(isa, !(off as u64), None) };
    write_sweep(engine, buf, Direction::Down, inverted);
    read_sweep(engine, buf, Direction::Down, inverted);

    for &shift in &SHIFTS {
        let xored = move |off: usize| unsafe { patterns::address_derived(isa, off as u64, Some(shift)) };
        write_sweep(engine, buf, Direction::Up, xored);
        read_sweep(engine, buf, Direction::Up, xored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn addressing_round_trips_without_errors() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        addressing(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }

    #[test]
    fn address_line_round_trips_without_errors() {
        let mut engine = Engine::new(2, Isa::Avx2, (1, 2));
        let mut buf = vec![0u8; 2 * 32 * 4];
        address_line(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }
}
