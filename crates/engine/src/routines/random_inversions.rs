use super::{read_sweep, write_sweep};
use crate::iterator::Direction;
use crate::patterns;
use crate::Engine;

const ITERATIONS: usize = 16;

/// 16 iterations; each draws a random pattern `p` from the engine's RNG
/// (single-threaded, between sweeps) and runs write-UP `p`, read-UP `p`,
/// write-UP `~p`, read-UP `~p` (§4.D "random-inversions").
pub(super) fn run(engine: &mut Engine, buf: &mut [u8]) {
    let isa = engine.isa;
    for _ in 0..ITERATIONS {
        let p = unsafe { patterns::random(isa, &mut engine.rng) };
        let anti_p = unsafe { patterns::anti(isa, p) };

        write_sweep(engine, buf, Direction::Up, move |_| p);
        read_sweep(engine, buf, Direction::Up, move |_| p);
        write_sweep(engine, buf, Direction::Up, move |_| anti_p);
        read_sweep(engine, buf, Direction::Up, move |_| anti_p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Isa;

    #[test]
    fn fault_free_buffer_reports_no_errors() {
        let mut engine = Engine::new(2, Isa::Avx2, (99, 100));
        let mut buf = vec![0u8; 2 * 32 * 4];
        run(&mut engine, &mut buf);
        assert_eq!(engine.error_count(), 0);
    }

    #[test]
    fn same_seed_reproduces_identical_final_buffer() {
        let mut engine_a = Engine::new(2, Isa::Avx2, (7, 8));
        let mut buf_a = vec![0u8; 2 * 32 * 4];
        run(&mut engine_a, &mut buf_a);

        let mut engine_b = Engine::new(2, Isa::Avx2, (7, 8));
        let mut buf_b = vec![0u8; 2 * 32 * 4];
        run(&mut engine_b, &mut buf_b);

        assert_eq!(buf_a, buf_b);
    }
}
