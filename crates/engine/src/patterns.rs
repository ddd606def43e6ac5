//! Pattern generators (§4.C): deterministic, side-effect-free (besides RNG
//! state advance) functions from a small index to a [`Vector`].

use crate::rng::Rng;
use crate::simd::{self, Isa, Vector};

/// Left/right shift direction, tied to a lane width via the routine that
/// calls [`shifted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDir {
    Left,
    Right,
}

/// Lane width a shifted/saturation pattern operates within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneWidth {
    Qword,
    Dword,
    Word,
    Byte,
}

/// # Safety
/// `isa` must match the capability the calling `Engine` was built with.
pub unsafe fn constant_byte(isa: Isa, b: u8) -> Vector {
    simd::broadcast_byte(isa, b)
}

/// # Safety
/// See [`constant_byte`].
pub unsafe fn walking_one(isa: Isa, bit: u32) -> Vector {
    debug_assert!(bit < 64);
    simd::broadcast_qword(isa, 1u64 << bit)
}

/// # Safety
/// See [`constant_byte`].
pub unsafe fn walking_zero(isa: Isa, bit: u32) -> Vector {
    debug_assert!(bit < 64);
    simd::broadcast_qword(isa, !(1u64 << bit))
}

/// Shifts `initial` by `i` within the given lane width and direction
/// (§4.C "shifted"). `initial` must already be replicated to fill every
/// lane of the chosen width (e.g. `0x0001_0001_0001_0001` for a
/// word-width pattern), the same way [`saturation`] replicates its base.
///
/// x86 has no native 8-bit-lane shift instruction, so `LaneWidth::Byte`
/// is computed in scalar Rust and broadcast rather than dispatched to a
/// SIMD shift (§9, resolving the left-4 schedule's lane width).
///
/// # Safety
/// See [`constant_byte`].
pub unsafe fn shifted(isa: Isa, initial: u64, i: u32, width: LaneWidth, dir: ShiftDir) -> Vector {
    if width == LaneWidth::Byte {
        let byte = initial as u8;
        let shifted_byte = match dir {
            ShiftDir::Left => byte.wrapping_shl(i),
            ShiftDir::Right => byte.wrapping_shr(i),
        };
        return simd::broadcast_byte(isa, shifted_byte);
    }
    let base = simd::broadcast_qword(isa, initial);
    match (width, dir) {
        (LaneWidth::Qword, ShiftDir::Left) => simd::shift_left_qword(isa, base, i),
        (LaneWidth::Qword, ShiftDir::Right) => simd::shift_right_qword(isa, base, i),
        (LaneWidth::Dword, ShiftDir::Left) => simd::shift_left_dword(isa, base, i),
        (LaneWidth::Dword, ShiftDir::Right) => simd::shift_right_dword(isa, base, i),
        (LaneWidth::Word, ShiftDir::Left) => simd::shift_left_word(isa, base, i),
        (LaneWidth::Word, ShiftDir::Right) => simd::shift_right_word(isa, base, i),
        (LaneWidth::Byte, _) => unreachable!("handled above"),
    }
}

/// Saturation pattern: base broadcast `0x8000`/`0x0001` in 16-bit lanes,
/// shifted `i` times (§4.C "saturation").
///
/// # Safety
/// See [`constant_byte`].
pub unsafe fn saturation(isa: Isa, base: u16, i: u32, dir: ShiftDir) -> Vector {
    let broadcast = simd::broadcast_qword(isa, u64::from(base) * 0x0001_0001_0001_0001);
    match dir {
        ShiftDir::Left => simd::shift_left_word(isa, broadcast, i),
        ShiftDir::Right => simd::shift_right_word(isa, broadcast, i),
    }
}

/// Address-derived pattern: `off` broadcast as a 64-bit value, optionally
/// XORed with itself shifted left by `shift` (§4.C "address-derived").
///
/// # Safety
/// See [`constant_byte`].
pub unsafe fn address_derived(isa: Isa, off: u64, shift: Option<u32>) -> Vector {
    let base = simd::broadcast_qword(isa, off);
    match shift {
        None => base,
        Some(s) => {
            let shifted = simd::shift_left_qword(isa, simd::broadcast_qword(isa, off), s);
            simd::xor(isa, base, shifted)
        }
    }
}

/// `broadcast64(off) + lane_index`, used by the `addressing` routine
/// (§4.D "addressing").
///
/// # Safety
/// See [`constant_byte`].
pub unsafe fn addressing(isa: Isa, off: u64) -> Vector {
    simd::lane_index_qword(isa, off)
}

/// Draws one vector from the engine's RNG (§4.C "random"). Must only be
/// called outside a parallel sweep (§3, §4.E).
///
/// # Safety
/// See [`constant_byte`].
pub unsafe fn random(isa: Isa, rng: &mut Rng) -> Vector {
    rng.next_vector(isa)
}

/// All-`0xFF` except for `zero_len` bytes starting at byte `zero_start`,
/// which are `0x00` — used by `inverse-data-patterns` to walk a zeroed
/// byte/word/dword lane across the vector (§4.D).
///
/// # Safety
/// See [`constant_byte`]. `zero_start + zero_len` must not exceed
/// `isa.vector_bytes()`.
pub unsafe fn zeroed_run(isa: Isa, zero_start: usize, zero_len: usize) -> Vector {
    let mut bytes = vec![0xFFu8; isa.vector_bytes()];
    bytes[zero_start..zero_start + zero_len].fill(0x00);
    simd::from_bytes(isa, &bytes)
}

/// Bitwise complement of `p` (§4.C "anti").
///
/// # Safety
/// See [`constant_byte`].
pub unsafe fn anti(isa: Isa, p: Vector) -> Vector {
    simd::xor(isa, p, simd::all_ones(isa))
}
