//! AVX-512F+BW (64-byte / 8-qword-lane) implementation of [`VectorOps`].
//!
//! `verify` uses the hardware byte-mask compare directly: `errors`
//! accumulates the mask's popcount and the mask itself is reported
//! alongside the offset (§6).

use std::arch::x86_64::*;

use super::shift::shift_dispatch;
use super::{Vector, VectorOps, VerifyOutcome, record_errors};
use std::sync::atomic::AtomicU64;

pub struct Avx512Ops;

#[inline(always)]
fn unwrap_512(v: Vector) -> __m512i {
    match v {
        Vector::Avx512(v) => v,
        Vector::Avx2(_) => unreachable!("engine never mixes ISA variants within one run"),
    }
}

impl VectorOps for Avx512Ops {
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn store(buf: &mut [u8], off: usize, v: Vector) {
        let ptr = buf.as_mut_ptr().add(off).cast::<i32>();
        _mm512_stream_si512(ptr, unwrap_512(v));
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn verify(buf: &mut [u8], off: usize, expected: Vector) -> Option<VerifyOutcome> {
        let ptr = buf.as_ptr().add(off).cast::<i32>();
        let actual = _mm512_load_si512(ptr);
        // The load must serialize with respect to the preceding store
        // sweep before the mask comparison happens (§4.B).
        _mm_lfence();
        let eq_mask = _mm512_cmpeq_epi8_mask(actual, unwrap_512(expected));
        if eq_mask == u64::MAX {
            return None;
        }
        let mismatch_mask = !eq_mask;
        Some(VerifyOutcome {
            mismatched_bytes: mismatch_mask.count_ones(),
            mask: mismatch_mask,
        })
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn broadcast_byte(b: u8) -> Vector {
        Vector::Avx512(_mm512_set1_epi8(b as i8))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn broadcast_qword(q: u64) -> Vector {
        Vector::Avx512(_mm512_set1_epi64(q as i64))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn xor(a: Vector, b: Vector) -> Vector {
        Vector::Avx512(_mm512_xor_si512(unwrap_512(a), unwrap_512(b)))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn shift_left_qword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_512(v);
        Vector::Avx512(shift_dispatch!(_mm512_slli_epi64, a, imm))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn shift_right_qword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_512(v);
        Vector::Avx512(shift_dispatch!(_mm512_srli_epi64, a, imm))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn shift_left_dword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_512(v);
        Vector::Avx512(shift_dispatch!(_mm512_slli_epi32, a, imm))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn shift_right_dword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_512(v);
        Vector::Avx512(shift_dispatch!(_mm512_srli_epi32, a, imm))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn shift_left_word(v: Vector, imm: u32) -> Vector {
        let a = unwrap_512(v);
        Vector::Avx512(shift_dispatch!(_mm512_slli_epi16, a, imm))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn shift_right_word(v: Vector, imm: u32) -> Vector {
        let a = unwrap_512(v);
        Vector::Avx512(shift_dispatch!(_mm512_srli_epi16, a, imm))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn lane_index_qword(base: u64) -> Vector {
        Vector::Avx512(_mm512_add_epi64(
            _mm512_set1_epi64(base as i64),
            _mm512_set_epi64(56, 48, 40, 32, 24, 16, 8, 0),
        ))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn all_ones() -> Vector {
        Vector::Avx512(_mm512_set1_epi8(-1))
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn from_bytes(bytes: &[u8]) -> Vector {
        debug_assert_eq!(bytes.len(), 64);
        Vector::Avx512(_mm512_loadu_si512(bytes.as_ptr().cast()))
    }
}

/// Adds `outcome.mismatched_bytes` to `errors` and writes the contractual
/// stderr diagnostic line (§6), including the per-byte inequality mask.
pub(crate) fn report(errors: &AtomicU64, off: usize, outcome: &VerifyOutcome) {
    record_errors(errors, outcome.mismatched_bytes);
    eprintln!(
        "{} errors detected at offset {off:#018x} [error mask: {:#018x}]",
        outcome.mismatched_bytes, outcome.mask
    );
}
