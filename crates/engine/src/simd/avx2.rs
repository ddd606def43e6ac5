//! AVX2 (32-byte / 4-qword-lane) implementation of [`VectorOps`].
//!
//! `verify` widens the byte-compare result into an explicit popcount
//! rather than trusting `movemask` vector-granularity, so it reports
//! mismatched *bytes* the same way the AVX-512 mask path does (§9).

use std::arch::x86_64::*;

use super::shift::shift_dispatch;
use super::{Vector, VectorOps, VerifyOutcome, record_errors};
use std::sync::atomic::AtomicU64;

pub struct Avx2Ops;

#[inline(always)]
fn unwrap_256(v: Vector) -> __m256i {
    match v {
        Vector::Avx2(v) => v,
        Vector::Avx512(_) => unreachable!("engine never mixes ISA variants within one run"),
    }
}

impl VectorOps for Avx2Ops {
    #[target_feature(enable = "avx2")]
    unsafe fn store(buf: &mut [u8], off: usize, v: Vector) {
        let ptr = buf.as_mut_ptr().add(off).cast::<__m256i>();
        _mm256_stream_si256(ptr, unwrap_256(v));
    }

    #[target_feature(enable = "avx2")]
    unsafe fn verify(buf: &mut [u8], off: usize, expected: Vector) -> Option<VerifyOutcome> {
        let ptr = buf.as_ptr().add(off).cast::<__m256i>();
        let actual = _mm256_load_si256(ptr);
        let eq = _mm256_cmpeq_epi8(actual, unwrap_256(expected));
        let eq_mask = _mm256_movemask_epi8(eq) as u32;
        if eq_mask == u32::MAX {
            return None;
        }
        let mismatch_mask = !eq_mask;
        Some(VerifyOutcome {
            mismatched_bytes: mismatch_mask.count_ones(),
            mask: u64::from(mismatch_mask),
        })
    }

    #[target_feature(enable = "avx2")]
    unsafe fn broadcast_byte(b: u8) -> Vector {
        Vector::Avx2(_mm256_set1_epi8(b as i8))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn broadcast_qword(q: u64) -> Vector {
        Vector::Avx2(_mm256_set1_epi64x(q as i64))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn xor(a: Vector, b: Vector) -> Vector {
        Vector::Avx2(_mm256_xor_si256(unwrap_256(a), unwrap_256(b)))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn shift_left_qword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_256(v);
        Vector::Avx2(shift_dispatch!(_mm256_slli_epi64, a, imm))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn shift_right_qword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_256(v);
        Vector::Avx2(shift_dispatch!(_mm256_srli_epi64, a, imm))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn shift_left_dword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_256(v);
        Vector::Avx2(shift_dispatch!(_mm256_slli_epi32, a, imm))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn shift_right_dword(v: Vector, imm: u32) -> Vector {
        let a = unwrap_256(v);
        Vector::Avx2(shift_dispatch!(_mm256_srli_epi32, a, imm))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn shift_left_word(v: Vector, imm: u32) -> Vector {
        let a = unwrap_256(v);
        Vector::Avx2(shift_dispatch!(_mm256_slli_epi16, a, imm))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn shift_right_word(v: Vector, imm: u32) -> Vector {
        let a = unwrap_256(v);
        Vector::Avx2(shift_dispatch!(_mm256_srli_epi16, a, imm))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn lane_index_qword(base: u64) -> Vector {
        Vector::Avx2(_mm256_add_epi64(
            _mm256_set1_epi64x(base as i64),
            _mm256_set_epi64x(24, 16, 8, 0),
        ))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn all_ones() -> Vector {
        Vector::Avx2(_mm256_set1_epi8(-1))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn from_bytes(bytes: &[u8]) -> Vector {
        debug_assert_eq!(bytes.len(), 32);
        Vector::Avx2(_mm256_loadu_si256(bytes.as_ptr().cast()))
    }
}

/// Adds `outcome.mismatched_bytes` to `errors` and writes the contractual
/// stderr diagnostic line (§6).
pub(crate) fn report(errors: &AtomicU64, off: usize, outcome: &VerifyOutcome) {
    record_errors(errors, outcome.mismatched_bytes);
    eprintln!("errors detected at offset {off:#018x}");
}
