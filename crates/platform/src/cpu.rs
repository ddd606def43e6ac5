use crate::error::PlatformError;

/// The SIMD capability the engine was built against for this process.
///
/// Chosen once at startup; every worker thread reads the same variant for
/// the lifetime of the process (§4.F of the design: ISA selection happens
/// exactly once, before the test loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsaVariant {
    /// 256-bit vectors (`__m256i`), 32-byte lane width.
    Avx2,
    /// 512-bit vectors (`__m512i`), 64-byte lane width. Requires AVX-512F
    /// (foundation) and AVX-512BW (byte/word ops, needed for the per-byte
    /// mismatch mask in `verify`).
    Avx512,
}

impl IsaVariant {
    /// Width in bytes of one vector for this ISA.
    #[must_use]
    pub const fn vector_bytes(self) -> usize {
        match self {
            IsaVariant::Avx2 => 32,
            IsaVariant::Avx512 => 64,
        }
    }
}

/// Picks AVX-512 over AVX2 when both are usable, since the wider vector
/// halves the number of sweep iterations for the same buffer size.
#[cfg(target_arch = "x86_64")]
pub fn detect_isa() -> Result<IsaVariant, PlatformError> {
    if std::arch::is_x86_feature_detected!("avx512f") && std::arch::is_x86_feature_detected!("avx512bw")
    {
        Ok(IsaVariant::Avx512)
    } else if std::arch::is_x86_feature_detected!("avx2") {
        Ok(IsaVariant::Avx2)
    } else {
        Err(PlatformError::NoUsableIsa)
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn detect_isa() -> Result<IsaVariant, PlatformError> {
    Err(PlatformError::NoUsableIsa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_bytes_match_isa_width() {
        assert_eq!(IsaVariant::Avx2.vector_bytes(), 32);
        assert_eq!(IsaVariant::Avx512.vector_bytes(), 64);
    }
}
