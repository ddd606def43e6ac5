/// Setup-time failures surfaced before the test loop starts.
///
/// Every variant maps to a single, stable process exit code chosen by the
/// `cli` crate; this crate only classifies the failure.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Neither AVX2 nor AVX-512F+BW is usable on this CPU.
    #[error("no usable SIMD ISA: AVX2 and AVX-512F/BW are both unavailable")]
    NoUsableIsa,

    /// The requested buffer size was not a positive multiple of the minimum
    /// alignment the current ISA requires.
    #[error("invalid buffer size {size} for {cpus} workers at {vector_bytes}-byte vectors")]
    InvalidBufferSize {
        size: usize,
        cpus: usize,
        vector_bytes: usize,
    },

    /// `mmap` failed while reserving the test buffer.
    #[error("failed to map {size} bytes: {source}")]
    Mmap {
        size: usize,
        #[source]
        source: std::io::Error,
    },

    /// `mlock` failed after the buffer was mapped; the process likely lacks
    /// `CAP_IPC_LOCK` or hit `RLIMIT_MEMLOCK`.
    #[error("failed to lock {size} bytes in RAM: {source}")]
    Mlock {
        size: usize,
        #[source]
        source: std::io::Error,
    },

    /// Could not read total physical RAM via `sysconf`.
    #[error("failed to query physical RAM size: {source}")]
    PhysicalRam {
        #[source]
        source: std::io::Error,
    },

    /// The CPU affinity mask could not be read.
    #[error("failed to query CPU affinity: {source}")]
    Affinity {
        #[source]
        source: std::io::Error,
    },

    /// Neither `RDSEED` nor `RDRAND` produced a non-zero pair within the
    /// retry budget.
    #[error("hardware entropy source exhausted after {attempts} attempts")]
    EntropyExhausted { attempts: u32 },

    /// Installing the SIGINT/SIGTERM handlers failed.
    #[error("failed to install shutdown signal handlers: {source}")]
    SignalHandler {
        #[source]
        source: std::io::Error,
    },
}
