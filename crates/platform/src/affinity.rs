use std::io;
use std::mem::MaybeUninit;

use crate::error::PlatformError;

/// Derives the worker count from the calling thread's CPU affinity mask,
/// capped by `override_threads` when present.
///
/// Per §4.F: "determine worker count (min of CPU affinity and configured
/// thread count)".
pub fn worker_count(override_threads: Option<usize>) -> Result<usize, PlatformError> {
    let affinity = affinity_popcount()?;
    let cpus = match override_threads {
        Some(t) => affinity.min(t),
        None => affinity,
    };
    Ok(cpus.max(1))
}

fn affinity_popcount() -> Result<usize, PlatformError> {
    // SAFETY: `set` is a plain-old-data struct; `CPU_ZERO` only writes to
    // it, and `sched_getaffinity(0, ..)` queries the calling thread, which
    // always exists.
    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::uninit();
        libc::CPU_ZERO(set.as_mut_ptr().as_mut().unwrap());
        let rc = libc::sched_getaffinity(
            0,
            std::mem::size_of::<libc::cpu_set_t>(),
            set.as_mut_ptr(),
        );
        if rc != 0 {
            return Err(PlatformError::Affinity {
                source: io::Error::last_os_error(),
            });
        }
        let set = set.assume_init();
        Ok(libc::CPU_COUNT(&set) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_at_least_one_worker() {
        let cpus = worker_count(None).expect("affinity query should succeed");
        assert!(cpus >= 1);
    }

    #[test]
    fn override_caps_worker_count() {
        let cpus = worker_count(Some(1)).expect("affinity query should succeed");
        assert_eq!(cpus, 1);
    }
}
