use std::io;
use std::ptr::NonNull;

use crate::error::PlatformError;

/// A page-aligned, page-locked, anonymous mapping used as the engine's test
/// buffer.
///
/// Owns the mapping for its lifetime: `Drop` unlocks and unmaps it. The
/// buffer is handed to the engine as a borrowed `&mut [u8]`; `LockedBuffer`
/// itself never exposes a way to free or resize the memory out from under a
/// running sweep (§3: "the engine must not free or resize it").
pub struct LockedBuffer {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: the mapping is exclusively owned by this handle; sharing a
// `&LockedBuffer`/`&mut LockedBuffer` across threads is exactly as sound as
// sharing any other heap allocation, since nothing here relies on
// thread-local state.
unsafe impl Send for LockedBuffer {}
unsafe impl Sync for LockedBuffer {}

impl LockedBuffer {
    /// Allocates a buffer sized to `percent` percent of total physical RAM,
    /// rounded down to a multiple of `cpus * vector_bytes`, then locks it
    /// into RAM and zero-fills it.
    pub fn allocate(percent: u8, cpus: usize, vector_bytes: usize) -> Result<Self, PlatformError> {
        let total = physical_ram_bytes()?;
        let requested = (total as u128 * u128::from(percent) / 100) as usize;
        let granularity = cpus.saturating_mul(vector_bytes).max(vector_bytes);
        let size = (requested / granularity) * granularity;
        if size == 0 {
            return Err(PlatformError::InvalidBufferSize {
                size: requested,
                cpus,
                vector_bytes,
            });
        }
        Self::map_and_lock(size)
    }

    /// Maps and locks exactly `size` bytes. Exposed separately from
    /// [`Self::allocate`] so tests and the driver's own sizing logic can
    /// request a buffer without going through the physical-RAM percentage
    /// calculation.
    pub fn map_and_lock(size: usize) -> Result<Self, PlatformError> {
        // SAFETY: `mmap` with `MAP_ANON | MAP_PRIVATE` and a null address
        // hint asks the kernel to choose the mapping; no existing memory is
        // aliased. We check the return value below before constructing the
        // handle.
        let raw = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if raw == libc::MAP_FAILED {
            return Err(PlatformError::Mmap {
                size,
                source: io::Error::last_os_error(),
            });
        }

        // SAFETY: `raw` was just returned by a successful `mmap` of `size`
        // bytes with read/write permissions.
        let rc = unsafe { libc::mlock(raw, size) };
        if rc != 0 {
            let source = io::Error::last_os_error();
            // SAFETY: undo the mapping we just made; `raw`/`size` are the
            // exact pair passed to `mmap` above.
            unsafe {
                libc::munmap(raw, size);
            }
            return Err(PlatformError::Mlock { size, source });
        }

        // SAFETY: `raw` is non-null (checked above) and writable for `size`
        // bytes.
        unsafe {
            std::ptr::write_bytes(raw.cast::<u8>(), 0, size);
        }

        Ok(LockedBuffer {
            // SAFETY: `mmap` returned a non-`MAP_FAILED` pointer, which is
            // non-null.
            ptr: unsafe { NonNull::new_unchecked(raw.cast::<u8>()) },
            len: size,
        })
    }

    /// Number of bytes in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the whole buffer as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: `ptr` is valid and writable for `len` bytes for the
        // lifetime of `self`, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for LockedBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`len` are the exact pair used to map and lock this
        // region; no other code holds a reference to it once `self` drops.
        unsafe {
            libc::munlock(self.ptr.as_ptr().cast(), self.len);
            libc::munmap(self.ptr.as_ptr().cast(), self.len);
        }
    }
}

fn physical_ram_bytes() -> Result<u64, PlatformError> {
    // SAFETY: `sysconf` with these names is a pure query with no pointer
    // arguments; a negative return indicates the name is unsupported.
    let pages = unsafe { libc::sysconf(libc::_SC_PHYS_PAGES) };
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if pages < 0 || page_size < 0 {
        return Err(PlatformError::PhysicalRam {
            source: io::Error::last_os_error(),
        });
    }
    Ok(pages as u64 * page_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_and_lock_zero_fills() {
        let mut buf = LockedBuffer::map_and_lock(4096).expect("mmap+mlock should succeed");
        assert_eq!(buf.len(), 4096);
        assert!(buf.as_mut_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn allocate_rounds_down_to_granularity() {
        // A tiny percentage of whatever RAM this host has should still
        // round down cleanly to the chunk*vector granularity, or report a
        // size-too-small error rather than panicking.
        match LockedBuffer::allocate(1, 4, 64) {
            Ok(buf) => assert_eq!(buf.len() % (4 * 64), 0),
            Err(PlatformError::InvalidBufferSize { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
