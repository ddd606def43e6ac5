//! The buffer pointer crosses the scoped-thread fork-join boundary
//! (§4.A, §5) through this explicit `unsafe` wrapper rather than as a
//! borrowed slice, because the partitioning that makes concurrent access
//! sound (each worker touches only its own disjoint chunk) is a
//! discipline the iterator enforces, not something the type system sees.
//! The handle itself carries no guarantee beyond "the caller promises
//! disjoint chunk access."

#[derive(Clone, Copy)]
pub(crate) struct RawBufferHandle {
    ptr: *mut u8,
    len: usize,
}

// SAFETY: `Send`/`Sync` are sound only because every caller that builds a
// `RawBufferHandle` also partitions `[0, len)` into disjoint chunks and
// hands each worker thread exclusive access to its own chunk before the
// handle is ever dereferenced (enforced by `crate::iterator::sweep`).
unsafe impl Send for RawBufferHandle {}
unsafe impl Sync for RawBufferHandle {}

impl RawBufferHandle {
    pub(crate) fn new(buf: &mut [u8]) -> Self {
        RawBufferHandle {
            ptr: buf.as_mut_ptr(),
            len: buf.len(),
        }
    }

    /// Reinterprets this handle's `[start, start + len)` byte range as a
    /// mutable slice.
    ///
    /// # Safety
    /// The caller must own exclusive access to `[start, start + len)` for
    /// the duration the returned slice is live, and `start + len` must not
    /// exceed the handle's total length.
    pub(crate) unsafe fn chunk_mut(&self, start: usize, len: usize) -> &mut [u8] {
        debug_assert!(start + len <= self.len);
        std::slice::from_raw_parts_mut(self.ptr.add(start), len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_split_without_overlap() {
        let mut buf = vec![0u8; 16];
        let handle = RawBufferHandle::new(&mut buf);
        unsafe {
            handle.chunk_mut(0, 8).fill(1);
            handle.chunk_mut(8, 8).fill(2);
        }
        assert_eq!(&buf[..8], &[1; 8]);
        assert_eq!(&buf[8..], &[2; 8]);
    }
}
