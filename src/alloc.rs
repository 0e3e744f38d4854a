//! Raw allocator seam for the bucket array.

use core::alloc::Layout;
use core::ptr::NonNull;

/// Memory source for bucket arrays.
///
/// `allocate` returns `None` on exhaustion.
///
/// # Safety
/// The table writes `layout.size()` bytes through every pointer that
/// `allocate` returns. A returned block must be valid for reads and writes
/// of at least `layout.size()` bytes, aligned to `layout.align()`, and must
/// not alias any other live block until it is passed to `deallocate`.
///
/// A plain `impl` is rejected:
///
/// ```compile_fail
/// use core::alloc::Layout;
/// use core::ptr::NonNull;
/// use robinhood_table::RawAllocator;
///
/// struct Undersized;
///
/// impl RawAllocator for Undersized {
///     fn allocate(&self, _layout: Layout) -> Option<NonNull<u8>> {
///         Some(NonNull::dangling())
///     }
///     unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {}
/// }
/// ```
pub unsafe trait RawAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Release a block obtained from `allocate`.
    ///
    /// # Safety
    /// `ptr` must come from `self.allocate(layout)` with the same `layout`
    /// and must not have been released already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process heap (`std::alloc`).
#[derive(Clone, Copy, Debug, Default)]
pub struct Global;

// SAFETY: forwards to the process heap, which meets the block contract.
unsafe impl RawAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            // Zero-sized requests never touch the heap.
            return NonNull::new(layout.align() as *mut u8);
        }
        // SAFETY: layout has non-zero size.
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            std::alloc::dealloc(ptr.as_ptr(), layout);
        }
    }
}
