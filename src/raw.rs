//! Bucket store: a power-of-two array of slots behind the injected
//! allocator.
//!
//! All raw-pointer handling for the table lives here. Everything above
//! this layer works on the safe `&[Slot]` / `&mut [Slot]` views.

use crate::alloc::RawAllocator;
use crate::error::Error;
use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::NonNull;

/// A live bucket. `psl` is the number of steps between the key's home
/// slot and the slot that holds it.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) psl: u32,
    pub(crate) key: K,
    pub(crate) value: V,
}

/// `None` marks a free slot.
pub(crate) type Slot<K, V> = Option<Entry<K, V>>;

pub(crate) struct RawBuckets<K, V, A: RawAllocator> {
    ptr: NonNull<Slot<K, V>>,
    len: usize,
    alloc: A,
    _owns: PhantomData<Slot<K, V>>,
}

// SAFETY: RawBuckets uniquely owns its slots, like Vec<Slot<K, V>>.
unsafe impl<K: Send, V: Send, A: RawAllocator + Send> Send for RawBuckets<K, V, A> {}
unsafe impl<K: Sync, V: Sync, A: RawAllocator + Sync> Sync for RawBuckets<K, V, A> {}

impl<K, V, A: RawAllocator> RawBuckets<K, V, A> {
    /// Allocate `min_buckets` rounded up to a power of two (at least one),
    /// every slot free.
    pub(crate) fn allocate(min_buckets: usize, alloc: A) -> Result<Self, Error> {
        let len = min_buckets
            .max(1)
            .checked_next_power_of_two()
            .ok_or(Error::CapacityOverflow)?;
        let layout = Self::layout(len)?;
        let raw = alloc
            .allocate(layout)
            .ok_or(Error::AllocFailed { layout })?;
        debug_assert_eq!(raw.as_ptr() as usize % layout.align(), 0);
        let ptr = raw.cast::<Slot<K, V>>();
        for i in 0..len {
            // SAFETY: i < len, and the `RawAllocator` contract makes the
            // block valid and aligned for `len` slots.
            unsafe { ptr.as_ptr().add(i).write(None) };
        }
        Ok(Self {
            ptr,
            len,
            alloc,
            _owns: PhantomData,
        })
    }

    fn layout(len: usize) -> Result<Layout, Error> {
        Layout::array::<Slot<K, V>>(len).map_err(|_| Error::CapacityOverflow)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn mask(&self) -> usize {
        self.len - 1
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        // SAFETY: `ptr` holds `len` initialized slots for the life of self.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        // SAFETY: as in `slots`, and `&mut self` gives exclusive access.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Move every live entry out, in array order. Slots not yet visited
    /// when the iterator is dropped keep their entries.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Entry<K, V>> + '_ {
        self.slots_mut().iter_mut().filter_map(Option::take)
    }

    /// Mark every slot free, dropping live entries.
    pub(crate) fn clear(&mut self) {
        for slot in self.slots_mut() {
            *slot = None;
        }
    }
}

impl<K, V, A: RawAllocator> Drop for RawBuckets<K, V, A> {
    fn drop(&mut self) {
        // SAFETY: slots are initialized; after dropping them in place the
        // block is released with the layout it was allocated with.
        unsafe {
            core::ptr::drop_in_place(self.slots_mut() as *mut [Slot<K, V>]);
            if let Ok(layout) = Self::layout(self.len) {
                self.alloc.deallocate(self.ptr.cast::<u8>(), layout);
            }
        }
    }
}
