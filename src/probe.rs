//! Probing engine: home slots, the lookup walk, Robin Hood placement and
//! backward-shift removal.
//!
//! Walk invariant: scanning forward from a key's home slot, the key can
//! only sit before the first free slot and before the first occupant whose
//! PSL is smaller than the current distance. Placement keeps this true by
//! swapping with such occupants; removal keeps it true by shifting the
//! displaced tail of a chain one slot back.

use crate::alloc::RawAllocator;
use crate::raw::{Entry, RawBuckets};
use crate::strategy::{KeyEq, KeyHasher};
use core::borrow::Borrow;
use core::mem;

/// Outcome of [`Probe::place`]. The index is the slot now holding the
/// caller's key.
#[derive(Debug)]
pub(crate) enum Placed<V> {
    Inserted(usize),
    Replaced(usize, V),
}

#[derive(Clone, Debug)]
pub(crate) struct Probe<H, E> {
    pub(crate) hasher: H,
    pub(crate) eq: E,
    pub(crate) seed: u32,
}

#[inline]
pub(crate) fn home(hash: u32, mask: usize) -> usize {
    hash as usize & mask
}

impl<H, E> Probe<H, E> {
    #[inline]
    pub(crate) fn hash<Q>(&self, key: &Q) -> u32
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        self.hasher.hash_key(key, self.seed)
    }

    /// Slot index holding `key`, if present.
    pub(crate) fn find<K, V, A, Q>(&self, buckets: &RawBuckets<K, V, A>, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
        A: RawAllocator,
    {
        let mask = buckets.mask();
        let slots = buckets.slots();
        let mut idx = home(self.hash(key), mask);
        for dist in 0..slots.len() {
            match &slots[idx] {
                None => return None,
                Some(e) if (e.psl as usize) < dist => return None,
                Some(e) if self.eq.key_eq(Borrow::<Q>::borrow(&e.key), key) => return Some(idx),
                Some(_) => {}
            }
            idx = (idx + 1) & mask;
        }
        None
    }

    /// Robin Hood insertion of `key` starting at its home slot.
    ///
    /// With `dedup` set, an equal key met before the first displacement has
    /// its value overwritten in place. Callers that know the key is absent
    /// (rehash, insert after a miss) pass `false` and skip equality calls.
    ///
    /// # Panics
    /// If a full cycle of the array finds no free slot. The load-factor
    /// check before every insert rules this out, so reaching it means the
    /// table is corrupt.
    pub(crate) fn place<K, V, A>(
        &self,
        buckets: &mut RawBuckets<K, V, A>,
        hash: u32,
        key: K,
        value: V,
        dedup: bool,
    ) -> Placed<V>
    where
        E: KeyEq<K>,
        A: RawAllocator,
    {
        let mask = buckets.mask();
        let slots = buckets.slots_mut();
        let mut idx = home(hash, mask);
        let mut cand = Entry { psl: 0, key, value };
        // Set once the caller's entry has been swapped into a slot; from
        // then on `cand` carries a displaced occupant.
        let mut landed: Option<usize> = None;

        for _ in 0..slots.len() {
            match slots[idx] {
                None => {
                    slots[idx] = Some(cand);
                    return Placed::Inserted(landed.unwrap_or(idx));
                }
                Some(ref mut e) => {
                    if dedup && landed.is_none() && self.eq.key_eq(&e.key, &cand.key) {
                        let old = mem::replace(&mut e.value, cand.value);
                        return Placed::Replaced(idx, old);
                    }
                    if e.psl < cand.psl {
                        mem::swap(e, &mut cand);
                        landed.get_or_insert(idx);
                    }
                }
            }
            cand.psl += 1;
            idx = (idx + 1) & mask;
        }
        panic!(
            "probe chain exhausted: no free slot among {} buckets",
            slots.len()
        );
    }
}

/// Take the entry at `idx` and close the gap by backward shift.
///
/// Every following occupant that is not at its home slot moves one slot
/// back with its PSL reduced by one, until a free slot or an occupant with
/// PSL 0 ends the chain. No tombstone is left behind.
pub(crate) fn remove_at<K, V, A: RawAllocator>(
    buckets: &mut RawBuckets<K, V, A>,
    idx: usize,
) -> Option<Entry<K, V>> {
    let mask = buckets.mask();
    let slots = buckets.slots_mut();
    let removed = slots[idx].take()?;
    let mut hole = idx;
    loop {
        let next = (hole + 1) & mask;
        match slots[next].as_mut() {
            Some(e) if e.psl > 0 => e.psl -= 1,
            _ => break,
        }
        slots.swap(hole, next);
        hole = next;
    }
    Some(removed)
}
