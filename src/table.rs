//! RobinHoodMap: the public table over the bucket store and probing engine.

use crate::alloc::{Global, RawAllocator};
use crate::config::{Builder, Config};
use crate::error::Error;
use crate::iter::{Iter, IterMut, Keys, Values, ValuesMut};
use crate::probe::{self, Placed, Probe};
use crate::raw::RawBuckets;
use crate::reentrancy::DebugReentrancy;
use crate::strategy::{KeyEq, KeyHasher, Murmur3, StdEq};
use core::borrow::Borrow;
use core::fmt;
use core::mem;

/// Buckets plus the live count used for the load-factor check.
struct RawTable<K, V, A: RawAllocator> {
    buckets: RawBuckets<K, V, A>,
    occupied: usize,
}

impl<K, V, A: RawAllocator + Clone> RawTable<K, V, A> {
    #[inline]
    fn exceeds(&self, load_factor: f64) -> bool {
        self.occupied as f64 / self.buckets.len() as f64 > load_factor
    }

    fn place<H, E>(&mut self, probe: &Probe<H, E>, key: K, value: V, dedup: bool) -> Placed<V>
    where
        H: KeyHasher<K>,
        E: KeyEq<K>,
    {
        let hash = probe.hash(&key);
        let placed = probe.place(&mut self.buckets, hash, key, value, dedup);
        if let Placed::Inserted(_) = placed {
            self.occupied += 1;
        }
        placed
    }

    /// Double until the occupancy ratio is back within `load_factor`. Below
    /// a load factor of 0.5 one doubling is not always enough.
    fn make_room<H, E>(&mut self, probe: &Probe<H, E>, load_factor: f64) -> Result<(), Error>
    where
        H: KeyHasher<K>,
        E: KeyEq<K>,
    {
        while self.exceeds(load_factor) {
            self.grow_and_rehash(probe)?;
        }
        Ok(())
    }

    /// Double the bucket array and reinsert every live entry in array
    /// order. On allocation failure nothing changes.
    fn grow_and_rehash<H, E>(&mut self, probe: &Probe<H, E>) -> Result<(), Error>
    where
        H: KeyHasher<K>,
        E: KeyEq<K>,
    {
        let n = self
            .buckets
            .len()
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow)?;
        let fresh = RawBuckets::allocate(n, self.buckets.allocator().clone())?;
        let mut old = mem::replace(&mut self.buckets, fresh);
        self.occupied = 0;
        for e in old.drain() {
            self.place(probe, e.key, e.value, false);
        }
        Ok(())
    }
}

/// Open-addressing hash table with Robin Hood probing and backward-shift
/// deletion.
///
/// The bucket count is always a power of two. Before each insert, if the
/// occupancy ratio exceeds the configured load factor, the table doubles
/// and rehashes. Keys and values are stored inline in the buckets.
///
/// ```
/// use robinhood_table::RobinHoodMap;
///
/// let mut m = RobinHoodMap::with_capacity(8).unwrap();
/// assert_eq!(m.insert(1u32, "one").unwrap(), None);
/// assert_eq!(m.insert(1u32, "uno").unwrap(), Some("one"));
/// assert_eq!(m.get(&1), Some(&"uno"));
/// assert_eq!(m.remove(&1), Some("uno"));
/// assert!(m.is_empty());
/// ```
pub struct RobinHoodMap<K, V, H = Murmur3, E = StdEq, A: RawAllocator = Global> {
    table: RawTable<K, V, A>,
    probe: Probe<H, E>,
    config: Config,
    reentrancy: DebugReentrancy,
}

impl<K, V> RobinHoodMap<K, V> {
    /// Table with default strategies and at least `min_buckets` buckets.
    pub fn with_capacity(min_buckets: usize) -> Result<Self, Error> {
        Builder::new().capacity(min_buckets).build()
    }
}

impl<K, V, H, E, A: RawAllocator + Clone> RobinHoodMap<K, V, H, E, A> {
    pub(crate) fn from_parts(
        min_buckets: usize,
        config: Config,
        hasher: H,
        eq: E,
        alloc: A,
    ) -> Result<Self, Error> {
        let buckets = RawBuckets::allocate(min_buckets, alloc)?;
        Ok(Self {
            table: RawTable {
                buckets,
                occupied: 0,
            },
            probe: Probe {
                hasher,
                eq,
                seed: config.seed,
            },
            config,
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.table.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.table.occupied == 0
    }

    /// Number of buckets (a power of two).
    pub fn capacity(&self) -> usize {
        self.table.buckets.len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current ratio of occupied to total buckets.
    pub fn load_factor(&self) -> f64 {
        self.table.occupied as f64 / self.table.buckets.len() as f64
    }

    /// Longest displacement of any live entry, `None` when empty.
    pub fn max_probe_length(&self) -> Option<u32> {
        self.table.buckets.slots().iter().flatten().map(|e| e.psl).max()
    }

    /// Drop every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        self.table.buckets.clear();
        self.table.occupied = 0;
    }

    /// Insert or overwrite. Returns the previous value for an existing key.
    ///
    /// Fails only when growing the table fails. The entries already stored
    /// stay readable, and `key` and `value` are dropped before the error is
    /// returned.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error>
    where
        H: KeyHasher<K>,
        E: KeyEq<K>,
    {
        let _g = self.reentrancy.enter();
        self.table.make_room(&self.probe, self.config.load_factor)?;
        Ok(match self.table.place(&self.probe, key, value, true) {
            Placed::Inserted(_) => None,
            Placed::Replaced(_, old) => Some(old),
        })
    }

    /// Value for `key`, inserting `default()` first if the key is absent.
    /// `default` runs only on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> Result<&mut V, Error>
    where
        H: KeyHasher<K>,
        E: KeyEq<K>,
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter();
        let idx = match self.probe.find(&self.table.buckets, &key) {
            Some(idx) => idx,
            None => {
                self.table.make_room(&self.probe, self.config.load_factor)?;
                match self.table.place(&self.probe, key, default(), false) {
                    Placed::Inserted(idx) | Placed::Replaced(idx, _) => idx,
                }
            }
        };
        match self.table.buckets.slots_mut()[idx] {
            Some(ref mut e) => Ok(&mut e.value),
            None => unreachable!("placed slot {idx} is free"),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let _g = self.reentrancy.enter();
        let idx = self.probe.find(&self.table.buckets, key)?;
        self.table.buckets.slots()[idx]
            .as_ref()
            .map(|e| (&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let _g = self.reentrancy.enter();
        let idx = self.probe.find(&self.table.buckets, key)?;
        self.table.buckets.slots_mut()[idx]
            .as_mut()
            .map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let _g = self.reentrancy.enter();
        self.probe.find(&self.table.buckets, key).is_some()
    }

    /// Remove `key`, returning its value. Absent keys change nothing.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let _g = self.reentrancy.enter();
        let idx = self.probe.find(&self.table.buckets, key)?;
        let e = probe::remove_at(&mut self.table.buckets, idx)?;
        self.table.occupied -= 1;
        Some((e.key, e.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.table.buckets.slots(), self.table.occupied)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.table.buckets.slots_mut(), self.table.occupied)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { it: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { it: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            it: self.iter_mut(),
        }
    }

    /// Panics unless every live entry sits exactly `psl` steps past its
    /// home slot, displaced entries follow an occupant at most one step
    /// closer to home, and the live count matches.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self)
    where
        H: KeyHasher<K>,
    {
        let mask = self.table.buckets.mask();
        let slots = self.table.buckets.slots();
        let mut live = 0;
        for (idx, slot) in slots.iter().enumerate() {
            let Some(e) = slot else { continue };
            live += 1;
            let home = probe::home(self.probe.hash(&e.key), mask);
            assert_eq!(
                (home + e.psl as usize) & mask,
                idx,
                "psl {} does not lead back to home slot {home}",
                e.psl
            );
            if e.psl > 0 {
                let prev = slots[(idx + mask) & mask]
                    .as_ref()
                    .expect("displaced entry follows a free slot");
                assert!(
                    prev.psl + 1 >= e.psl,
                    "robin hood order broken at slot {idx}"
                );
            }
        }
        assert_eq!(live, self.table.occupied, "live count mismatch");
        assert!(self.capacity().is_power_of_two());
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H, E, A: RawAllocator + Clone> fmt::Debug
    for RobinHoodMap<K, V, H, E, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, H, E, A: RawAllocator + Clone> IntoIterator for &'a RobinHoodMap<K, V, H, E, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H, E, A: RawAllocator + Clone> IntoIterator
    for &'a mut RobinHoodMap<K, V, H, E, A>
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
