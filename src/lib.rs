//! robinhood-table: an open-addressing hash table with Robin Hood
//! probing and backward-shift deletion.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a flat, power-of-two bucket array whose probe lengths stay
//!   short and evenly spread, with deletion that leaves no tombstones.
//! - Layers:
//!   - `raw::RawBuckets<K, V, A>`: the bucket store. Owns the slot array,
//!     allocated through an injected `RawAllocator`; every slot is either
//!     free or holds `(psl, key, value)`.
//!   - `probe::Probe<H, E>`: the probing engine. Computes home slots from
//!     the injected hasher and seed, walks chains for lookup, places keys
//!     by the Robin Hood rule, and closes gaps by backward shift.
//!   - `RobinHoodMap<K, V, H, E, A>`: public API. Runs the load-factor
//!     check before each insert and doubles the table when it trips.
//!
//! Constraints
//! - Single owner: no locks or atomics. The map is `Send` when its parts
//!   are and never `Sync`; share it behind one exclusive lock.
//! - No per-entry heap allocations beyond the bucket array itself.
//! - Bucket count is always a power of two, so indexing masks the hash.
//! - Unique keys; inserting an existing key overwrites its value.
//!
//! Probe sequence length (PSL)
//! - An entry's PSL is its distance from its home slot. Along any chain,
//!   a lookup for `k` can stop at the first free slot or the first
//!   occupant whose PSL is below the current distance.
//! - Insert swaps the carried entry with any occupant that has a smaller
//!   PSL ("take from the rich"), which bounds the variance of PSLs.
//! - Remove shifts the displaced tail of the chain one slot back, each
//!   shifted entry's PSL dropping by one, until a free slot or an entry
//!   at its home slot.
//! - PSL is stored as `u32`, so chains are bounded by the bucket count
//!   rather than by the width of the field.
//!
//! Growth
//! - Before an insert, while `len / capacity` exceeds the load factor
//!   (default 0.5), a table of twice the size is allocated and every live
//!   entry is rehashed into it in array order. Growth is stop-the-world.
//! - Load factors must lie in `(0, 1)`, which guarantees a free slot for
//!   every insert. A probe walk that still finds none panics: the table
//!   is corrupt and there is no safe partial insert.
//!
//! Failure boundaries
//! - Allocation failure (construction or growth) is returned as
//!   [`Error`]; a failed growth leaves the stored entries untouched and
//!   drops the key and value being inserted.
//! - Misses and removal of absent keys are not errors.
//! - User code (hash and equality strategies) runs during probe walks; a
//!   debug-only reentrancy guard rejects calls back into the same table
//!   from there.

mod alloc;
mod config;
mod error;
mod iter;
mod probe;
mod raw;
mod reentrancy;
pub mod strategy;
mod table;
#[cfg(test)]
mod table_proptest;

// Public surface
pub use alloc::{Global, RawAllocator};
pub use config::{Builder, Config, DEFAULT_LOAD_FACTOR, DEFAULT_SEED};
pub use error::Error;
pub use iter::{Iter, IterMut, Keys, Values, ValuesMut};
pub use strategy::{
    FnEq, FnHasher, KeyBytes, KeyEq, KeyHasher, Murmur3, Murmur3Bytes, StdEq, StdHasher,
};
pub use table::RobinHoodMap;
