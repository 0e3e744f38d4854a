//! Injected key strategies: hashing, key bytes and equality.
//!
//! A table is parameterized by one `KeyHasher` and one `KeyEq`. Lookups
//! through a borrowed form `Q` of the key type require both strategies
//! for `Q` as well, and the usual `Borrow` contract applies: `K` and its
//! borrowed form must hash and compare identically.

use core::hash::{BuildHasher, Hash, Hasher};

/// Maps a key and a seed to a 32-bit hash.
pub trait KeyHasher<Q: ?Sized> {
    fn hash_key(&self, key: &Q, seed: u32) -> u32;
}

/// Key equality. `stored` is the key held by the table, `query` the key
/// being looked up or inserted.
pub trait KeyEq<Q: ?Sized> {
    fn key_eq(&self, stored: &Q, query: &Q) -> bool;
}

/// Byte view of a key; the slice length is the key size fed to a byte
/// hash such as [`Murmur3Bytes`].
pub trait KeyBytes {
    fn key_bytes(&self) -> &[u8];
}

impl KeyBytes for [u8] {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> KeyBytes for [u8; N] {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl KeyBytes for Vec<u8> {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl KeyBytes for str {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl KeyBytes for String {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Default hasher: the key's `Hash` impl streamed into a seeded
/// MurmurHash3 (x86, 32-bit).
///
/// For primitive integer keys this hashes exactly the key's bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Murmur3;

impl<Q: ?Sized + Hash> KeyHasher<Q> for Murmur3 {
    #[inline]
    fn hash_key(&self, key: &Q, seed: u32) -> u32 {
        let mut h = mur3::Hasher32::with_seed(seed);
        key.hash(&mut h);
        h.finish() as u32
    }
}

/// One-shot MurmurHash3 (x86, 32-bit) over [`KeyBytes::key_bytes`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Murmur3Bytes;

impl<Q: ?Sized + KeyBytes> KeyHasher<Q> for Murmur3Bytes {
    #[inline]
    fn hash_key(&self, key: &Q, seed: u32) -> u32 {
        mur3::murmurhash3_x86_32(key.key_bytes(), seed)
    }
}

/// Adapts any `BuildHasher`. The seed is written ahead of the key and the
/// 64-bit output is folded to 32 bits.
#[derive(Clone, Debug, Default)]
pub struct StdHasher<S = hashbrown::hash_map::DefaultHashBuilder>(pub S);

impl<Q: ?Sized + Hash, S: BuildHasher> KeyHasher<Q> for StdHasher<S> {
    #[inline]
    fn hash_key(&self, key: &Q, seed: u32) -> u32 {
        let mut h = self.0.build_hasher();
        h.write_u32(seed);
        key.hash(&mut h);
        let x = h.finish();
        (x ^ (x >> 32)) as u32
    }
}

/// Closure hasher: `Fn(&Q, seed) -> u32`.
#[derive(Clone, Copy, Debug)]
pub struct FnHasher<F>(pub F);

impl<Q: ?Sized, F: Fn(&Q, u32) -> u32> KeyHasher<Q> for FnHasher<F> {
    #[inline]
    fn hash_key(&self, key: &Q, seed: u32) -> u32 {
        (self.0)(key, seed)
    }
}

/// Default equality: `PartialEq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdEq;

impl<Q: ?Sized + PartialEq> KeyEq<Q> for StdEq {
    #[inline]
    fn key_eq(&self, stored: &Q, query: &Q) -> bool {
        stored == query
    }
}

/// Closure equality: `Fn(&Q, &Q) -> bool`.
#[derive(Clone, Copy, Debug)]
pub struct FnEq<F>(pub F);

impl<Q: ?Sized, F: Fn(&Q, &Q) -> bool> KeyEq<Q> for FnEq<F> {
    #[inline]
    fn key_eq(&self, stored: &Q, query: &Q) -> bool {
        (self.0)(stored, query)
    }
}
