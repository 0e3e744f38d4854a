//! Table configuration and the builder that injects strategies.

use crate::alloc::{Global, RawAllocator};
use crate::error::Error;
use crate::strategy::{Murmur3, StdEq};
use crate::table::RobinHoodMap;

/// Seed mixed into every hash unless configured otherwise.
pub const DEFAULT_SEED: u32 = 0x9747_b28c;

/// Occupancy ratio above which an insert first doubles the table.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// Runtime parameters of a table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub seed: u32,
    pub load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    /// The load factor must lie in `(0, 1)`: at 1 or above an insert can
    /// find no free slot.
    pub fn validate(&self) -> Result<(), Error> {
        let lf = self.load_factor;
        if lf.is_finite() && lf > 0.0 && lf < 1.0 {
            Ok(())
        } else {
            Err(Error::InvalidLoadFactor(lf))
        }
    }
}

/// Builds a [`RobinHoodMap`] with injected hasher, equality and allocator.
///
/// ```
/// use robinhood_table::{Builder, Murmur3Bytes};
///
/// let mut m = Builder::new()
///     .capacity(64)
///     .seed(7)
///     .load_factor(0.75)
///     .hasher(Murmur3Bytes)
///     .build::<String, u32>()
///     .unwrap();
/// m.insert("a".to_string(), 1).unwrap();
/// assert_eq!(m.get("a"), Some(&1));
/// assert_eq!(m.capacity(), 64);
/// ```
#[derive(Clone, Debug)]
pub struct Builder<H = Murmur3, E = StdEq, A = Global> {
    min_buckets: usize,
    config: Config,
    hasher: H,
    eq: E,
    alloc: A,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            min_buckets: 1,
            config: Config::default(),
            hasher: Murmur3,
            eq: StdEq,
            alloc: Global,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, E, A> Builder<H, E, A> {
    /// Minimum bucket count; rounded up to a power of two on build.
    pub fn capacity(mut self, min_buckets: usize) -> Self {
        self.min_buckets = min_buckets;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.config.load_factor = load_factor;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn hasher<H2>(self, hasher: H2) -> Builder<H2, E, A> {
        Builder {
            min_buckets: self.min_buckets,
            config: self.config,
            hasher,
            eq: self.eq,
            alloc: self.alloc,
        }
    }

    pub fn key_eq<E2>(self, eq: E2) -> Builder<H, E2, A> {
        Builder {
            min_buckets: self.min_buckets,
            config: self.config,
            hasher: self.hasher,
            eq,
            alloc: self.alloc,
        }
    }

    pub fn allocator<A2: RawAllocator + Clone>(self, alloc: A2) -> Builder<H, E, A2> {
        Builder {
            min_buckets: self.min_buckets,
            config: self.config,
            hasher: self.hasher,
            eq: self.eq,
            alloc,
        }
    }
}

impl<H, E, A: RawAllocator + Clone> Builder<H, E, A> {
    /// Validate the configuration and allocate the bucket array.
    pub fn build<K, V>(self) -> Result<RobinHoodMap<K, V, H, E, A>, Error> {
        self.config.validate()?;
        RobinHoodMap::from_parts(self.min_buckets, self.config, self.hasher, self.eq, self.alloc)
    }
}
