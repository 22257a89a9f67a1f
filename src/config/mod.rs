// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod capacity;

pub use capacity::{CapacityPolicy, DEFAULT_MAX_LOAD_FACTOR};

use crate::{
    directory::depth_for,
    hash::{HashAdapter, HashFn, KeyEq},
    overflow::default_overflow_size,
    Error, HashTable, Strategy,
};
use std::sync::Arc;

/// Default number of buckets
pub const DEFAULT_NUM_BUCKETS: usize = 8;

/// Default maximum directory depth of extensible hashing
pub const DEFAULT_MAX_GLOBAL_DEPTH: u32 = 20;

/// Upper bound for [`Config::max_global_depth`]
pub const MAX_GLOBAL_DEPTH_LIMIT: u32 = 32;

/// Hash table configuration builder
pub struct Config<K> {
    /// Collision resolution strategy
    pub strategy: Strategy,

    /// Number of buckets
    ///
    /// Extensible hashing rounds this up to the next power of two.
    pub num_buckets: usize,

    /// Number of entries a bucket holds before it overflows
    pub bucket_capacity: usize,

    /// Size of the overflow area of the separate overflow strategy
    ///
    /// Defaults to `max(4, num_buckets / 2)`.
    pub overflow_size: Option<usize>,

    /// Whether the table may grow
    pub capacity_policy: CapacityPolicy,

    /// Directory depth at which extensible hashing stops splitting a bucket
    /// and chains instead
    pub max_global_depth: u32,

    pub(crate) primary_hash: HashFn<K>,
    pub(crate) secondary_hash: Option<HashFn<K>>,
    pub(crate) key_eq: KeyEq<K>,
}

impl<K> Clone for Config<K> {
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy,
            num_buckets: self.num_buckets,
            bucket_capacity: self.bucket_capacity,
            overflow_size: self.overflow_size,
            capacity_policy: self.capacity_policy,
            max_global_depth: self.max_global_depth,
            primary_hash: self.primary_hash.clone(),
            secondary_hash: self.secondary_hash.clone(),
            key_eq: self.key_eq.clone(),
        }
    }
}

impl<K> std::fmt::Debug for Config<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("strategy", &self.strategy)
            .field("num_buckets", &self.num_buckets)
            .field("bucket_capacity", &self.bucket_capacity)
            .field("overflow_size", &self.overflow_size)
            .field("capacity_policy", &self.capacity_policy)
            .field("max_global_depth", &self.max_global_depth)
            .field("secondary_hash", &self.secondary_hash.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: PartialEq + 'static> Config<K> {
    /// Initializes a new config with the given primary hash function.
    ///
    /// Keys are compared with `==` unless [`Config::key_equality`] is set.
    pub fn new<F>(strategy: Strategy, primary_hash: F) -> Self
    where
        F: Fn(&K) -> i64 + Send + Sync + 'static,
    {
        Self::with_hash_fn(strategy, Arc::new(primary_hash))
    }

    /// Initializes a new config with a shared primary hash function,
    /// such as [`crate::hash::fx_hash`].
    pub fn with_hash_fn(strategy: Strategy, primary_hash: HashFn<K>) -> Self {
        Self {
            strategy,
            num_buckets: DEFAULT_NUM_BUCKETS,
            bucket_capacity: 1,
            overflow_size: None,
            capacity_policy: CapacityPolicy::Static,
            max_global_depth: DEFAULT_MAX_GLOBAL_DEPTH,
            primary_hash,
            secondary_hash: None,
            key_eq: Arc::new(|a: &K, b: &K| a == b),
        }
    }
}

impl<K> Config<K> {
    /// Sets the collision resolution strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the number of buckets.
    ///
    /// Defaults to 8.
    #[must_use]
    pub fn num_buckets(mut self, n: usize) -> Self {
        self.num_buckets = n;
        self
    }

    /// Sets the number of entries per bucket.
    ///
    /// Defaults to 1.
    #[must_use]
    pub fn bucket_capacity(mut self, n: usize) -> Self {
        self.bucket_capacity = n;
        self
    }

    /// Sets the overflow area size of the separate overflow strategy.
    ///
    /// Ignored by other strategies, and by dynamic tables, which give every
    /// bucket its own growable chain instead.
    #[must_use]
    pub fn overflow_size(mut self, n: usize) -> Self {
        self.overflow_size = Some(n);
        self
    }

    /// Sets the primary hash function.
    #[must_use]
    pub fn primary_hash<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> i64 + Send + Sync + 'static,
    {
        self.primary_hash = Arc::new(f);
        self
    }

    /// Sets the secondary hash function, used as probe step by double hashing.
    #[must_use]
    pub fn secondary_hash<F>(self, f: F) -> Self
    where
        F: Fn(&K) -> i64 + Send + Sync + 'static,
    {
        self.secondary_hash_fn(Arc::new(f))
    }

    /// Sets a shared secondary hash function.
    #[must_use]
    pub fn secondary_hash_fn(mut self, f: HashFn<K>) -> Self {
        self.secondary_hash = Some(f);
        self
    }

    /// Sets the key equality.
    #[must_use]
    pub fn key_equality<F>(mut self, f: F) -> Self
    where
        F: Fn(&K, &K) -> bool + Send + Sync + 'static,
    {
        self.key_eq = Arc::new(f);
        self
    }

    /// Sets the capacity policy.
    ///
    /// Defaults to [`CapacityPolicy::Static`].
    #[must_use]
    pub fn capacity_policy(mut self, policy: CapacityPolicy) -> Self {
        self.capacity_policy = policy;
        self
    }

    /// Sets the directory depth at which extensible hashing stops splitting.
    ///
    /// Defaults to 20.
    #[must_use]
    pub fn max_global_depth(mut self, depth: u32) -> Self {
        self.max_global_depth = depth;
        self
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a required hash function is missing or a value is out of range.
    pub fn validate(&self) -> crate::Result<()> {
        if self.num_buckets == 0 {
            return Err(Error::InvalidConfig("bucket count may not be zero"));
        }

        if self.bucket_capacity == 0 {
            return Err(Error::InvalidConfig("bucket capacity may not be zero"));
        }

        if self.strategy.requires_secondary_hash() && self.secondary_hash.is_none() {
            return Err(Error::MissingSecondaryHash(self.strategy));
        }

        if let Some(threshold) = self.capacity_policy.max_load_factor() {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(Error::InvalidConfig(
                    "max load factor must be positive and finite",
                ));
            }
        }

        if self.strategy == Strategy::ExtensibleHashing {
            if self.max_global_depth > MAX_GLOBAL_DEPTH_LIMIT {
                return Err(Error::InvalidConfig("max global depth is too large"));
            }

            if depth_for(self.num_buckets) > self.max_global_depth {
                return Err(Error::InvalidConfig(
                    "bucket count exceeds the maximum directory size",
                ));
            }
        }

        Ok(())
    }

    pub(crate) fn hasher(&self) -> HashAdapter<K> {
        HashAdapter::new(
            self.primary_hash.clone(),
            self.secondary_hash.clone(),
            self.key_eq.clone(),
        )
    }

    pub(crate) fn resolved_overflow_size(&self, num_buckets: usize) -> usize {
        self.overflow_size
            .unwrap_or_else(|| default_overflow_size(num_buckets))
    }

    /// Opens an empty table using the config.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the config is invalid, see [`Config::validate`].
    pub fn open<V>(self) -> crate::Result<HashTable<K, V>> {
        HashTable::new(self)
    }
}
