// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod chained_linear;
mod chaining;
mod extensible;
mod probing;
mod separate_overflow;


use crate::{
    bucket::Bucket,
    config::CapacityPolicy,
    directory::{depth_for, Directory},
    hash::HashAdapter,
    overflow::OverflowArea,
    snapshot::{BucketSnapshot, Snapshot},
    Config, Entry, Strategy,
};
use probing::Probe;

/// Outcome of a strategy-level insert
pub(crate) enum Insert<K, V> {
    /// A new entry was stored
    Created,

    /// An existing live entry was overwritten in place
    Updated,

    /// No room under the strategy, the pair is handed back
    Full(K, V),
}

/// Storage of a table, one variant per collision strategy family
enum Layout<K, V> {
    /// Chaining, and separate overflow in dynamic tables
    Chained(Vec<Bucket<K, V>>),

    /// Linear probing and double hashing
    Probed {
        buckets: Vec<Bucket<K, V>>,
        probe: Probe,
    },

    ChainedProbed(Vec<Bucket<K, V>>),

    Overflow {
        buckets: Vec<Bucket<K, V>>,
        area: OverflowArea<K, V>,
    },

    Extensible {
        buckets: Vec<Bucket<K, V>>,
        directory: Directory,
    },
}

impl<K, V> Layout<K, V> {
    fn new(config: &Config<K>, num_buckets: usize) -> Self {
        let alloc = |n: usize| {
            (0..n)
                .map(|_| Bucket::with_capacity(config.bucket_capacity))
                .collect::<Vec<_>>()
        };

        match config.strategy {
            Strategy::Chaining => Self::Chained(alloc(num_buckets)),
            Strategy::LinearProbing => Self::Probed {
                buckets: alloc(num_buckets),
                probe: Probe::Linear,
            },
            Strategy::DoubleHashing => Self::Probed {
                buckets: alloc(num_buckets),
                probe: Probe::Double,
            },
            Strategy::ChainedLinearProbing => Self::ChainedProbed(alloc(num_buckets)),
            Strategy::SeparateOverflow => {
                if config.capacity_policy.is_dynamic() {
                    Self::Chained(alloc(num_buckets))
                } else {
                    Self::Overflow {
                        buckets: alloc(num_buckets),
                        area: OverflowArea::new(config.resolved_overflow_size(num_buckets)),
                    }
                }
            }
            Strategy::ExtensibleHashing => {
                let global_depth = depth_for(num_buckets).min(config.max_global_depth);
                let directory = Directory::new(global_depth);

                Self::Extensible {
                    buckets: alloc(directory.len()),
                    directory,
                }
            }
        }
    }

    fn buckets(&self) -> &[Bucket<K, V>] {
        match self {
            Self::Chained(buckets)
            | Self::ChainedProbed(buckets)
            | Self::Probed { buckets, .. }
            | Self::Overflow { buckets, .. }
            | Self::Extensible { buckets, .. } => buckets,
        }
    }

    fn buckets_mut(&mut self) -> &mut [Bucket<K, V>] {
        match self {
            Self::Chained(buckets)
            | Self::ChainedProbed(buckets)
            | Self::Probed { buckets, .. }
            | Self::Overflow { buckets, .. }
            | Self::Extensible { buckets, .. } => buckets,
        }
    }

    fn overflow(&self) -> Option<&OverflowArea<K, V>> {
        match self {
            Self::Overflow { area, .. } => Some(area),
            _ => None,
        }
    }

    fn directory(&self) -> Option<&Directory> {
        match self {
            Self::Extensible { directory, .. } => Some(directory),
            _ => None,
        }
    }

    fn iter_live(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.buckets()
            .iter()
            .flat_map(Bucket::iter_live)
            .chain(self.overflow().into_iter().flat_map(OverflowArea::iter_live))
    }

    /// Takes all live entries out, leaving the storage empty.
    fn drain_live(&mut self) -> Vec<(K, V)> {
        let mut survivors = self
            .buckets_mut()
            .iter_mut()
            .flat_map(Bucket::drain_live)
            .map(Entry::into_pair)
            .collect::<Vec<_>>();

        if let Self::Overflow { area, .. } = self {
            survivors.extend(area.drain_live().map(Entry::into_pair));
        }

        survivors
    }
}

/// A bucketed hash table with a configurable collision strategy
///
/// Keys are hashed by the caller-supplied functions of its [`Config`].
///
/// The table is single-threaded: every operation runs to completion on the
/// caller's thread, and mutation requires `&mut self`.
pub struct HashTable<K, V> {
    config: Config<K>,
    hasher: HashAdapter<K>,
    layout: Layout<K, V>,
    size: usize,
}

impl<K, V> std::fmt::Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashTable")
            .field("strategy", &self.config.strategy)
            .field("num_buckets", &self.num_buckets())
            .field("bucket_capacity", &self.config.bucket_capacity)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl<K, V> HashTable<K, V> {
    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the config is invalid, see [`Config::validate`].
    pub fn new(config: Config<K>) -> crate::Result<Self> {
        config.validate()?;

        log::debug!("Creating hash table: {config:?}");

        Ok(Self {
            hasher: config.hasher(),
            layout: Layout::new(&config, config.num_buckets),
            config,
            size: 0,
        })
    }

    /// Returns the configuration the table was built with.
    #[must_use]
    pub fn config(&self) -> &Config<K> {
        &self.config
    }

    /// Returns the collision strategy.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// Returns the capacity policy.
    #[must_use]
    pub fn capacity_policy(&self) -> CapacityPolicy {
        self.config.capacity_policy
    }

    /// Returns the current number of buckets.
    ///
    /// This grows past the configured count in dynamic tables, and through
    /// bucket splits in extensible hashing.
    #[must_use]
    pub fn num_buckets(&self) -> usize {
        self.layout.buckets().len()
    }

    /// Returns the number of entries a bucket holds.
    #[must_use]
    pub fn bucket_capacity(&self) -> usize {
        self.config.bucket_capacity
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the table holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `size / (num_buckets * bucket_capacity)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        let slots = self.num_buckets().saturating_mul(self.config.bucket_capacity);
        if slots == 0 {
            return 0.0;
        }
        self.size as f64 / slots as f64
    }

    /// Iterates over all live entries, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.layout.iter_live().map(|e| (e.key(), e.value()))
    }

    /// Inserts a key-value pair, overwriting the value of an existing key.
    ///
    /// Returns `false` if a static table has no room for a new key under its
    /// strategy. Dynamic tables grow instead and always return `true`.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut pair = (key, value);

        loop {
            let (key, value) = pair;

            match self.try_insert(key, value) {
                Insert::Created => {
                    self.size += 1;

                    if self.should_grow() {
                        self.grow(Vec::new());
                    }

                    return true;
                }
                Insert::Updated => return true,
                Insert::Full(key, value) => {
                    if !self.config.capacity_policy.is_dynamic() {
                        log::warn!(
                            "Table is full ({} strategy, {} buckets, {} entries), rejecting insert",
                            self.config.strategy,
                            self.num_buckets(),
                            self.size,
                        );
                        return false;
                    }

                    self.grow(Vec::new());
                    pair = (key, value);
                }
            }
        }
    }

    /// Returns the value of the given key, or `None` if it is not found.
    #[must_use]
    pub fn search(&self, key: &K) -> Option<&V> {
        let hasher = &self.hasher;

        match &self.layout {
            Layout::Chained(buckets) => chaining::search(buckets, hasher, key),
            Layout::Probed { buckets, probe } => probing::search(buckets, hasher, *probe, key),
            Layout::ChainedProbed(buckets) => chained_linear::search(buckets, hasher, key),
            Layout::Overflow { buckets, area } => {
                separate_overflow::search(buckets, area, hasher, key)
            }
            Layout::Extensible { buckets, directory } => {
                extensible::search(buckets, directory, hasher, key)
            }
        }
    }

    /// Returns `true` if the table holds a live entry for the key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Deletes the given key.
    ///
    /// Probing strategies leave a tombstone behind; the others splice the
    /// entry out.
    ///
    /// Returns `true` if a live entry was found.
    pub fn delete(&mut self, key: &K) -> bool {
        let hasher = &self.hasher;

        let deleted = match &mut self.layout {
            Layout::Chained(buckets) => chaining::delete(buckets, hasher, key),
            Layout::Probed { buckets, probe } => probing::delete(buckets, hasher, *probe, key),
            Layout::ChainedProbed(buckets) => chained_linear::delete(buckets, hasher, key),
            Layout::Overflow { buckets, area } => {
                separate_overflow::delete(buckets, area, hasher, key)
            }
            Layout::Extensible { buckets, directory } => {
                extensible::delete(buckets, directory, hasher, key)
            }
        };

        if deleted {
            self.size -= 1;
        }

        deleted
    }

    /// Resets to an empty table of the same configuration.
    pub fn clear(&mut self) {
        log::debug!("Clearing hash table ({} entries)", self.size);

        self.layout = Layout::new(&self.config, self.config.num_buckets);
        self.size = 0;
    }

    /// Rebuilds the table with a new configuration and reinserts all live entries.
    ///
    /// Returns the entries that did not fit into the new static layout; dynamic
    /// tables grow until everything fits, so the list is then always empty.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the config is invalid, in which case the table is left untouched.
    pub fn configure(&mut self, config: Config<K>) -> crate::Result<Vec<(K, V)>> {
        config.validate()?;

        log::debug!("Reconfiguring hash table: {config:?}");

        let survivors = self.layout.drain_live();

        self.hasher = config.hasher();
        self.config = config;

        let rejected = self.rebuild(self.config.num_buckets, survivors);

        if self.config.capacity_policy.is_dynamic() && (!rejected.is_empty() || self.should_grow()) {
            self.grow(rejected);
            return Ok(Vec::new());
        }

        if !rejected.is_empty() {
            log::warn!(
                "{} entries did not fit into the reconfigured table",
                rejected.len()
            );
        }

        Ok(rejected)
    }

    /// Produces a read-only structural dump.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let buckets = self
            .layout
            .buckets()
            .iter()
            .enumerate()
            .map(|(id, bucket)| BucketSnapshot {
                id,
                entries: bucket.entries().to_vec(),
                chain: bucket
                    .chain()
                    .map(|chain| chain.entries().to_vec())
                    .unwrap_or_default(),
            })
            .collect();

        Snapshot {
            strategy: self.config.strategy,
            num_buckets: self.num_buckets(),
            bucket_capacity: self.config.bucket_capacity,
            size: self.size,
            load_factor: self.load_factor(),
            buckets,
            overflow: self
                .layout
                .overflow()
                .map(|area| area.slots().to_vec())
                .unwrap_or_default(),
            directory: self.layout.directory().map(|d| d.slots().to_vec()),
            global_depth: self.layout.directory().map(Directory::global_depth),
        }
    }

    /// Dispatches an insert to the strategy, without touching `size`.
    fn try_insert(&mut self, key: K, value: V) -> Insert<K, V> {
        let hasher = &self.hasher;

        match &mut self.layout {
            Layout::Chained(buckets) => chaining::insert(buckets, hasher, key, value),
            Layout::Probed { buckets, probe } => {
                probing::insert(buckets, hasher, *probe, key, value)
            }
            Layout::ChainedProbed(buckets) => chained_linear::insert(buckets, hasher, key, value),
            Layout::Overflow { buckets, area } => {
                separate_overflow::insert(buckets, area, hasher, key, value)
            }
            Layout::Extensible { buckets, directory } => extensible::insert(
                buckets,
                directory,
                hasher,
                self.config.max_global_depth,
                key,
                value,
            ),
        }
    }

    fn should_grow(&self) -> bool {
        // NOTE: Extensible hashing grows by splitting buckets
        self.config.strategy != Strategy::ExtensibleHashing
            && self.config.capacity_policy.should_grow(self.load_factor())
    }

    /// Replaces the storage with `num_buckets` empty buckets and reinserts the
    /// given pairs, returning the ones that did not fit.
    fn rebuild(&mut self, num_buckets: usize, pairs: Vec<(K, V)>) -> Vec<(K, V)> {
        self.layout = Layout::new(&self.config, num_buckets);
        self.size = 0;

        let mut rejected = Vec::new();

        for (key, value) in pairs {
            match self.try_insert(key, value) {
                Insert::Created => self.size += 1,
                Insert::Updated => {}
                Insert::Full(key, value) => rejected.push((key, value)),
            }
        }

        rejected
    }

    /// Doubles the bucket count until all live entries plus `pending` fit
    /// within the load factor threshold.
    fn grow(&mut self, mut pending: Vec<(K, V)>) {
        let mut num_buckets = self.num_buckets();

        loop {
            num_buckets = num_buckets.saturating_mul(2);

            log::debug!(
                "Growing hash table to {num_buckets} buckets (load factor {:.3})",
                self.load_factor(),
            );

            let mut pairs = self.layout.drain_live();
            pairs.append(&mut pending);

            pending = self.rebuild(num_buckets, pairs);

            if pending.is_empty() && !self.should_grow() {
                break;
            }
        }
    }
}
