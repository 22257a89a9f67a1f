// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Position of a bucket in the table's bucket store
pub type BucketId = usize;

/// A key-value pair stored in a bucket, chain or overflow slot
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,

    /// Tombstone marker, only ever set by probing strategies
    pub(crate) deleted: bool,

    /// Home bucket of an entry that is stored outside of it
    ///
    /// Set for entries living in a chain or in the overflow area.
    pub(crate) chain_next: Option<BucketId>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            deleted: false,
            chain_next: None,
        }
    }

    pub(crate) fn displaced_from(mut self, home: BucketId) -> Self {
        self.chain_next = Some(home);
        self
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns `true` if the entry is a tombstone.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns `true` if the entry holds a live key.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.deleted
    }

    /// Returns the home bucket, if the entry was displaced out of it.
    #[must_use]
    pub fn chain_next(&self) -> Option<BucketId> {
        self.chain_next
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
