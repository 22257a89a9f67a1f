// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{hash::HashAdapter, Entry};

/// Where a new entry can go inside a bucket
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Never-used space at the end of the bucket
    Vacant,

    /// Reusable tombstone at the given position
    Tombstone(usize),
}

/// An ordered, bounded sequence of entries
///
/// A bucket may own one lazily allocated, unbounded overflow chain.
#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
    capacity: usize,
    chain: Option<Box<Bucket<K, V>>>,

    /// Number of live entries whose probe sequence passed through this bucket
    /// while it was full (chained linear probing only)
    displaced: usize,
}

impl<K, V> Bucket<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(16)),
            capacity,
            chain: None,
            displaced: 0,
        }
    }

    fn unbounded() -> Self {
        Self::with_capacity(usize::MAX)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Position of the live entry with the given key.
    pub fn position(&self, key: &K, hasher: &HashAdapter<K>) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.is_live() && hasher.eq(&e.key, key))
    }

    pub fn get(&self, key: &K, hasher: &HashAdapter<K>) -> Option<&Entry<K, V>> {
        self.entries
            .iter()
            .find(|e| e.is_live() && hasher.eq(&e.key, key))
    }

    pub fn get_mut(&mut self, key: &K, hasher: &HashAdapter<K>) -> Option<&mut Entry<K, V>> {
        self.entries
            .iter_mut()
            .find(|e| e.is_live() && hasher.eq(&e.key, key))
    }

    /// First reusable tombstone, else vacant space, else `None`.
    pub fn free_slot(&self) -> Option<Slot> {
        if let Some(idx) = self.entries.iter().position(Entry::is_deleted) {
            Some(Slot::Tombstone(idx))
        } else if self.is_full() {
            None
        } else {
            Some(Slot::Vacant)
        }
    }

    /// Stores the entry in a slot previously returned by [`Bucket::free_slot`].
    pub fn put_at(&mut self, slot: Slot, entry: Entry<K, V>) {
        match slot {
            Slot::Tombstone(idx) => {
                if let Some(old) = self.entries.get_mut(idx) {
                    debug_assert!(old.is_deleted(), "should only overwrite tombstones");
                    *old = entry;
                } else {
                    self.entries.push(entry);
                }
            }
            Slot::Vacant => {
                debug_assert!(!self.is_full(), "bucket should have room");
                self.entries.push(entry);
            }
        }
    }

    /// Stores the entry if there is room, otherwise hands it back.
    pub fn put(&mut self, entry: Entry<K, V>) -> Result<(), Entry<K, V>> {
        match self.free_slot() {
            Some(slot) => {
                self.put_at(slot, entry);
                Ok(())
            }
            None => Err(entry),
        }
    }

    /// Marks the live entry with the given key as deleted.
    pub fn tombstone(&mut self, key: &K, hasher: &HashAdapter<K>) -> bool {
        match self.get_mut(key, hasher) {
            Some(entry) => {
                entry.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Physically removes the live entry with the given key.
    pub fn splice(&mut self, key: &K, hasher: &HashAdapter<K>) -> Option<Entry<K, V>> {
        let idx = self.position(key, hasher)?;
        Some(self.entries.remove(idx))
    }

    pub fn chain(&self) -> Option<&Self> {
        self.chain.as_deref()
    }

    pub fn chain_mut(&mut self) -> Option<&mut Self> {
        self.chain.as_deref_mut()
    }

    /// Returns the overflow chain, allocating it on first use.
    pub fn chain_or_alloc(&mut self) -> &mut Self {
        self.chain.get_or_insert_with(|| Box::new(Self::unbounded()))
    }

    /// Appends to the overflow chain, allocating it on first use.
    pub fn push_chain(&mut self, entry: Entry<K, V>) {
        self.chain_or_alloc().entries.push(entry);
    }

    /// Frees the overflow chain if it holds no entries.
    pub fn release_empty_chain(&mut self) {
        if self.chain.as_ref().is_some_and(|c| c.entries.is_empty()) {
            self.chain = None;
        }
    }

    /// Pulls chain entries up into free base slots and frees an emptied chain.
    pub fn compact(&mut self) {
        let Some(chain) = self.chain.as_deref_mut() else {
            return;
        };

        while self.entries.len() < self.capacity && !chain.entries.is_empty() {
            let mut entry = chain.entries.remove(0);
            entry.chain_next = None;
            self.entries.push(entry);
        }

        if chain.entries.is_empty() {
            self.chain = None;
        }
    }

    pub fn displaced(&self) -> usize {
        self.displaced
    }

    pub fn add_displaced(&mut self) {
        self.displaced += 1;
    }

    pub fn remove_displaced(&mut self) {
        debug_assert!(self.displaced > 0, "displaced counter underflow");
        self.displaced = self.displaced.saturating_sub(1);
    }

    /// Live entries of the bucket, then of its chain.
    pub fn iter_live(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.entries
            .iter()
            .chain(self.chain().into_iter().flat_map(|c| c.entries.iter()))
            .filter(|e| e.is_live())
    }

    /// Takes all live entries out of the bucket and its chain.
    pub fn drain_live(&mut self) -> impl Iterator<Item = Entry<K, V>> {
        let chain = self.chain.take().map(|c| c.entries).unwrap_or_default();
        self.displaced = 0;

        std::mem::take(&mut self.entries)
            .into_iter()
            .chain(chain)
            .filter(Entry::is_live)
    }
}
