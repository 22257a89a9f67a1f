// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{BucketId, DirectorySlot, Entry, Strategy};
use std::fmt::Debug;

/// Point-in-time copy of a bucket
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BucketSnapshot<K, V> {
    /// Bucket position
    pub id: BucketId,

    /// Entries of the bucket, including tombstones
    pub entries: Vec<Entry<K, V>>,

    /// Entries of the bucket's overflow chain
    pub chain: Vec<Entry<K, V>>,
}

/// Point-in-time structural dump of a table
///
/// Produced by [`crate::HashTable::snapshot`] for inspection; it is a copy,
/// so nothing done to it affects the table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot<K, V> {
    /// Collision strategy
    pub strategy: Strategy,

    /// Current number of buckets
    pub num_buckets: usize,

    /// Entries per bucket
    pub bucket_capacity: usize,

    /// Number of live entries
    pub size: usize,

    /// `size / (num_buckets * bucket_capacity)`
    pub load_factor: f64,

    /// All buckets, in order
    pub buckets: Vec<BucketSnapshot<K, V>>,

    /// Overflow area slots (separate overflow strategy in static tables only)
    pub overflow: Vec<Option<Entry<K, V>>>,

    /// Directory slots (extensible hashing only)
    pub directory: Option<Vec<DirectorySlot>>,

    /// Directory depth (extensible hashing only)
    pub global_depth: Option<u32>,
}

impl<K, V> Snapshot<K, V> {
    /// Number of tombstones across buckets, chains and overflow area.
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        let in_buckets = self
            .buckets
            .iter()
            .flat_map(|b| b.entries.iter().chain(b.chain.iter()))
            .filter(|e| e.is_deleted())
            .count();

        let in_overflow = self
            .overflow
            .iter()
            .flatten()
            .filter(|e| e.is_deleted())
            .count();

        in_buckets + in_overflow
    }

    /// Number of buckets that have an overflow chain.
    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.buckets.iter().filter(|b| !b.chain.is_empty()).count()
    }

    /// Number of distinct buckets referenced by the directory.
    #[must_use]
    pub fn distinct_directory_targets(&self) -> Option<usize> {
        self.directory.as_ref().map(|slots| {
            let mut targets = slots.iter().map(|s| s.bucket).collect::<Vec<_>>();
            targets.sort_unstable();
            targets.dedup();
            targets.len()
        })
    }
}

fn write_entry<K: Debug, V: Debug>(
    f: &mut std::fmt::Formatter<'_>,
    entry: &Entry<K, V>,
) -> std::fmt::Result {
    if entry.is_deleted() {
        write!(f, " [{:?}]†", entry.key())
    } else {
        write!(f, " {:?}={:?}", entry.key(), entry.value())
    }
}

impl<K: Debug, V: Debug> std::fmt::Display for Snapshot<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "strategy={} buckets={} capacity={} size={} load={:.3}",
            self.strategy, self.num_buckets, self.bucket_capacity, self.size, self.load_factor,
        )?;

        for bucket in &self.buckets {
            write!(f, "  #{:<3}|", bucket.id)?;
            for entry in &bucket.entries {
                write_entry(f, entry)?;
            }
            if !bucket.chain.is_empty() {
                write!(f, " ->")?;
                for entry in &bucket.chain {
                    write_entry(f, entry)?;
                }
            }
            writeln!(f)?;
        }

        if !self.overflow.is_empty() {
            write!(f, "  overflow|")?;
            for slot in &self.overflow {
                match slot {
                    Some(entry) => write_entry(f, entry)?,
                    None => write!(f, " _")?,
                }
            }
            writeln!(f)?;
        }

        if let (Some(directory), Some(depth)) = (&self.directory, self.global_depth) {
            writeln!(f, "  directory (global depth {depth}):")?;
            for (idx, slot) in directory.iter().enumerate() {
                writeln!(
                    f,
                    "    {idx:0width$b} -> #{} (local depth {})",
                    slot.bucket,
                    slot.depth,
                    width = depth as usize,
                )?;
            }
        }

        Ok(())
    }
}
