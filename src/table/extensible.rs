// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Extensible hashing: the low `globalDepth` bits of `h1(k)` select a directory
//! slot, which names the bucket. A full bucket is split in two and its entries
//! redistributed, doubling the directory first if the bucket's local depth
//! already equals the global depth.
//!
//! Entries whose hashes agree on all bits up to the maximum depth cannot be
//! separated by splitting; they overflow into the bucket's chain instead.

use super::{chaining, Insert};
use crate::{
    bucket::Bucket,
    directory::{low_bits, Directory, DirectorySlot},
    hash::HashAdapter,
    Entry,
};

/// Returns `true` if splitting the bucket can make room for the key.
fn can_split<K, V>(
    bucket: &Bucket<K, V>,
    hasher: &HashAdapter<K>,
    hash: i64,
    local_depth: u32,
    max_depth: u32,
) -> bool {
    if local_depth >= max_depth {
        return false;
    }

    let bits = low_bits(hash, max_depth);

    bucket
        .iter_live()
        .any(|e| low_bits(hasher.primary(e.key()), max_depth) != bits)
}

fn split<K, V>(
    buckets: &mut Vec<Bucket<K, V>>,
    directory: &mut Directory,
    hasher: &HashAdapter<K>,
    slot: DirectorySlot,
    bucket_capacity: usize,
) {
    if slot.depth >= directory.global_depth() {
        directory.double();
    }

    let sibling = buckets.len();
    buckets.push(Bucket::with_capacity(bucket_capacity));
    directory.split(slot.bucket, sibling);

    let entries = buckets
        .get_mut(slot.bucket)
        .map(|bucket| bucket.drain_live().collect::<Vec<_>>())
        .unwrap_or_default();

    let mut moved = 0;

    for mut entry in entries {
        let target = directory
            .slot(hasher.primary(entry.key()))
            .map_or(slot.bucket, |s| s.bucket);

        if target == sibling {
            moved += 1;
        }

        if let Some(bucket) = buckets.get_mut(target) {
            entry.chain_next = None;

            if let Err(mut entry) = bucket.put(entry) {
                entry.chain_next = Some(target);
                bucket.push_chain(entry);
            }
        }
    }

    log::debug!(
        "Split bucket {} (local depth {} -> {}), moved {moved} entries to bucket {sibling}",
        slot.bucket,
        slot.depth,
        slot.depth + 1,
    );
}

pub fn insert<K, V>(
    buckets: &mut Vec<Bucket<K, V>>,
    directory: &mut Directory,
    hasher: &HashAdapter<K>,
    max_depth: u32,
    key: K,
    value: V,
) -> Insert<K, V> {
    let hash = hasher.primary(&key);

    loop {
        let Some(slot) = directory.slot(hash) else {
            return Insert::Full(key, value);
        };

        let Some(bucket) = buckets.get_mut(slot.bucket) else {
            return Insert::Full(key, value);
        };

        if let Some(entry) = chaining::find_mut(bucket, &key, hasher) {
            entry.value = value;
            return Insert::Updated;
        }

        if !bucket.is_full() {
            return match bucket.put(Entry::new(key, value)) {
                Ok(()) => Insert::Created,
                Err(entry) => {
                    let (key, value) = entry.into_pair();
                    Insert::Full(key, value)
                }
            };
        }

        if !can_split(bucket, hasher, hash, slot.depth, max_depth) {
            log::trace!(
                "Bucket {} cannot be split further, chaining",
                slot.bucket
            );
            bucket.push_chain(Entry::new(key, value).displaced_from(slot.bucket));
            return Insert::Created;
        }

        let capacity = bucket.capacity();
        split(buckets, directory, hasher, slot, capacity);
    }
}

pub fn search<'a, K, V>(
    buckets: &'a [Bucket<K, V>],
    directory: &Directory,
    hasher: &HashAdapter<K>,
    key: &K,
) -> Option<&'a V> {
    let slot = directory.slot(hasher.primary(key))?;
    let bucket = buckets.get(slot.bucket)?;
    chaining::find(bucket, key, hasher).map(Entry::value)
}

pub fn delete<K, V>(
    buckets: &mut [Bucket<K, V>],
    directory: &Directory,
    hasher: &HashAdapter<K>,
    key: &K,
) -> bool {
    let Some(slot) = directory.slot(hasher.primary(key)) else {
        return false;
    };

    buckets
        .get_mut(slot.bucket)
        .is_some_and(|bucket| chaining::remove(bucket, key, hasher))
}
