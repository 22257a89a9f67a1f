// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Separate overflow: `index = h1(k) mod m`, entries that do not fit their base
//! bucket go into the first free or tombstoned slot of a bounded overflow area.

use super::Insert;
use crate::{bucket::Bucket, hash::HashAdapter, overflow::OverflowArea, Entry};

pub fn insert<K, V>(
    buckets: &mut [Bucket<K, V>],
    area: &mut OverflowArea<K, V>,
    hasher: &HashAdapter<K>,
    key: K,
    value: V,
) -> Insert<K, V> {
    let home = hasher.home(&key, buckets.len());

    let Some(bucket) = buckets.get_mut(home) else {
        return Insert::Full(key, value);
    };

    if let Some(entry) = bucket.get_mut(&key, hasher) {
        entry.value = value;
        return Insert::Updated;
    }

    if let Some(entry) = area.get_mut(&key, hasher) {
        entry.value = value;
        return Insert::Updated;
    }

    let Err(entry) = bucket.put(Entry::new(key, value)) else {
        return Insert::Created;
    };

    match area.put(entry.displaced_from(home)) {
        Ok(slot) => {
            log::trace!("Bucket {home} is full, placed entry in overflow slot {slot}");
            Insert::Created
        }
        Err(entry) => {
            let (key, value) = entry.into_pair();
            Insert::Full(key, value)
        }
    }
}

pub fn search<'a, K, V>(
    buckets: &'a [Bucket<K, V>],
    area: &'a OverflowArea<K, V>,
    hasher: &HashAdapter<K>,
    key: &K,
) -> Option<&'a V> {
    let bucket = buckets.get(hasher.home(key, buckets.len()))?;

    bucket
        .get(key, hasher)
        .or_else(|| area.get(key, hasher))
        .map(Entry::value)
}

pub fn delete<K, V>(
    buckets: &mut [Bucket<K, V>],
    area: &mut OverflowArea<K, V>,
    hasher: &HashAdapter<K>,
    key: &K,
) -> bool {
    let home = hasher.home(key, buckets.len());

    buckets
        .get_mut(home)
        .is_some_and(|bucket| bucket.tombstone(key, hasher))
        || area.tombstone(key, hasher)
}
