// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Separate chaining: `index = h1(k) mod m`, overflowing entries go into the
//! home bucket's unbounded chain.
//!
//! Also serves the separate overflow strategy of dynamic tables.

use super::Insert;
use crate::{bucket::Bucket, hash::HashAdapter, Entry};

/// Live entry in the bucket or its chain.
pub fn find<'a, K, V>(
    bucket: &'a Bucket<K, V>,
    key: &K,
    hasher: &HashAdapter<K>,
) -> Option<&'a Entry<K, V>> {
    bucket
        .get(key, hasher)
        .or_else(|| bucket.chain().and_then(|chain| chain.get(key, hasher)))
}

pub fn find_mut<'a, K, V>(
    bucket: &'a mut Bucket<K, V>,
    key: &K,
    hasher: &HashAdapter<K>,
) -> Option<&'a mut Entry<K, V>> {
    if bucket.position(key, hasher).is_some() {
        return bucket.get_mut(key, hasher);
    }
    bucket.chain_mut().and_then(|chain| chain.get_mut(key, hasher))
}

/// Splices the key out of the bucket or its chain, then refills the bucket
/// from the chain.
pub fn remove<K, V>(bucket: &mut Bucket<K, V>, key: &K, hasher: &HashAdapter<K>) -> bool {
    let removed = bucket.splice(key, hasher).is_some()
        || bucket
            .chain_mut()
            .and_then(|chain| chain.splice(key, hasher))
            .is_some();

    if removed {
        bucket.compact();
    }

    removed
}

pub fn insert<K, V>(
    buckets: &mut [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    key: K,
    value: V,
) -> Insert<K, V> {
    let home = hasher.home(&key, buckets.len());

    let Some(bucket) = buckets.get_mut(home) else {
        return Insert::Full(key, value);
    };

    if let Some(entry) = find_mut(bucket, &key, hasher) {
        entry.value = value;
        return Insert::Updated;
    }

    if let Err(entry) = bucket.put(Entry::new(key, value)) {
        log::trace!("Bucket {home} is full, chaining");
        bucket.push_chain(entry.displaced_from(home));
    }

    Insert::Created
}

pub fn search<'a, K, V>(
    buckets: &'a [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    key: &K,
) -> Option<&'a V> {
    let bucket = buckets.get(hasher.home(key, buckets.len()))?;
    find(bucket, key, hasher).map(Entry::value)
}

pub fn delete<K, V>(buckets: &mut [Bucket<K, V>], hasher: &HashAdapter<K>, key: &K) -> bool {
    let home = hasher.home(key, buckets.len());
    buckets
        .get_mut(home)
        .is_some_and(|bucket| remove(bucket, key, hasher))
}
