// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Chained linear probing: an entry goes into the first bucket with room along
//! `(h1(k) + i) mod m`; once all `m` buckets are full it is attached to the
//! home bucket's chain.
//!
//! Every bucket counts the live entries that probed past it. A lookup can stop
//! at the first bucket with a zero count, which keeps deletes physical.

use super::Insert;
use crate::{
    bucket::Bucket,
    hash::{HashAdapter, ProbeSequence},
    Entry,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Location {
    /// In the bucket reached after `steps` probes
    Bucket { idx: usize, steps: usize },

    /// In the home bucket's chain, after probing all buckets
    Chain { home: usize },
}

fn sequence<K>(hasher: &HashAdapter<K>, key: &K, num_buckets: usize) -> ProbeSequence {
    ProbeSequence::new(hasher.home(key, num_buckets), 1, num_buckets)
}

fn locate<K, V>(buckets: &[Bucket<K, V>], hasher: &HashAdapter<K>, key: &K) -> Option<Location> {
    let home = hasher.home(key, buckets.len());

    for (steps, idx) in sequence(hasher, key, buckets.len()) {
        let bucket = buckets.get(idx)?;

        if bucket.position(key, hasher).is_some() {
            return Some(Location::Bucket { idx, steps });
        }

        if bucket.displaced() == 0 {
            return None;
        }
    }

    buckets
        .get(home)?
        .chain()?
        .position(key, hasher)
        .map(|_| Location::Chain { home })
}

fn remove_displaced<K, V>(
    buckets: &mut [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    key: &K,
    steps: usize,
) {
    for (_, idx) in sequence(hasher, key, buckets.len()).take(steps) {
        if let Some(bucket) = buckets.get_mut(idx) {
            bucket.remove_displaced();
        }
    }
}

pub fn insert<K, V>(
    buckets: &mut [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    key: K,
    value: V,
) -> Insert<K, V> {
    let num_buckets = buckets.len();

    let existing = match locate(buckets, hasher, &key) {
        Some(Location::Bucket { idx, .. }) => buckets
            .get_mut(idx)
            .and_then(|bucket| bucket.get_mut(&key, hasher)),
        Some(Location::Chain { home }) => buckets
            .get_mut(home)
            .and_then(Bucket::chain_mut)
            .and_then(|chain| chain.get_mut(&key, hasher)),
        None => None,
    };

    if let Some(entry) = existing {
        entry.value = value;
        return Insert::Updated;
    }

    let home = hasher.home(&key, num_buckets);
    let free = sequence(hasher, &key, num_buckets)
        .find(|&(_, idx)| buckets.get(idx).is_some_and(|b| !b.is_full()));

    let steps = if let Some((steps, idx)) = free {
        let entry = Entry::new(key, value);
        let entry = if idx == home {
            entry
        } else {
            entry.displaced_from(home)
        };

        let Some(bucket) = buckets.get_mut(idx) else {
            return Insert::Full(entry.key, entry.value);
        };

        if let Err(entry) = bucket.put(entry) {
            return Insert::Full(entry.key, entry.value);
        }

        log::trace!("Placing entry in bucket {idx} after {steps} probes");
        steps
    } else {
        let Some(bucket) = buckets.get_mut(home) else {
            return Insert::Full(key, value);
        };

        log::trace!("All buckets are full, chaining onto bucket {home}");
        bucket.push_chain(Entry::new(key, value).displaced_from(home));
        num_buckets
    };

    for (_, idx) in ProbeSequence::new(home, 1, num_buckets).take(steps) {
        if let Some(bucket) = buckets.get_mut(idx) {
            bucket.add_displaced();
        }
    }

    Insert::Created
}

pub fn search<'a, K, V>(
    buckets: &'a [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    key: &K,
) -> Option<&'a V> {
    let entry = match locate(buckets, hasher, key)? {
        Location::Bucket { idx, .. } => buckets.get(idx)?.get(key, hasher),
        Location::Chain { home } => buckets.get(home)?.chain()?.get(key, hasher),
    };
    entry.map(Entry::value)
}

pub fn delete<K, V>(buckets: &mut [Bucket<K, V>], hasher: &HashAdapter<K>, key: &K) -> bool {
    let num_buckets = buckets.len();

    let (removed, steps) = match locate(buckets, hasher, key) {
        Some(Location::Bucket { idx, steps }) => {
            let removed = buckets
                .get_mut(idx)
                .and_then(|bucket| bucket.splice(key, hasher))
                .is_some();
            (removed, steps)
        }
        Some(Location::Chain { home }) => {
            let removed = buckets.get_mut(home).is_some_and(|bucket| {
                let removed = bucket
                    .chain_mut()
                    .and_then(|chain| chain.splice(key, hasher))
                    .is_some();
                bucket.release_empty_chain();
                removed
            });
            (removed, num_buckets)
        }
        None => return false,
    };

    if removed {
        remove_displaced(buckets, hasher, key, steps);
    }

    removed
}
