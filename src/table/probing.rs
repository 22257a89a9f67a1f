// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Open addressing over buckets: `index(i) = (h1(k) + i * step) mod m`,
//! with `step = 1` for linear probing and `step = h2(k)` for double hashing.
//!
//! Deletes leave tombstones. A probe stops early at a bucket that still has
//! never-used space, because no key can have been pushed past it.

use super::Insert;
use crate::{
    bucket::Bucket,
    hash::{HashAdapter, ProbeSequence},
    Entry,
};

/// Probe step kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Probe {
    Linear,
    Double,
}

fn sequence<K>(hasher: &HashAdapter<K>, probe: Probe, key: &K, num_buckets: usize) -> ProbeSequence {
    let step = match probe {
        Probe::Linear => 1,
        Probe::Double => hasher.step(key, num_buckets),
    };
    ProbeSequence::new(hasher.home(key, num_buckets), step, num_buckets)
}

/// Bucket holding the live key, if any.
fn locate<K, V>(
    buckets: &[Bucket<K, V>],
    hasher: &HashAdapter<K>,
    probe: Probe,
    key: &K,
) -> Option<usize> {
    for (_, idx) in sequence(hasher, probe, key, buckets.len()) {
        let bucket = buckets.get(idx)?;

        if bucket.position(key, hasher).is_some() {
            return Some(idx);
        }

        if !bucket.is_full() {
            return None;
        }
    }

    None
}

pub fn insert<K, V>(
    buckets: &mut [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    probe: Probe,
    key: K,
    value: V,
) -> Insert<K, V> {
    let mut target = None;

    for (attempt, idx) in sequence(hasher, probe, &key, buckets.len()) {
        let Some(bucket) = buckets.get_mut(idx) else {
            break;
        };

        if let Some(entry) = bucket.get_mut(&key, hasher) {
            entry.value = value;
            return Insert::Updated;
        }

        if target.is_none() {
            target = bucket.free_slot().map(|slot| (attempt, idx, slot));
        }

        if !bucket.is_full() {
            break;
        }
    }

    match target {
        Some((attempt, idx, slot)) => match buckets.get_mut(idx) {
            Some(bucket) => {
                log::trace!("Placing entry in bucket {idx} after {attempt} probes");
                bucket.put_at(slot, Entry::new(key, value));
                Insert::Created
            }
            None => Insert::Full(key, value),
        },
        None => Insert::Full(key, value),
    }
}

pub fn search<'a, K, V>(
    buckets: &'a [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    probe: Probe,
    key: &K,
) -> Option<&'a V> {
    let idx = locate(buckets, hasher, probe, key)?;
    buckets
        .get(idx)
        .and_then(|bucket| bucket.get(key, hasher))
        .map(Entry::value)
}

pub fn delete<K, V>(
    buckets: &mut [Bucket<K, V>],
    hasher: &HashAdapter<K>,
    probe: Probe,
    key: &K,
) -> bool {
    let Some(idx) = locate(buckets, hasher, probe, key) else {
        return false;
    };

    log::trace!("Leaving tombstone in bucket {idx}");

    buckets
        .get_mut(idx)
        .is_some_and(|bucket| bucket.tombstone(key, hasher))
}
