// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Caller-supplied hash function
///
/// The returned integer may be negative; the table normalizes it with
/// [`bucket_index`].
pub type HashFn<K> = Arc<dyn Fn(&K) -> i64 + Send + Sync>;

/// Caller-supplied key equality
pub type KeyEq<K> = Arc<dyn Fn(&K, &K) -> bool + Send + Sync>;

/// Maps any integer hash onto `[0, num_buckets)`.
///
/// Equivalent to `((hash % m) + m) % m`, without overflow.
///
/// # Panics
///
/// Panics if `num_buckets` is 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bucket_index(hash: i64, num_buckets: usize) -> usize {
    assert!(num_buckets > 0, "bucket count may not be zero");

    // NOTE: rem_euclid is always in [0, m), so the cast back cannot truncate
    i128::from(hash).rem_euclid(num_buckets as i128) as usize
}

/// Normalizes a secondary hash into a probe step in `[1, num_buckets)`.
///
/// A step of 0 would revisit the home bucket forever, so it is forced to 1.
#[must_use]
pub fn probe_step(hash: i64, num_buckets: usize) -> usize {
    bucket_index(hash, num_buckets).max(1)
}

/// The bucket indices visited by a probing operation
///
/// Yields `(i, (start + i * step) mod m)` for `i` in `0..m`.
#[derive(Clone, Debug)]
pub struct ProbeSequence {
    current: usize,
    step: usize,
    num_buckets: usize,
    attempt: usize,
}

impl ProbeSequence {
    /// Creates a probe sequence starting at `start`.
    ///
    /// `start` and `step` are expected to be normalized to `[0, num_buckets)`.
    #[must_use]
    pub fn new(start: usize, step: usize, num_buckets: usize) -> Self {
        Self {
            current: start,
            step,
            num_buckets,
            attempt: 0,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.num_buckets {
            return None;
        }

        let item = (self.attempt, self.current);

        self.attempt += 1;

        // NOTE: Both operands are < m, so adding them cannot overflow for any sane m
        self.current = (self.current + self.step) % self.num_buckets;

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_buckets - self.attempt;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

/// Hash functions and key equality of a table
pub(crate) struct HashAdapter<K> {
    primary: HashFn<K>,
    secondary: Option<HashFn<K>>,
    key_eq: KeyEq<K>,
}

impl<K> Clone for HashAdapter<K> {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            key_eq: self.key_eq.clone(),
        }
    }
}

impl<K> HashAdapter<K> {
    pub fn new(primary: HashFn<K>, secondary: Option<HashFn<K>>, key_eq: KeyEq<K>) -> Self {
        Self {
            primary,
            secondary,
            key_eq,
        }
    }

    /// Raw primary hash.
    pub fn primary(&self, key: &K) -> i64 {
        (self.primary)(key)
    }

    /// `h1(k) mod m`
    pub fn home(&self, key: &K, num_buckets: usize) -> usize {
        bucket_index(self.primary(key), num_buckets)
    }

    /// Normalized secondary hash, or 1 if the table has none.
    pub fn step(&self, key: &K, num_buckets: usize) -> usize {
        self.secondary
            .as_ref()
            .map_or(1, |secondary| probe_step(secondary(key), num_buckets))
    }

    pub fn eq(&self, a: &K, b: &K) -> bool {
        (self.key_eq)(a, b)
    }
}

/// Hashes any `K: Hash` with rustc-hash's `FxHasher`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn fx_hash<K: Hash>() -> HashFn<K> {
    Arc::new(|key: &K| {
        let mut hasher = rustc_hash::FxHasher::default();
        key.hash(&mut hasher);
        hasher.finish() as i64
    })
}

/// Hashes byte-like keys with XXH3.
#[must_use]
pub fn xxh3<K: AsRef<[u8]>>() -> HashFn<K> {
    xxh3_with_seed(0)
}

/// Hashes byte-like keys with seeded XXH3.
///
/// Two different seeds give two independent hash functions, which is what
/// double hashing needs.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn xxh3_with_seed<K: AsRef<[u8]>>(seed: u64) -> HashFn<K> {
    Arc::new(move |key: &K| xxhash_rust::xxh3::xxh3_64_with_seed(key.as_ref(), seed) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn bucket_index_negative() {
        assert_eq!(2, bucket_index(-3, 5));
        assert_eq!(0, bucket_index(-5, 5));
        assert_eq!(4, bucket_index(-1, 5));
        assert_eq!(3, bucket_index(3, 5));
    }

    #[test]
    fn bucket_index_extremes() {
        for m in [1, 2, 3, 7, 64, 1_000_003] {
            for h in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX] {
                assert!(bucket_index(h, m) < m);
            }
        }

        assert_eq!(0, bucket_index(i64::MIN, 2));
        assert_eq!(1, bucket_index(i64::MAX, 2));
    }

    #[test]
    fn probe_step_never_zero() {
        assert_eq!(1, probe_step(0, 7));
        assert_eq!(1, probe_step(7, 7));
        assert_eq!(1, probe_step(-14, 7));
        assert_eq!(3, probe_step(10, 7));
        assert_eq!(1, probe_step(0, 1));
    }

    #[test]
    fn probe_sequence_linear() {
        let seq = ProbeSequence::new(3, 1, 5).map(|(_, idx)| idx).collect::<Vec<_>>();
        assert_eq!(vec![3, 4, 0, 1, 2], seq);
    }

    #[test]
    fn probe_sequence_double_visits_all_buckets_for_prime_m() {
        for step in 1..7 {
            let mut seen = ProbeSequence::new(2, step, 7)
                .map(|(_, idx)| idx)
                .collect::<Vec<_>>();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(7, seen.len(), "step {step} should visit every bucket");
        }
    }

    #[test]
    fn probe_sequence_attempts() {
        let attempts = ProbeSequence::new(0, 2, 4)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(vec![0, 1, 2, 3], attempts);
        assert_eq!(4, ProbeSequence::new(0, 2, 4).len());
    }

    #[test]
    fn stock_hashes_are_deterministic() {
        let fx = fx_hash::<u64>();
        assert_eq!(fx(&42), fx(&42));

        let a = xxh3::<&str>();
        let b = xxh3_with_seed::<&str>(7);
        assert_eq!(a(&"hello"), a(&"hello"));
        assert_ne!(a(&"hello"), b(&"hello"));
    }
}
