// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{hash::HashAdapter, Entry};

/// Minimum number of overflow slots when no size is configured
pub const MIN_OVERFLOW_SIZE: usize = 4;

/// Default overflow area size for a table of `num_buckets` buckets.
#[must_use]
pub fn default_overflow_size(num_buckets: usize) -> usize {
    MIN_OVERFLOW_SIZE.max(num_buckets / 2)
}

/// Fixed-length store for entries that do not fit their base bucket
///
/// Slots are reused once their occupant is tombstoned.
#[derive(Clone, Debug)]
pub struct OverflowArea<K, V>(Vec<Option<Entry<K, V>>>);

impl<K, V> OverflowArea<K, V> {
    pub fn new(size: usize) -> Self {
        Self(std::iter::repeat_with(|| None).take(size).collect())
    }

    pub fn slots(&self) -> &[Option<Entry<K, V>>] {
        &self.0
    }

    pub fn get(&self, key: &K, hasher: &HashAdapter<K>) -> Option<&Entry<K, V>> {
        self.iter_live().find(|e| hasher.eq(&e.key, key))
    }

    pub fn get_mut(&mut self, key: &K, hasher: &HashAdapter<K>) -> Option<&mut Entry<K, V>> {
        self.0
            .iter_mut()
            .flatten()
            .find(|e| e.is_live() && hasher.eq(&e.key, key))
    }

    /// Stores the entry in the first empty or tombstoned slot.
    pub fn put(&mut self, entry: Entry<K, V>) -> Result<usize, Entry<K, V>> {
        let free = self
            .0
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.as_ref().is_none_or(Entry::is_deleted));

        match free {
            Some((idx, slot)) => {
                *slot = Some(entry);
                Ok(idx)
            }
            None => Err(entry),
        }
    }

    pub fn tombstone(&mut self, key: &K, hasher: &HashAdapter<K>) -> bool {
        match self.get_mut(key, hasher) {
            Some(entry) => {
                entry.deleted = true;
                true
            }
            None => false,
        }
    }

    pub fn iter_live(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.0.iter().flatten().filter(|e| e.is_live())
    }

    pub fn drain_live(&mut self) -> impl Iterator<Item = Entry<K, V>> + '_ {
        self.0
            .iter_mut()
            .filter_map(Option::take)
            .filter(Entry::is_live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use test_log::test;

    fn hasher() -> HashAdapter<u32> {
        HashAdapter::new(
            Arc::new(|_: &u32| 0),
            None,
            Arc::new(|a: &u32, b: &u32| a == b),
        )
    }

    #[test]
    fn overflow_default_size() {
        assert_eq!(4, default_overflow_size(1));
        assert_eq!(4, default_overflow_size(9));
        assert_eq!(5, default_overflow_size(10));
        assert_eq!(50, default_overflow_size(100));
    }

    #[test]
    fn overflow_fills_up() {
        let mut area = OverflowArea::new(2);

        assert_eq!(Ok(0), area.put(Entry::new(1, ())).map_err(|e| e.key));
        assert_eq!(Ok(1), area.put(Entry::new(2, ())).map_err(|e| e.key));
        assert_eq!(Err(3), area.put(Entry::new(3, ())).map_err(|e| e.key));
        assert_eq!(2, area.iter_live().count());
    }

    #[test]
    fn overflow_reuses_tombstoned_slot() {
        let hasher = hasher();
        let mut area = OverflowArea::new(2);

        area.put(Entry::new(1, ())).map_err(|_| ()).expect("should fit");
        area.put(Entry::new(2, ())).map_err(|_| ()).expect("should fit");

        assert!(area.tombstone(&1, &hasher));
        assert!(area.get(&1, &hasher).is_none());
        assert_eq!(1, area.iter_live().count());

        assert_eq!(Ok(0), area.put(Entry::new(3, ())).map_err(|e| e.key));
        assert!(area.get(&3, &hasher).is_some());
        assert!(area.get(&2, &hasher).is_some());
    }

    #[test]
    fn overflow_drain() {
        let hasher = hasher();
        let mut area = OverflowArea::new(3);

        for k in 1..=3 {
            area.put(Entry::new(k, ())).map_err(|_| ()).expect("should fit");
        }
        area.tombstone(&2, &hasher);

        let keys = area.drain_live().map(|e| e.key).collect::<Vec<_>>();
        assert_eq!(vec![1, 3], keys);
        assert!(area.slots().iter().all(Option::is_none));
    }
}
