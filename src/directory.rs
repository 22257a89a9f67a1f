// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::BucketId;

/// A directory slot of an extensible hash table
///
/// Multiple slots reference the same bucket while its local depth is below
/// the global depth.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DirectorySlot {
    /// Bucket this slot points to
    pub bucket: BucketId,

    /// Local depth of that bucket
    pub depth: u32,
}

/// Power-of-two indirection table, addressed by the low-order hash bits
#[derive(Clone, Debug)]
pub struct Directory {
    global_depth: u32,
    slots: Vec<DirectorySlot>,
}

/// Smallest `d` with `2^d >= n`.
pub fn depth_for(n: usize) -> u32 {
    n.max(1).next_power_of_two().trailing_zeros()
}

/// Low `depth` bits of a hash.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn low_bits(hash: i64, depth: u32) -> usize {
    let mask = 1u64.checked_shl(depth).map_or(u64::MAX, |bit| bit - 1);
    ((hash as u64) & mask) as usize
}

impl Directory {
    /// Creates a directory of `2^global_depth` slots, slot `i` pointing to bucket `i`.
    pub fn new(global_depth: u32) -> Self {
        let slots = (0..1usize << global_depth)
            .map(|bucket| DirectorySlot {
                bucket,
                depth: global_depth,
            })
            .collect();

        Self {
            global_depth,
            slots,
        }
    }

    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    pub fn slots(&self) -> &[DirectorySlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn index_of(&self, hash: i64) -> usize {
        low_bits(hash, self.global_depth)
    }

    pub fn slot(&self, hash: i64) -> Option<DirectorySlot> {
        self.slots.get(self.index_of(hash)).copied()
    }

    /// Doubles the directory; slot `i + 2^g` aliases slot `i`.
    pub fn double(&mut self) {
        self.slots.extend_from_within(..);
        self.global_depth += 1;

        log::debug!(
            "Directory doubled to {} slots (global depth {})",
            self.slots.len(),
            self.global_depth,
        );
    }

    /// Rewires the slots of a bucket being split.
    ///
    /// Slots pointing to `old` whose bit at the old local depth is set move to
    /// `new`; all of them get the incremented local depth.
    ///
    /// The caller has to double the directory first if the local depth equals
    /// the global depth.
    pub fn split(&mut self, old: BucketId, new: BucketId) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.bucket != old {
                continue;
            }

            debug_assert!(slot.depth < self.global_depth, "directory should be doubled");

            if (idx >> slot.depth) & 1 == 1 {
                slot.bucket = new;
            }
            slot.depth += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn directory_depth_for() {
        assert_eq!(0, depth_for(0));
        assert_eq!(0, depth_for(1));
        assert_eq!(1, depth_for(2));
        assert_eq!(2, depth_for(3));
        assert_eq!(2, depth_for(4));
        assert_eq!(3, depth_for(5));
    }

    #[test]
    fn directory_low_bits() {
        assert_eq!(0b11, low_bits(0b1011, 2));
        assert_eq!(0, low_bits(12345, 0));
        assert_eq!(0b111, low_bits(-1, 3));
        assert_eq!(usize::MAX, low_bits(-1, 64));
    }

    #[test]
    fn directory_double_aliases() {
        let mut dir = Directory::new(1);
        dir.double();

        assert_eq!(2, dir.global_depth());
        assert_eq!(
            vec![0, 1, 0, 1],
            dir.slots().iter().map(|s| s.bucket).collect::<Vec<_>>()
        );
        assert!(dir.slots().iter().all(|s| s.depth == 1));
    }

    #[test]
    fn directory_split_uses_bit_at_local_depth() {
        let mut dir = Directory::new(1);
        dir.double();
        dir.double();

        // bucket 0 is referenced by slots 0, 2, 4, 6 at local depth 1
        dir.split(0, 2);

        let buckets = dir.slots().iter().map(|s| s.bucket).collect::<Vec<_>>();
        assert_eq!(vec![0, 1, 2, 1, 0, 1, 2, 1], buckets);

        let depths = dir.slots().iter().map(|s| s.depth).collect::<Vec<_>>();
        assert_eq!(vec![2, 1, 2, 1, 2, 1, 2, 1], depths);

        assert_eq!(Some(DirectorySlot { bucket: 2, depth: 2 }), dir.slot(6));
        assert_eq!(Some(DirectorySlot { bucket: 1, depth: 1 }), dir.slot(-1));
    }
}
