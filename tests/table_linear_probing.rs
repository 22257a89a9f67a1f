use bucket_hash::{Config, Strategy};
use test_log::test;

fn bucket_keys(table: &bucket_hash::HashTable<i64, &str>) -> Vec<Vec<i64>> {
    table
        .snapshot()
        .buckets
        .iter()
        .map(|b| b.entries.iter().map(|e| *e.key()).collect())
        .collect()
}

#[test]
fn linear_probing_collisions_walk_forward() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::LinearProbing, |k: &i64| *k)
        .num_buckets(5)
        .bucket_capacity(2)
        .open()?;

    // Every key has home bucket 0
    for key in [0, 5, 10, 15, 20, 25, 30] {
        assert!(table.insert(key, "v"));
    }

    assert_eq!(
        vec![vec![0, 5], vec![10, 15], vec![20, 25], vec![30], vec![]],
        bucket_keys(&table),
    );

    for key in [35, 40, 45] {
        assert!(table.insert(key, "v"));
    }
    assert_eq!(10, table.len());

    // All 5 * 2 slots are taken
    assert!(!table.insert(50, "v"));
    assert_eq!(10, table.len());
    assert_eq!(None, table.search(&50));

    for key in (0..50).step_by(5) {
        assert_eq!(Some(&"v"), table.search(&key));
    }

    Ok(())
}

#[test]
fn linear_probing_wraps_around() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::LinearProbing, |k: &i64| *k)
        .num_buckets(4)
        .open()?;

    assert!(table.insert(3, "a"));
    assert!(table.insert(7, "b"));
    assert!(table.insert(11, "c"));

    assert_eq!(
        vec![vec![7], vec![11], vec![], vec![3]],
        bucket_keys(&table),
    );
    assert_eq!(Some(&"c"), table.search(&11));

    Ok(())
}

#[test]
fn linear_probing_tombstone_keeps_probe_chain() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::LinearProbing, |k: &i64| *k)
        .num_buckets(5)
        .open()?;

    for key in [0, 5, 10] {
        assert!(table.insert(key, "v"));
    }

    assert!(table.delete(&5));
    assert!(!table.delete(&5));
    assert_eq!(None, table.search(&5));

    // 10 probed past the slot of 5
    assert_eq!(Some(&"v"), table.search(&10));

    let snapshot = table.snapshot();
    assert_eq!(1, snapshot.tombstone_count());
    assert!(snapshot
        .buckets
        .get(1)
        .and_then(|b| b.entries.first())
        .is_some_and(bucket_hash::Entry::is_deleted));

    Ok(())
}

#[test]
fn linear_probing_reuses_tombstone() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::LinearProbing, |k: &i64| *k)
        .num_buckets(3)
        .open()?;

    for key in [0, 3, 6] {
        assert!(table.insert(key, "old"));
    }
    assert!(!table.insert(9, "new"));

    assert!(table.delete(&3));
    assert!(table.insert(9, "new"));

    assert_eq!(vec![vec![0], vec![9], vec![6]], bucket_keys(&table));
    assert_eq!(0, table.snapshot().tombstone_count());

    Ok(())
}

#[test]
fn linear_probing_update_does_not_duplicate_past_tombstone() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::LinearProbing, |k: &i64| *k)
        .num_buckets(4)
        .open()?;

    for key in [0, 4, 8] {
        assert!(table.insert(key, "old"));
    }

    // Frees a slot in front of key 8
    assert!(table.delete(&0));

    assert!(table.insert(8, "new"));
    assert_eq!(2, table.len());
    assert_eq!(Some(&"new"), table.search(&8));
    assert_eq!(1, table.iter().filter(|(k, _)| **k == 8).count());

    Ok(())
}

#[test]
fn linear_probing_negative_hashes() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::LinearProbing, |k: &i64| -*k)
        .num_buckets(7)
        .bucket_capacity(2)
        .open()?;

    for key in -20..=20 {
        if key % 3 == 0 {
            assert!(table.insert(key, "v"));
        }
    }

    for key in -20..=20 {
        assert_eq!(key % 3 == 0, table.contains_key(&key), "key {key}");
    }

    Ok(())
}
