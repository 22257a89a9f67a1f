use bucket_hash::{Config, Strategy};
use test_log::test;

#[test]
fn chaining_overflows_into_chain() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::Chaining, |k: &i64| *k)
        .num_buckets(2)
        .bucket_capacity(2)
        .open()?;

    for key in [0, 2, 4, 6, 8] {
        assert!(table.insert(key, key));
    }

    let snapshot = table.snapshot();
    let home = snapshot.buckets.first().expect("should have bucket 0");
    assert_eq!(vec![0, 2], home.entries.iter().map(|e| *e.key()).collect::<Vec<_>>());
    assert_eq!(vec![4, 6, 8], home.chain.iter().map(|e| *e.key()).collect::<Vec<_>>());
    assert!(home.chain.iter().all(|e| e.chain_next() == Some(0)));

    // Chaining never reports a full table
    for key in (10..100).step_by(2) {
        assert!(table.insert(key, key));
    }
    assert_eq!(50, table.len());

    Ok(())
}

#[test]
fn chaining_delete_compacts_chain() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::Chaining, |k: &i64| *k)
        .num_buckets(2)
        .bucket_capacity(2)
        .open()?;

    for key in [0, 2, 4, 6, 8] {
        assert!(table.insert(key, ()));
    }

    assert!(table.delete(&2));
    assert!(!table.delete(&2));

    let snapshot = table.snapshot();
    assert_eq!(0, snapshot.tombstone_count());
    let keys = snapshot
        .buckets
        .first()
        .map(|b| b.entries.iter().map(|e| *e.key()).collect::<Vec<_>>())
        .unwrap_or_default();
    assert_eq!(vec![0, 4], keys);

    assert!(table.delete(&6));
    assert!(table.delete(&8));
    assert_eq!(0, table.snapshot().chain_count());

    for key in [0, 4] {
        assert!(table.contains_key(&key));
    }

    Ok(())
}

#[test]
fn chaining_update_in_chain() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::Chaining, |k: &i64| *k)
        .num_buckets(1)
        .open()?;

    for key in 0..5 {
        assert!(table.insert(key, "old"));
    }
    assert!(table.insert(3, "new"));

    assert_eq!(5, table.len());
    assert_eq!(Some(&"new"), table.search(&3));

    Ok(())
}

#[test]
fn chaining_custom_key_equality() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::Chaining, |k: &String| {
        k.to_ascii_lowercase().len() as i64
    })
    .key_equality(|a: &String, b: &String| a.eq_ignore_ascii_case(b))
    .open()?;

    assert!(table.insert("Apple".to_string(), 1));
    assert!(table.insert("APPLE".to_string(), 2));

    assert_eq!(1, table.len());
    assert_eq!(Some(&2), table.search(&"apple".to_string()));

    Ok(())
}
