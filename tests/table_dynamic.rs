use bucket_hash::{CapacityPolicy, Config, Strategy};
use test_log::test;

const ITEM_COUNT: i64 = 200;

fn config(strategy: Strategy) -> Config<i64> {
    Config::new(strategy, |k: &i64| *k)
        .secondary_hash(|k: &i64| k / 7)
        .num_buckets(4)
        .bucket_capacity(1)
        .capacity_policy(CapacityPolicy::dynamic())
}

#[test]
fn dynamic_table_grows() -> bucket_hash::Result<()> {
    for strategy in Strategy::ALL {
        if strategy == Strategy::ExtensibleHashing {
            continue;
        }

        let mut table = config(strategy).open()?;

        for key in 0..ITEM_COUNT {
            assert!(table.insert(key, key), "{strategy}: insert {key}");
            assert!(
                table.load_factor() <= 0.75,
                "{strategy}: load factor {} after {key}",
                table.load_factor(),
            );
        }

        assert_eq!(ITEM_COUNT as usize, table.len());
        assert!(table.num_buckets().is_power_of_two(), "{strategy}");
        assert!(table.num_buckets() > 4, "{strategy}");

        for key in 0..ITEM_COUNT {
            assert_eq!(Some(&key), table.search(&key), "{strategy}: search {key}");
        }
    }

    Ok(())
}

#[test]
fn dynamic_table_grows_on_full() -> bucket_hash::Result<()> {
    // Step 2 only ever reaches half of the buckets
    let mut table = Config::new(Strategy::DoubleHashing, |_: &i64| 0)
        .secondary_hash(|_: &i64| 2)
        .num_buckets(4)
        .capacity_policy(CapacityPolicy::Dynamic {
            max_load_factor: 10.0,
        })
        .open()?;

    for key in 0..3 {
        assert!(table.insert(key, ()));
    }

    assert!(table.num_buckets() > 4);
    assert_eq!(3, table.len());

    Ok(())
}

#[test]
fn dynamic_separate_overflow_never_fills() -> bucket_hash::Result<()> {
    let mut table = Config::new(Strategy::SeparateOverflow, |_: &i64| 1)
        .num_buckets(2)
        .overflow_size(1)
        .capacity_policy(CapacityPolicy::Dynamic {
            max_load_factor: 100.0,
        })
        .open()?;

    for key in 0..20 {
        assert!(table.insert(key, ()));
    }

    assert_eq!(2, table.num_buckets());
    assert_eq!(1, table.snapshot().chain_count());

    Ok(())
}

#[test]
fn dynamic_extensible_splits_instead() -> bucket_hash::Result<()> {
    let mut table = config(Strategy::ExtensibleHashing).open()?;

    for key in 0..64 {
        assert!(table.insert(key, ()));
    }

    let snapshot = table.snapshot();
    assert_eq!(64, snapshot.num_buckets);
    assert_eq!(Some(6), snapshot.global_depth);

    Ok(())
}

#[test]
fn static_table_keeps_bucket_count() -> bucket_hash::Result<()> {
    let mut table = config(Strategy::Chaining)
        .capacity_policy(CapacityPolicy::Static)
        .open()?;

    for key in 0..ITEM_COUNT {
        assert!(table.insert(key, ()));
    }

    assert_eq!(4, table.num_buckets());
    assert_eq!(50.0, table.load_factor());

    Ok(())
}
