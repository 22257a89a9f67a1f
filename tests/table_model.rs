use bucket_hash::{CapacityPolicy, Config, HashTable, Strategy};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use test_log::test;

const OPS: usize = 5_000;

// Few distinct hashes, some negative, so every strategy sees heavy collisions
fn open(strategy: Strategy, policy: CapacityPolicy) -> bucket_hash::Result<HashTable<u32, u64>> {
    Config::new(strategy, |k: &u32| i64::from(*k % 13) - 6)
        .secondary_hash(|k: &u32| i64::from(*k) * 3 + 1)
        .num_buckets(7)
        .bucket_capacity(2)
        .overflow_size(8)
        .max_global_depth(8)
        .capacity_policy(policy)
        .open()
}

fn check_against_model(
    strategy: Strategy,
    policy: CapacityPolicy,
    seed: u64,
) -> bucket_hash::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = open(strategy, policy)?;
    let mut model = HashMap::new();

    for op in 0..OPS {
        let key = rng.random_range(0..64u32);

        match rng.random_range(0..10) {
            0..=4 => {
                let value = rng.random::<u64>();
                let existed = model.contains_key(&key);

                if table.insert(key, value) {
                    model.insert(key, value);
                } else {
                    assert!(!existed, "{strategy} #{op}: update of {key} was rejected");
                    assert!(!policy.is_dynamic(), "{strategy} #{op}: dynamic table rejected {key}");
                }
            }
            5..=7 => {
                assert_eq!(
                    model.remove(&key).is_some(),
                    table.delete(&key),
                    "{strategy} #{op}: delete {key}",
                );
            }
            _ => {
                assert_eq!(model.get(&key), table.search(&key), "{strategy} #{op}: search {key}");
            }
        }

        assert_eq!(model.len(), table.len(), "{strategy} #{op}: size");
    }

    let mut seen = HashSet::new();
    for (key, value) in table.iter() {
        assert!(seen.insert(*key), "{strategy}: duplicate key {key}");
        assert_eq!(model.get(key), Some(value), "{strategy}: stray entry {key}");
    }
    assert_eq!(model.len(), seen.len());

    for (key, value) in &model {
        assert_eq!(Some(value), table.search(key), "{strategy}: lost key {key}");
    }

    Ok(())
}

#[test]
fn model_static() -> bucket_hash::Result<()> {
    for strategy in Strategy::ALL {
        for seed in 0..4 {
            check_against_model(strategy, CapacityPolicy::Static, seed)?;
        }
    }
    Ok(())
}

#[test]
fn model_dynamic() -> bucket_hash::Result<()> {
    for strategy in Strategy::ALL {
        for seed in 0..4 {
            check_against_model(strategy, CapacityPolicy::dynamic(), seed)?;
        }
    }
    Ok(())
}

#[test]
fn model_fx_hash_strings() -> bucket_hash::Result<()> {
    for strategy in Strategy::ALL {
        let mut table = Config::with_hash_fn(strategy, bucket_hash::hash::fx_hash())
            .secondary_hash_fn(bucket_hash::hash::xxh3())
            .capacity_policy(CapacityPolicy::dynamic())
            .open()?;

        for i in 0..500u32 {
            assert!(table.insert(format!("key-{i}"), i));
        }
        for i in (0..500u32).step_by(3) {
            assert!(table.delete(&format!("key-{i}")));
        }

        for i in 0..500u32 {
            let expected = (i % 3 != 0).then_some(&i);
            assert_eq!(expected, table.search(&format!("key-{i}")), "{strategy}");
        }
    }
    Ok(())
}
