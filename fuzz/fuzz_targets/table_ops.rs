#![no_main]
use arbitrary::Arbitrary;
use bucket_hash::{CapacityPolicy, Config, Strategy};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert(i8, u16),
    Delete(i8),
    Search(i8),
    Clear,
}

#[derive(Arbitrary, Debug)]
struct Input {
    strategy: u8,
    num_buckets: u8,
    bucket_capacity: u8,
    dynamic: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let Ok(strategy) = Strategy::try_from(input.strategy % 6) else {
        return;
    };

    let policy = if input.dynamic {
        CapacityPolicy::dynamic()
    } else {
        CapacityPolicy::Static
    };

    // Narrow hash range to force collisions
    let mut table = Config::new(strategy, |k: &i8| i64::from(*k) / 3)
        .secondary_hash(|k: &i8| i64::from(*k))
        .num_buckets(usize::from(input.num_buckets % 16) + 1)
        .bucket_capacity(usize::from(input.bucket_capacity % 4) + 1)
        .max_global_depth(8)
        .capacity_policy(policy)
        .open()
        .unwrap();

    let mut model = HashMap::new();

    for op in input.ops {
        match op {
            Op::Insert(key, value) => {
                let existed = model.contains_key(&key);

                if table.insert(key, value) {
                    model.insert(key, value);
                } else {
                    assert!(!existed);
                    assert!(!input.dynamic);
                }
            }
            Op::Delete(key) => {
                assert_eq!(model.remove(&key).is_some(), table.delete(&key));
            }
            Op::Search(key) => {
                assert_eq!(model.get(&key), table.search(&key));
            }
            Op::Clear => {
                table.clear();
                model.clear();
            }
        }

        assert_eq!(model.len(), table.len());
    }

    assert_eq!(model.len(), table.iter().count());
});
