use bucket_hash::{hash, CapacityPolicy, Config, HashTable, Strategy};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::Rng;

fn open(strategy: Strategy, num_buckets: usize) -> HashTable<u64, u64> {
    Config::with_hash_fn(strategy, hash::fx_hash())
        .secondary_hash(|k: &u64| (k.rotate_left(17) | 1) as i64)
        .num_buckets(num_buckets)
        .bucket_capacity(4)
        .capacity_policy(CapacityPolicy::dynamic())
        .open()
        .expect("config should be valid")
}

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for item_count in [1_000, 100_000] {
        for strategy in Strategy::ALL {
            group.bench_function(format!("{strategy} {item_count}"), |b| {
                b.iter_batched(
                    || open(strategy, 16),
                    |mut table| {
                        for key in 0..item_count {
                            table.insert(key, key);
                        }
                        table
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
}

fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let mut rng = rand::rng();

    for item_count in [1_000, 100_000] {
        for strategy in Strategy::ALL {
            let mut table = open(strategy, 16);
            for key in 0..item_count {
                table.insert(key, key);
            }

            group.bench_function(format!("{strategy} hit {item_count}"), |b| {
                b.iter(|| {
                    let key = rng.random_range(0..item_count);
                    assert!(table.search(&key).is_some());
                });
            });

            group.bench_function(format!("{strategy} miss {item_count}"), |b| {
                b.iter(|| {
                    let key = rng.random_range(item_count..item_count * 2);
                    assert!(table.search(&key).is_none());
                });
            });
        }
    }
}

fn delete_reinsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete + insert");
    let mut rng = rand::rng();

    for strategy in Strategy::ALL {
        let mut table = open(strategy, 16);
        for key in 0..10_000 {
            table.insert(key, key);
        }

        group.bench_function(strategy.to_string(), |b| {
            b.iter(|| {
                let key = rng.random_range(0..10_000);
                table.delete(&key);
                table.insert(key, key);
            });
        });
    }
}

criterion_group!(benches, insert, search, delete_reinsert);
criterion_main!(benches);
