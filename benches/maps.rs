#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::{collections::HashMap, hint::black_box};

use criterion::{Criterion, criterion_group, criterion_main};
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};
use trimap::{Backing, ChainedHashMap, LinearMap, Map, TreeMap};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn random_items() -> Vec<(String, String)> {
    let mut runner = TestRunner::default();
    any::<[(String, String); ITEMS_AMOUNT]>()
        .new_tree(&mut runner)
        .unwrap()
        .current()
        .to_vec()
}

fn backing_benches(c: &mut Criterion) {
    let items = random_items();

    let mut group = c.benchmark_group("Map backing comparison benchmark");
    group.sample_size(SAMPLE_SIZE);

    let mut linear_map = LinearMap::new();
    let mut tree_map = TreeMap::new();
    let mut chained_map = ChainedHashMap::new();
    let mut rust_map = HashMap::new();

    group.bench_function("linear insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                linear_map.insert(key, value);
            }
        });
    });
    group.bench_function("tree insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                tree_map.insert(key, value);
            }
        });
    });
    group.bench_function("chained insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                chained_map.insert(key, value);
            }
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                rust_map.insert(key, value);
            }
        });
    });

    group.bench_function("linear get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(linear_map.get(key));
            }
        });
    });
    group.bench_function("tree get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(tree_map.get(key));
            }
        });
    });
    group.bench_function("chained get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(chained_map.get(key));
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(rust_map.get(key));
            }
        });
    });
    group.finish();
}

fn word_count_benches(c: &mut Criterion) {
    let words: Vec<String> = (0..20_000)
        .map(|i| format!("w{}", (i * 7919) % 3000))
        .collect();

    let mut group = c.benchmark_group("Word count through the map contract");
    group.sample_size(SAMPLE_SIZE);
    for backing in Backing::ALL {
        group.bench_function(format!("{backing} count"), |b| {
            b.iter(|| {
                let mut counts = backing.build::<String, usize>();
                for word in &words {
                    let next = counts.get(word).copied().unwrap_or(0) + 1;
                    counts.put(word.clone(), next);
                }
                black_box(counts.len())
            });
        });
    }
    group.finish();
}

fn sorted_insert_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sorted key insertion");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("tree sorted insert", |b| {
        b.iter(|| {
            let map: TreeMap<u32, u32> = (0..2_000).map(|i| (i, i)).collect();
            black_box(map.height())
        });
    });
    group.bench_function("chained sorted insert", |b| {
        b.iter(|| {
            let map: ChainedHashMap<u32, u32> = (0..2_000).map(|i| (i, i)).collect();
            black_box(map.longest_chain())
        });
    });
    group.finish();
}

criterion_group!(benches, backing_benches, word_count_benches, sorted_insert_benches);
criterion_main!(benches);
