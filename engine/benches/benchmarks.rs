//! Performance benchmarks for trellis-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use trellis_engine::{merge_batch, Row, RowStore, RowUpdate};

fn fresh_updates(n: usize) -> Vec<RowUpdate> {
    (0..n)
        .map(|i| {
            RowUpdate::new(format!("row_{i}"))
                .with_field("name", json!(format!("Row {i}")))
                .with_field("qty", json!(i as i64))
        })
        .collect()
}

fn populated_store(n: usize) -> RowStore {
    let mut store = RowStore::new();
    let _ = merge_batch(&mut store, fresh_updates(n));
    store
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [100usize, 1_000] {
        // All-new ids: every update is an add.
        group.bench_with_input(BenchmarkId::new("fresh_rows", size), &size, |b, &size| {
            b.iter_batched(
                || (RowStore::new(), fresh_updates(size)),
                |(mut store, updates)| merge_batch(black_box(&mut store), black_box(updates)),
                criterion::BatchSize::SmallInput,
            )
        });

        // All-existing ids: every update merges over a stored row.
        group.bench_with_input(
            BenchmarkId::new("existing_rows", size),
            &size,
            |b, &size| {
                b.iter_batched(
                    || (populated_store(size), fresh_updates(size)),
                    |(mut store, updates)| merge_batch(black_box(&mut store), black_box(updates)),
                    criterion::BatchSize::SmallInput,
                )
            },
        );

        // All-dirty rows: the pass only flips stale flags.
        group.bench_with_input(BenchmarkId::new("dirty_rows", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut store = populated_store(size);
                    for i in 0..size {
                        store.get_mut(&format!("row_{i}")).unwrap().dirty = true;
                    }
                    (store, fresh_updates(size))
                },
                |(mut store, updates)| merge_batch(black_box(&mut store), black_box(updates)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    group.bench_function("insert", |b| {
        let mut store = RowStore::new();
        let mut id = 0u64;
        b.iter(|| {
            id += 1;
            let mut row = Row::new(format!("row_{id}"));
            row.set_field("qty", json!(id));
            store.insert(black_box(row))
        })
    });

    group.bench_function("get", |b| {
        let store = populated_store(1_000);
        b.iter(|| store.get(black_box("row_500")))
    });

    group.bench_function("snapshot_1000", |b| {
        let store = populated_store(1_000);
        b.iter(|| black_box(store.snapshot()))
    });

    group.finish();
}

fn bench_payload_parsing(c: &mut Criterion) {
    c.bench_function("row_update_from_value", |b| {
        let payload = json!({
            "id": "row_1",
            "name": "Row 1",
            "qty": 7,
            "tags": ["a", "b"]
        });
        b.iter(|| RowUpdate::from_value(black_box(payload.clone())))
    });
}

criterion_group!(benches, bench_merge, bench_store, bench_payload_parsing);
criterion_main!(benches);
