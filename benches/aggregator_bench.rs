//! Benchmarks for concurrent inserts into the result aggregator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use bucket_collector::collectors::aggregator::ResultCollection;
use bucket_collector::models::{BucketRecord, EncryptionType, LoggingStatus};
use std::sync::Arc;

fn batch(worker: usize, size: usize) -> Vec<BucketRecord> {
    (0..size)
        .map(|i| BucketRecord {
            account_id: format!("acct-{}", worker),
            bucket_name: format!("bucket-{}-{}", worker, i),
            encryption_type: EncryptionType::SseKms,
            unencrypted_object_count: i as u64,
            versioning_enabled: i % 2 == 0,
            logging: LoggingStatus::Enabled,
        })
        .collect()
}

/// Benchmark inserting one batch per worker from parallel threads
fn bench_concurrent_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator_concurrent_inserts");

    for workers in [1usize, 4, 16, 64] {
        let batch_size = 200;
        group.throughput(Throughput::Elements((workers * batch_size) as u64));
        group.bench_with_input(
            BenchmarkId::new("insert", format!("{}_workers", workers)),
            &workers,
            |b, &workers| {
                b.iter(|| {
                    let collection = Arc::new(ResultCollection::new());
                    let handles: Vec<_> = (0..workers)
                        .map(|worker| {
                            let collection = Arc::clone(&collection);
                            let records = batch(worker, batch_size);
                            std::thread::spawn(move || collection.insert(records))
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                    black_box(collection.len())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark duplicate detection over a large collection
fn bench_duplicate_keys(c: &mut Criterion) {
    let collection = ResultCollection::new();
    for worker in 0..50 {
        collection.insert(batch(worker % 40, 100));
    }

    c.bench_function("aggregator_duplicate_keys_5000", |b| {
        b.iter(|| black_box(collection.duplicate_keys()))
    });
}

criterion_group!(benches, bench_concurrent_inserts, bench_duplicate_keys);
criterion_main!(benches);
