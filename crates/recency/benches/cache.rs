use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use recency::LruCache;

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit_1k", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for key in 0..1000u64 {
            cache.put(key, vec![b'x'; 64]);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for key in 0..1000u64 {
            cache.put(key, key);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 2000)));
            } else {
                cache.put(counter % 2000, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_always_evicts", |b| {
        let mut cache = LruCache::new(10).unwrap();

        let mut counter = 0u64;
        b.iter(|| {
            // Every key is new, so each put evicts once full
            cache.put(black_box(counter), counter);
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_get, bench_mixed_50_50, bench_eviction);
criterion_main!(benches);
