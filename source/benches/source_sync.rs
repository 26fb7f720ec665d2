// benches/source_sync.rs

use bufrand::{BufferedSource, Xorshift64Star};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Barrier;
use std::thread;

const SEED: i64 = 42;
const TOTAL_ITEMS: usize = 100_000;

/// Draw TOTAL_ITEMS values, single-threaded, straight off the generator.
/// This is the baseline the buffered source trades against: it only wins
/// once enough threads are drawing at once.
fn bench_raw_generator(c: &mut Criterion) {
  let mut group = c.benchmark_group("draw_sync");
  group.throughput(Throughput::Elements(TOTAL_ITEMS as u64));

  group.bench_function("raw_generator", |b| {
    b.iter(|| {
      let mut rng = Xorshift64Star::new(SEED);
      let mut acc = 0i64;
      for _ in 0..TOTAL_ITEMS {
        acc ^= rng.next_i63();
      }
      acc
    })
  });

  group.finish();
}

fn bench_buffered_source(c: &mut Criterion) {
  let mut group = c.benchmark_group("draw_sync");
  group.throughput(Throughput::Elements(TOTAL_ITEMS as u64));

  for num_consumers in [1usize, 2, 4, 8] {
    group.bench_with_input(
      BenchmarkId::new("buffered", format!("{num_consumers}cons")),
      &num_consumers,
      |b, &num_consumers| {
        b.iter(|| {
          let source = BufferedSource::new(SEED);
          let per_consumer = TOTAL_ITEMS / num_consumers;
          let barrier = Barrier::new(num_consumers);

          thread::scope(|s| {
            for _ in 0..num_consumers {
              s.spawn(|| {
                barrier.wait();
                let mut acc = 0i64;
                for _ in 0..per_consumer {
                  acc ^= source.next_i63();
                }
                acc
              });
            }
          });
        })
      },
    );
  }

  group.finish();
}

criterion_group!(benches, bench_raw_generator, bench_buffered_source);
criterion_main!(benches);
