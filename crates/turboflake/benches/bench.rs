use core::hint::black_box;
use std::sync::Barrier;
use std::thread::scope;
use std::time::Instant;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use turboflake::{MachineIdPool, TimeSource, Turboflake};

struct FixedMockTime {
    nanos: u64,
}

impl TimeSource for FixedMockTime {
    fn elapsed_nanos(&self) -> u64 {
        self.nanos
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn mock_generator(lanes: &[i64]) -> Turboflake<FixedMockTime> {
    let pool = MachineIdPool::new(lanes.iter().copied()).unwrap();
    Turboflake::from_parts(pool, FixedMockTime { nanos: 1 << 40 })
}

/// Hot path: single claims with a frozen clock, so every claim commits on the
/// first CAS and overflow borrows ticks instead of sleeping.
fn bench_claim(c: &mut Criterion) {
    let mut group = c.benchmark_group("claim/single");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = mock_generator(&[0, 1, 2, 3]);
                for _ in 0..TOTAL_IDS {
                    black_box(generator.claim());
                }
            }
            start.elapsed()
        })
    });
    group.finish();
}

fn bench_claim_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("claim/batch");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = mock_generator(&[0, 1, 2, 3]);
                black_box(generator.claim_many(TOTAL_IDS));
            }
            start.elapsed()
        })
    });
    group.finish();
}

/// Contended path: every core hammers the same atomic state.
fn bench_claim_contended(c: &mut Criterion) {
    let threads = num_cpus::get().min(8);

    let mut group = c.benchmark_group("claim/contended");
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}"), |b| {
        b.iter_custom(|iters| {
            let generator = mock_generator(&[0, 1, 2, 3]);
            let barrier = Barrier::new(threads + 1);

            let mut start = Instant::now();
            scope(|s| {
                for _ in 0..threads {
                    let generator = &generator;
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.claim());
                            }
                        }
                    });
                }
                barrier.wait();
                start = Instant::now();
            });
            // Leaving the scope joins every worker, so the clock stops only
            // after all claims committed.
            start.elapsed()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_claim,
    bench_claim_many,
    bench_claim_contended
);
criterion_main!(benches);
