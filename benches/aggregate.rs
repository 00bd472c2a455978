//! Criterion benches for decoding and aggregating batches of final boards.
//!
//! A synthetic pool of u64 boards is decoded to max tile codes and reduced to
//! a report, sequentially and on the rayon pool.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use tile_stats::board::decode;
use tile_stats::stats::Aggregator;

fn make_boards(total: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..total).map(|_| rng.gen::<u64>()).collect()
}

fn bench_decode(c: &mut Criterion) {
    let boards = make_boards(200_000, 123);
    c.bench_function("decode/200k", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for &s in &boards {
                acc += decode(s).get() as u64;
            }
            black_box(acc)
        })
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let aggregator = Aggregator::default();
    let mut group = c.benchmark_group("aggregate");
    for &total in &[10_000usize, 1_000_000] {
        let boards = make_boards(total, 42);

        group.bench_function(format!("seq_{total}"), |b| {
            b.iter_batched(
                || boards.iter().map(|&s| decode(s)).collect::<Vec<_>>(),
                |codes| black_box(aggregator.aggregate_codes(codes).unwrap()),
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("states_par_{total}"), |b| {
            b.iter(|| black_box(aggregator.aggregate_states(&boards).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_aggregate);
criterion_main!(benches);
