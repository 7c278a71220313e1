// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fleet_avail_core::time::{TimeInterval, TimePoint};
use fleet_avail_engine::{
    config::MeasureConfig,
    measure::{measure_par, measure_with},
    partition::Partition,
};
use fleet_avail_model::record::Record;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{env, hint::black_box};

#[inline]
fn tp(v: i64) -> TimePoint<i64> {
    TimePoint::new(v)
}

#[derive(Clone, Copy)]
struct Query {
    start: i64,
    end: Option<i64>,
}

fn gen_queries(horizon: i64, max_len: i64, n: usize, rng: &mut impl Rng) -> Vec<Query> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let start = rng.random_range(-max_len..horizon);
        let end = if rng.random_bool(0.05) {
            None
        } else {
            Some(start + rng.random_range(1..=max_len))
        };
        out.push(Query { start, end });
    }
    out
}

fn gen_records(queries: &[Query], rng: &mut impl Rng) -> Vec<Record<i64, (f64, f64)>> {
    queries
        .iter()
        .map(|q| {
            let loc = (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
            Record::new(tp(q.start), q.end.map(tp), loc)
        })
        .collect()
}

fn inside_disc(&(x, y): &(f64, f64)) -> bool {
    let (dx, dy) = (x - 0.5, y - 0.5);
    dx * dx + dy * dy < 0.16
}

fn register_insert(c: &mut Criterion, horizon: i64, max_len: i64, sizes: &[usize]) {
    let mut group = c.benchmark_group("partition_insert");
    let domain = TimeInterval::new(tp(0), tp(horizon));

    for &n in sizes {
        let mut rng = ChaCha8Rng::seed_from_u64(0xF1EE7_0001);
        let queries = gen_queries(horizon, max_len, n, &mut rng);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &queries, |b, qs| {
            b.iter_batched(
                || Partition::from_domain(domain).unwrap(),
                |mut p| {
                    for q in qs {
                        let _ = p.insert_overlap(tp(q.start), q.end.map(tp));
                    }
                    black_box(p.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn register_reduction(c: &mut Criterion, horizon: i64, max_len: i64, sizes: &[usize]) {
    let mut group = c.benchmark_group("partition_reduction");
    let domain = TimeInterval::new(tp(0), tp(horizon));

    for &n in sizes {
        let mut rng = ChaCha8Rng::seed_from_u64(0xF1EE7_0002);
        let mut p = Partition::from_domain(domain).unwrap();
        for q in gen_queries(horizon, max_len, n, &mut rng) {
            let _ = p.insert_overlap(tp(q.start), q.end.map(tp));
        }
        group.throughput(Throughput::Elements(p.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &p, |b, p| {
            b.iter(|| black_box(p.weighted_reduction().unwrap()));
        });
    }
    group.finish();
}

fn register_measure(c: &mut Criterion, horizon: i64, max_len: i64, n: usize) {
    let mut group = c.benchmark_group("measure");
    group.throughput(Throughput::Elements(n as u64));
    let domain = TimeInterval::new(tp(0), tp(horizon));
    let config = MeasureConfig {
        progress_interval: 0,
        ..MeasureConfig::default()
    };

    let mut rng = ChaCha8Rng::seed_from_u64(0xF1EE7_0003);
    let queries = gen_queries(horizon, max_len, n, &mut rng);
    let records = gen_records(&queries, &mut rng);

    group.bench_function("sequential", |b| {
        b.iter(|| {
            black_box(
                measure_with(records.iter().cloned(), domain.to_range(), inside_disc, &config)
                    .unwrap()
                    .average(),
            )
        });
    });
    group.bench_function("parallel_admission", |b| {
        b.iter(|| {
            black_box(
                measure_par(&records, domain.to_range(), inside_disc, &config)
                    .unwrap()
                    .average(),
            )
        });
    });
    group.finish();
}

fn partition_benches(c: &mut Criterion) {
    // Defaults (override with env)
    let horizon = env::var("PARTITION_HORIZON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30 * 24 * 3600i64);
    let max_len = env::var("PARTITION_MAX_LEN")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(12 * 3600i64);
    let records = env::var("PARTITION_RECORDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20_000usize);

    register_insert(c, horizon, max_len, &[1_000, 10_000, records]);
    register_reduction(c, horizon, max_len, &[1_000, records]);
    register_measure(c, horizon, max_len, records);
}

criterion_group!(benches, partition_benches);
criterion_main!(benches);
