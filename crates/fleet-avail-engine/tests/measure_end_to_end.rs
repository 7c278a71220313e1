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

use fleet_avail_core::time::{TimeDelta, TimeInterval, TimePoint};
use fleet_avail_engine::prelude::*;
use fleet_avail_model::prelude::*;
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

const DATASET: &str = r#"{
    "domain": { "start": 0, "end": 100 },
    "region": "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))",
    "records": [
        { "id": 1, "start_time": 10, "end_time": 30, "location": "POINT (5 5)" },
        { "id": 2, "start_time": 20, "end_time": 40, "location": "(2.5, 7)" },
        { "id": 3, "start_time": 0, "end_time": null, "location": "POINT (50 50)" },
        { "id": 4, "end_time": 40, "location": "POINT (1 1)" },
        { "id": 5, "start_time": 90, "end_time": null, "location": "point(9 9)" },
        { "id": 6, "start_time": -50, "end_time": -10, "location": "POINT (1 1)" },
        { "id": 7, "start_time": 5, "end_time": 6, "location": "POINT (nope)" }
    ]
}"#;

fn brute_force(records: &[Record<i64, Point>], domain: TimeInterval<i64>, area: &Polygon) -> i128 {
    let (lo, hi) = (domain.start().value(), domain.end().value());
    let mut counts = vec![0i128; (hi - lo) as usize];
    for r in records.iter().filter(|r| area.contains(r.location())) {
        let s = r.start().value().max(lo);
        let e = r.end().map_or(hi, |e| e.value()).min(hi);
        for t in s..e {
            counts[(t - lo) as usize] += 1;
        }
    }
    counts.iter().sum()
}

#[test]
fn dataset_file_measures_admitted_records() {
    let ds = Dataset::from_json_str(DATASET).unwrap();
    let area = ds.region().clone();
    let m = measure_fallible(
        ds.records(),
        ds.domain().to_range(),
        |p| area.contains(p),
        &MeasureConfig::default(),
    )
    .unwrap();

    // (10,30) + (20,40) + (90,100) = 20 + 20 + 10
    assert_eq!(m.weighted_sum(), 50);
    assert_eq!(m.average(), 0.5);
    assert_eq!(m.peak().count(), 2);
    assert_eq!(
        m.peak().at(),
        TimeInterval::new(TimePoint::new(20), TimePoint::new(30))
    );

    let tally = m.tally();
    assert_eq!(tally.seen(), 7);
    assert_eq!(tally.admitted(), 4);
    assert_eq!(tally.outside_region(), 1);
    assert_eq!(tally.skipped_source(), 2);
    assert_eq!(tally.skipped_invalid(), 0);
}

#[test]
fn generated_records_match_brute_force() {
    let domain = TimeInterval::new(TimePoint::new(0i64), TimePoint::new(5_000));
    let config = RecordGenConfigBuilder::new()
        .domain(domain)
        .amount(600)
        .mean_active(TimeDelta::new(250))
        .lead_in(TimeDelta::new(500))
        .open_ended_probability(0.05)
        .extent(BoundingBox::new(Point::new(0.0, 0.0), Point::new(4.0, 4.0)))
        .seed(0xC0FFEE)
        .build()
        .unwrap();
    let records = RecordGenerator::new(config).generate();
    let area: Polygon = "POLYGON ((1 1, 3 1, 3 3, 1 3, 1 1))".parse().unwrap();

    let expected = brute_force(&records, domain, &area);
    let m = measure(records.iter().cloned(), domain.to_range(), |p| area.contains(p)).unwrap();

    assert_eq!(m.weighted_sum(), expected);
    assert_eq!(m.average(), expected as f64 / 5_000.0);
    assert!(m.tally().admitted() > 0);
    assert!(m.tally().outside_region() > 0);
}

#[test]
fn streaming_generator_equals_collected() {
    let domain = TimeInterval::new(TimePoint::new(0i64), TimePoint::new(86_400));
    let build = || {
        RecordGenConfigBuilder::new()
            .domain(domain)
            .amount(2_000)
            .seed(11)
            .build()
            .unwrap()
    };
    let admit = |p: &Point| p.x() < 0.5;

    let streamed = measure(RecordGenerator::new(build()), domain.to_range(), admit).unwrap();
    let collected = measure(RecordGenerator::new(build()).generate(), domain.to_range(), admit).unwrap();
    assert_eq!(streamed, collected);
}

#[test]
fn parallel_and_shuffled_runs_agree() {
    let domain = TimeInterval::new(TimePoint::new(0i64), TimePoint::new(604_800));
    let config = RecordGenConfigBuilder::new()
        .domain(domain)
        .amount(3_000)
        .seed(2024)
        .build()
        .unwrap();
    let mut records = RecordGenerator::new(config).generate();
    let area: Polygon = "POLYGON ((0 0, 0.7 0.1, 0.9 0.8, 0.2 0.6, 0 0))"
        .parse()
        .unwrap();
    let admit = |p: &Point| area.contains(p);
    let cfg = MeasureConfig::default();

    let reference = measure_par(&records, domain.to_range(), admit, &cfg).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..3 {
        records.shuffle(&mut rng);
        let m = measure_with(records.iter().cloned(), domain.to_range(), admit, &cfg).unwrap();
        assert_eq!(m.average().to_bits(), reference.average().to_bits());
        assert_eq!(m.peak().count(), reference.peak().count());
        assert_eq!(m.segments(), reference.segments());
    }
}

#[test]
fn aggregator_keeps_partition_valid_while_streaming() {
    let domain = TimeInterval::new(TimePoint::new(0i64), TimePoint::new(10_000));
    let config = RecordGenConfigBuilder::new()
        .domain(domain)
        .amount(500)
        .mean_active(TimeDelta::new(400))
        .seed(5)
        .build()
        .unwrap();

    let mut agg = Aggregator::new(domain.to_range()).unwrap();
    for (i, record) in RecordGenerator::new(config).enumerate() {
        agg.observe(&record, |_| true).unwrap();
        if i % 50 == 0 {
            assert_eq!(agg.partition().check_invariants(), Ok(()));
        }
    }
    let m = agg.finish().unwrap();
    assert_eq!(m.tally().admitted(), 500);
    assert!(m.average() > 0.0);
}
