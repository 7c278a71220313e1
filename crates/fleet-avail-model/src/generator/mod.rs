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

mod config;
mod err;

pub use config::{RecordGenConfig, RecordGenConfigBuilder};
pub use err::RecordGenConfigBuildError;

use crate::{geo::Point, id::RecordId, record::Record};
use fleet_avail_core::{
    TimeVariable,
    time::{TimeDelta, TimePoint},
};
use num_traits::NumCast;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_distr::{Distribution, Exp, uniform::SampleUniform};

/// Seeded source of synthetic availability records.
///
/// Start times are uniform over `[domain.start - lead_in, domain.end)`,
/// active durations are exponential with the configured mean, and locations
/// are uniform over the configured extent. The generator is an iterator
/// yielding exactly `amount` records, so measurements can consume it without
/// materialising the whole set.
pub struct RecordGenerator<T>
where
    T: TimeVariable + NumCast + SampleUniform,
{
    config: RecordGenConfig<T>,
    rng: SmallRng,
    active: Exp<f64>,
    next_id: u64,
}

impl<T> From<RecordGenConfig<T>> for RecordGenerator<T>
where
    T: TimeVariable + NumCast + SampleUniform,
{
    fn from(config: RecordGenConfig<T>) -> Self {
        Self::new(config)
    }
}

impl<T> RecordGenerator<T>
where
    T: TimeVariable + NumCast + SampleUniform,
{
    pub fn new(config: RecordGenConfig<T>) -> Self {
        let mean = config.mean_active.value().to_f64().unwrap_or(1.0).max(1.0);
        Self {
            active: Exp::new(1.0 / mean).expect("validated positive mean_active"),
            rng: SmallRng::seed_from_u64(config.seed()),
            config,
            next_id: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &RecordGenConfig<T> {
        &self.config
    }

    /// Remaining records, collected.
    pub fn generate(&mut self) -> Vec<Record<T, Point>> {
        self.by_ref().collect()
    }

    #[inline]
    fn fresh_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        RecordId::new(id)
    }

    fn sample_start(&mut self) -> TimePoint<T> {
        let domain = self.config.domain;
        let lo = domain
            .start()
            .checked_sub(self.config.lead_in)
            .unwrap_or(domain.start());
        TimePoint::new(self.rng.random_range(lo.value()..domain.end().value()))
    }

    fn sample_end(&mut self, start: TimePoint<T>) -> Option<TimePoint<T>> {
        if self.rng.random_bool(self.config.open_ended_probability) {
            return None;
        }
        let draw = self.active.sample(&mut self.rng).ceil().max(1.0);
        let secs: T = NumCast::from(draw).unwrap_or_else(T::max_value);
        Some(start.saturating_add(TimeDelta::new(secs)))
    }

    fn sample_location(&mut self) -> Point {
        let extent = self.config.extent;
        let (min, max) = (extent.min(), extent.max());
        Point::new(
            self.rng.random_range(min.x()..=max.x()),
            self.rng.random_range(min.y()..=max.y()),
        )
    }
}

impl<T> Iterator for RecordGenerator<T>
where
    T: TimeVariable + NumCast + SampleUniform,
{
    type Item = Record<T, Point>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_id as usize >= self.config.amount {
            return None;
        }
        let id = self.fresh_id();
        let start = self.sample_start();
        let end = self.sample_end(start);
        let location = self.sample_location();
        Some(Record::new(start, end, location).with_id(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.config.amount.saturating_sub(self.next_id as usize);
        (left, Some(left))
    }
}

impl<T> ExactSizeIterator for RecordGenerator<T> where T: TimeVariable + NumCast + SampleUniform {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::BoundingBox;
    use fleet_avail_core::time::TimeInterval;

    fn config(seed: u64, open: f64) -> RecordGenConfig<i64> {
        RecordGenConfigBuilder::new()
            .domain(TimeInterval::new(TimePoint::new(1_000), TimePoint::new(11_000)))
            .amount(500)
            .mean_active(TimeDelta::new(600))
            .lead_in(TimeDelta::new(2_000))
            .open_ended_probability(open)
            .extent(BoundingBox::new(Point::new(-1.0, -1.0), Point::new(1.0, 1.0)))
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_generates_exact_amount_within_bounds() {
        let mut generator = RecordGenerator::new(config(3, 0.2));
        assert_eq!(generator.len(), 500);
        let records = generator.generate();
        assert_eq!(records.len(), 500);
        assert_eq!(generator.next(), None);

        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.id(), Some(RecordId::new(i as u64)));
            assert!(r.start().value() >= -1_000 && r.start().value() < 11_000);
            if let Some(end) = r.end() {
                assert!(end > r.start());
            }
            let p = r.location();
            assert!((-1.0..=1.0).contains(&p.x()) && (-1.0..=1.0).contains(&p.y()));
        }
    }

    #[test]
    fn test_same_seed_same_records() {
        let a: Vec<_> = RecordGenerator::new(config(11, 0.3)).collect();
        let b: Vec<_> = RecordGenerator::new(config(11, 0.3)).collect();
        let c: Vec<_> = RecordGenerator::new(config(12, 0.3)).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_open_ended_probability_extremes() {
        assert!(RecordGenerator::new(config(5, 0.0)).all(|r| r.end().is_some()));
        assert!(RecordGenerator::new(config(5, 1.0)).all(|r| r.end().is_none()));
    }
}
