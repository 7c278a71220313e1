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

//! Aggregation of records into a time-weighted average.
//!
//! Records flow one way: admission predicate, interval insertion, weighted
//! reduction. Only the predicate may run in parallel ([`measure_par`]); the
//! partition itself is always built by a single serialized insertion stage.

use crate::{
    config::{InvalidIntervalPolicy, MeasureConfig},
    err::{MeasureError, RejectedRecordError},
    partition::{Partition, Peak},
};
use fleet_avail_core::{
    TimeVariable,
    time::{TimeInterval, TimePoint},
};
use fleet_avail_model::record::Record;
use rayon::prelude::*;
use std::{fmt::Display, ops::Range};
use tracing::{debug, info, instrument, warn};

/// What happened to one offered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Admitted,
    OutsideRegion,
    SkippedInvalid,
}

/// Per-record bookkeeping of an aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    seen: usize,
    admitted: usize,
    outside_region: usize,
    skipped_source: usize,
    skipped_invalid: usize,
}

impl Tally {
    /// Records offered or skipped so far.
    #[inline]
    pub fn seen(&self) -> usize {
        self.seen
    }
    #[inline]
    pub fn admitted(&self) -> usize {
        self.admitted
    }
    #[inline]
    pub fn outside_region(&self) -> usize {
        self.outside_region
    }
    /// Records the source could not decode.
    #[inline]
    pub fn skipped_source(&self) -> usize {
        self.skipped_source
    }
    /// Admitted records dropped under [`InvalidIntervalPolicy::Skip`].
    #[inline]
    pub fn skipped_invalid(&self) -> usize {
        self.skipped_invalid
    }
}

/// Result of an aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement<T: TimeVariable> {
    domain: TimeInterval<T>,
    average: f64,
    weighted_sum: i128,
    peak: Peak<T>,
    covered: i128,
    segments: usize,
    tally: Tally,
}

impl<T: TimeVariable> Measurement<T> {
    #[inline]
    pub fn domain(&self) -> TimeInterval<T> {
        self.domain
    }

    /// Time-weighted average number of active entities over the domain.
    #[inline]
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Exact `Σ count × duration` behind [`Measurement::average`].
    #[inline]
    pub fn weighted_sum(&self) -> i128 {
        self.weighted_sum
    }

    #[inline]
    pub fn peak(&self) -> Peak<T> {
        self.peak
    }

    /// Time within the domain with at least one active entity.
    #[inline]
    pub fn covered(&self) -> i128 {
        self.covered
    }

    /// Number of partition segments at the end of the aggregation.
    #[inline]
    pub fn segments(&self) -> usize {
        self.segments
    }

    #[inline]
    pub fn tally(&self) -> Tally {
        self.tally
    }
}

impl<T: TimeVariable> Display for Measurement<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Measurement {{ domain: {}, average: {:.6}, peak: {}, admitted: {}, seen: {} }}",
            self.domain,
            self.average,
            self.peak.count(),
            self.tally.admitted,
            self.tally.seen
        )
    }
}

/// Incremental aggregation over one domain.
///
/// [`measure`] and friends drive an `Aggregator` over a whole sequence; use it
/// directly when records arrive from a source that cannot be wrapped in an
/// iterator.
#[derive(Debug, Clone)]
pub struct Aggregator<T: TimeVariable> {
    partition: Partition<T>,
    config: MeasureConfig,
    tally: Tally,
}

impl<T: TimeVariable> Aggregator<T> {
    /// Starts an aggregation over `[domain.start, domain.end)`.
    ///
    /// Fails with an invalid-domain error unless `domain.start < domain.end`.
    #[inline]
    pub fn new(domain: Range<TimePoint<T>>) -> Result<Self, MeasureError<T>> {
        Self::with_config(domain, MeasureConfig::default())
    }

    pub fn with_config(
        domain: Range<TimePoint<T>>,
        config: MeasureConfig,
    ) -> Result<Self, MeasureError<T>> {
        Ok(Self {
            partition: Partition::new(domain.start, domain.end)?,
            config,
            tally: Tally::default(),
        })
    }

    #[inline]
    pub fn partition(&self) -> &Partition<T> {
        &self.partition
    }

    #[inline]
    pub fn tally(&self) -> Tally {
        self.tally
    }

    #[inline]
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Runs `admit` on the record's location and inserts its interval if
    /// the record is admitted.
    #[inline]
    pub fn observe<L>(
        &mut self,
        record: &Record<T, L>,
        mut admit: impl FnMut(&L) -> bool,
    ) -> Result<Outcome, MeasureError<T>> {
        let admitted = admit(record.location());
        self.offer(record.start(), record.end(), admitted)
    }

    /// Offers an interval whose admission has already been decided.
    ///
    /// # Errors
    ///
    /// Under [`InvalidIntervalPolicy::Abort`], an admitted interval with
    /// `end <= start` yields [`MeasureError::RejectedRecord`] carrying the
    /// record's position. The partition is unchanged by the rejected record.
    pub fn offer(
        &mut self,
        start: TimePoint<T>,
        end: Option<TimePoint<T>>,
        admitted: bool,
    ) -> Result<Outcome, MeasureError<T>> {
        let position = self.tally.seen;
        self.tally.seen += 1;

        let outcome = if !admitted {
            self.tally.outside_region += 1;
            Outcome::OutsideRegion
        } else {
            match self.partition.insert_overlap(start, end) {
                Ok(_) => {
                    self.tally.admitted += 1;
                    Outcome::Admitted
                }
                Err(e) => match self.config.invalid_interval_policy {
                    InvalidIntervalPolicy::Abort => {
                        return Err(RejectedRecordError::new(position, e).into());
                    }
                    InvalidIntervalPolicy::Skip => {
                        warn!(position, error = %e, "skipping record with invalid interval");
                        self.tally.skipped_invalid += 1;
                        Outcome::SkippedInvalid
                    }
                },
            }
        };

        self.report_progress();
        Ok(outcome)
    }

    /// Accounts for a record the source could not deliver.
    pub fn skip(&mut self, reason: &dyn Display) {
        let position = self.tally.seen;
        self.tally.seen += 1;
        self.tally.skipped_source += 1;
        warn!(position, %reason, "skipping unusable record");
        self.report_progress();
    }

    fn report_progress(&self) {
        let every = self.config.progress_interval;
        if every > 0 && self.tally.seen % every == 0 {
            debug!(
                seen = self.tally.seen,
                admitted = self.tally.admitted,
                segments = self.partition.len(),
                "progress"
            );
        }
    }

    /// Reduces the partition and returns the measurement.
    pub fn finish(mut self) -> Result<Measurement<T>, MeasureError<T>> {
        if self.config.coalesce {
            let merged = self.partition.coalesce();
            debug!(merged, "coalesced equal-count neighbours");
        }
        let average = self.partition.weighted_reduction()?;
        let measurement = Measurement {
            domain: self.partition.domain(),
            average,
            weighted_sum: self.partition.weighted_sum(),
            peak: self.partition.peak(),
            covered: self.partition.covered_duration(),
            segments: self.partition.len(),
            tally: self.tally,
        };
        info!(
            average,
            peak = measurement.peak.count(),
            admitted = self.tally.admitted,
            seen = self.tally.seen,
            segments = measurement.segments,
            "measurement finished"
        );
        Ok(measurement)
    }
}

/// Time-weighted average count of the admitted records' intervals over
/// `domain`, with the default configuration.
///
/// The domain bounds are taken as given: `start >= end` is an error, never
/// swapped. Each record whose location passes `admit` contributes `[start, end)`
/// clipped to the domain; an open-ended record runs to the domain end.
///
/// ```
/// use fleet_avail_core::time::TimePoint;
/// use fleet_avail_engine::measure::measure;
/// use fleet_avail_model::record::Record;
///
/// let tp = TimePoint::new;
/// let records = vec![
///     Record::new(tp(10i64), Some(tp(30)), "in"),
///     Record::new(tp(20), Some(tp(40)), "in"),
///     Record::new(tp(0), None, "out"),
/// ];
/// let m = measure(records, tp(0)..tp(100), |loc: &&str| *loc == "in").unwrap();
/// assert_eq!(m.average(), 0.4);
/// ```
pub fn measure<T, L, I, F>(
    records: I,
    domain: Range<TimePoint<T>>,
    admit: F,
) -> Result<Measurement<T>, MeasureError<T>>
where
    T: TimeVariable,
    I: IntoIterator<Item = Record<T, L>>,
    F: FnMut(&L) -> bool,
{
    measure_with(records, domain, admit, &MeasureConfig::default())
}

#[instrument(level = "info", skip_all, fields(start = %domain.start, end = %domain.end))]
pub fn measure_with<T, L, I, F>(
    records: I,
    domain: Range<TimePoint<T>>,
    mut admit: F,
    config: &MeasureConfig,
) -> Result<Measurement<T>, MeasureError<T>>
where
    T: TimeVariable,
    I: IntoIterator<Item = Record<T, L>>,
    F: FnMut(&L) -> bool,
{
    let mut aggregator = Aggregator::with_config(domain, config.clone())?;
    for record in records {
        aggregator.observe(&record, &mut admit)?;
    }
    aggregator.finish()
}

/// Like [`measure_with`], for sources that report undecodable records as
/// `Err` items. Those are counted in [`Tally::skipped_source`] and logged;
/// they never abort the aggregation.
#[instrument(level = "info", skip_all, fields(start = %domain.start, end = %domain.end))]
pub fn measure_fallible<T, L, E, I, F>(
    records: I,
    domain: Range<TimePoint<T>>,
    mut admit: F,
    config: &MeasureConfig,
) -> Result<Measurement<T>, MeasureError<T>>
where
    T: TimeVariable,
    E: Display,
    I: IntoIterator<Item = Result<Record<T, L>, E>>,
    F: FnMut(&L) -> bool,
{
    let mut aggregator = Aggregator::with_config(domain, config.clone())?;
    for item in records {
        match item {
            Ok(record) => {
                aggregator.observe(&record, &mut admit)?;
            }
            Err(reason) => aggregator.skip(&reason),
        }
    }
    aggregator.finish()
}

/// Like [`measure_with`], evaluating `admit` for all records in parallel.
///
/// Insertion still happens on the calling thread in input order, so the
/// result is identical to the sequential variant.
#[instrument(level = "info", skip_all, fields(start = %domain.start, end = %domain.end, records = records.len()))]
pub fn measure_par<T, L, F>(
    records: &[Record<T, L>],
    domain: Range<TimePoint<T>>,
    admit: F,
    config: &MeasureConfig,
) -> Result<Measurement<T>, MeasureError<T>>
where
    T: TimeVariable,
    L: Sync,
    F: Fn(&L) -> bool + Sync,
{
    let verdicts: Vec<bool> = records
        .par_iter()
        .map(|r| admit(r.location()))
        .collect();

    let mut aggregator = Aggregator::with_config(domain, config.clone())?;
    for (record, admitted) in records.iter().zip(verdicts) {
        aggregator.offer(record.start(), record.end(), admitted)?;
    }
    aggregator.finish()
}
