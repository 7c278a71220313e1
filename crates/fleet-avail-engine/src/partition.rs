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

//! Partition: an exact, gap-free tiling of a time domain with overlap counts.
//!
//! Invariants (always held):
//!    - segments tile `[domain.start, domain.end)` exactly, with no gaps and no overlaps
//!    - consecutive segments touch: `prev.end == next.start`
//!    - segments are keyed by `start` alone; `end` and `count` never take part
//!      in ordering or equality
//!
//! Complexity:
//!    - insert_overlap: `O(log n + k)` map operations for `k` touched segments
//!    - count_at, segment_at: `O(log n)`
//!    - weighted_sum, weighted_reduction, peak: `O(n)`

use crate::err::{EmptyDomainError, InvalidDomainError, InvalidQueryIntervalError};
use fleet_avail_core::{
    TimeVariable,
    primitives::Interval,
    time::{TimeDelta, TimeInterval, TimePoint},
};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::trace;

/// Data stored for each segment under its start key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell<T: TimeVariable> {
    end: TimePoint<T>,
    count: u64,
}

/// One piece of a [`Partition`]: a half-open window and how many inserted
/// intervals cover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<T: TimeVariable> {
    interval: TimeInterval<T>,
    count: u64,
}

impl<T: TimeVariable> Segment<T> {
    #[inline]
    pub fn new(interval: TimeInterval<T>, count: u64) -> Self {
        Self { interval, count }
    }

    #[inline]
    pub fn interval(&self) -> TimeInterval<T> {
        self.interval
    }

    #[inline]
    pub fn start(&self) -> TimePoint<T> {
        self.interval.start()
    }

    #[inline]
    pub fn end(&self) -> TimePoint<T> {
        self.interval.end()
    }

    /// # Panics
    ///
    /// If the length does not fit in `T`; [`Segment::weight`] never does.
    #[inline]
    pub fn duration(&self) -> TimeDelta<T> {
        self.interval.duration()
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// `count * duration`, exact.
    #[inline]
    pub fn weight(&self) -> i128 {
        i128::from(self.count) * self.interval.duration_i128()
    }
}

impl<T: TimeVariable> Display for Segment<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.interval, self.count)
    }
}

/// How an existing segment `[s, e)` relates to a query window `[qs, qe)`
/// that it overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// `qs <= s` and `qe >= e`: the whole segment gains one.
    Covered,
    /// `qs <= s < qe < e`: split at `qe`.
    RightEdgeInside,
    /// `s < qs < e <= qe`: split at `qs`.
    LeftEdgeInside,
    /// `s < qs` and `qe < e`: split at both.
    StrictlyInside,
}

impl Overlap {
    #[inline]
    fn classify<T: TimeVariable>(segment: TimeInterval<T>, query: TimeInterval<T>) -> Self {
        debug_assert!(segment.intersects(&query));
        match (query.start() <= segment.start(), query.end() >= segment.end()) {
            (true, true) => Overlap::Covered,
            (true, false) => Overlap::RightEdgeInside,
            (false, true) => Overlap::LeftEdgeInside,
            (false, false) => Overlap::StrictlyInside,
        }
    }
}

/// Summary of one [`Partition::insert_overlap`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion<T: TimeVariable> {
    applied: Option<TimeInterval<T>>,
    touched: usize,
    produced: usize,
}

impl<T: TimeVariable> Insertion<T> {
    #[inline]
    fn noop() -> Self {
        Self {
            applied: None,
            touched: 0,
            produced: 0,
        }
    }

    /// The clipped window whose counts were incremented, or `None` when the
    /// query lay entirely outside the domain.
    #[inline]
    pub fn applied(&self) -> Option<TimeInterval<T>> {
        self.applied
    }

    /// Number of segments the query overlapped.
    #[inline]
    pub fn touched(&self) -> usize {
        self.touched
    }

    /// Number of segments that replaced them.
    #[inline]
    pub fn produced(&self) -> usize {
        self.produced
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.applied.is_none()
    }
}

/// The highest overlap count and the first segment where it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak<T: TimeVariable> {
    count: u64,
    at: TimeInterval<T>,
}

impl<T: TimeVariable> Peak<T> {
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn at(&self) -> TimeInterval<T> {
        self.at
    }
}

/// The first broken invariant found by [`Partition::check_invariants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation<T: TimeVariable> {
    /// The first segment does not begin at the domain start.
    StartMismatch { expected: TimePoint<T>, found: TimePoint<T> },
    /// The last segment does not end at the domain end.
    EndMismatch { expected: TimePoint<T>, found: TimePoint<T> },
    /// A segment with `start >= end`.
    EmptySegment { at: TimePoint<T> },
    /// Two consecutive segments do not touch.
    Discontinuity { end: TimePoint<T>, next_start: TimePoint<T> },
}

impl<T: TimeVariable> Display for InvariantViolation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::StartMismatch { expected, found } => {
                write!(f, "first segment starts at {}, expected {}", found, expected)
            }
            InvariantViolation::EndMismatch { expected, found } => {
                write!(f, "last segment ends at {}, expected {}", found, expected)
            }
            InvariantViolation::EmptySegment { at } => write!(f, "empty segment at {}", at),
            InvariantViolation::Discontinuity { end, next_start } => write!(
                f,
                "segment ending at {} is followed by one starting at {}",
                end, next_start
            ),
        }
    }
}

/// An ordered, gap-free decomposition of a bounded time domain into segments,
/// each carrying the number of inserted intervals that cover it.
///
/// A new partition holds a single segment spanning the whole domain with
/// count 0. [`insert_overlap`](Partition::insert_overlap) refines it at the
/// query's (clipped) endpoints and increments every covered segment. Adjacent
/// segments with equal counts are left apart unless
/// [`coalesce`](Partition::coalesce) is called; this never changes
/// [`weighted_reduction`](Partition::weighted_reduction).
///
/// ```
/// use fleet_avail_core::time::TimePoint;
/// use fleet_avail_engine::partition::Partition;
///
/// let tp = TimePoint::new;
/// let mut p = Partition::new(tp(0i64), tp(100)).unwrap();
/// p.insert_overlap(tp(10), Some(tp(30))).unwrap();
/// p.insert_overlap(tp(20), Some(tp(40))).unwrap();
/// assert_eq!(p.count_at(tp(25)), Some(2));
/// assert_eq!(p.weighted_reduction().unwrap(), 0.4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T: TimeVariable> {
    domain: TimeInterval<T>,
    cells: BTreeMap<TimePoint<T>, Cell<T>>,
}

impl<T: TimeVariable> Partition<T> {
    /// Creates a partition of `[start, end)` with a single zero-count segment.
    ///
    /// Fails if `start >= end`.
    pub fn new(start: TimePoint<T>, end: TimePoint<T>) -> Result<Self, InvalidDomainError<T>> {
        let domain = Interval::ordered(start, end)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| InvalidDomainError::new(start, end))?;
        let mut cells = BTreeMap::new();
        cells.insert(start, Cell { end, count: 0 });
        Ok(Self { domain, cells })
    }

    /// Like [`Partition::new`] for an already ordered interval. A
    /// `TimeInterval` built with `TimeInterval::new` has swapped reversed
    /// bounds, so pass raw bounds to `new` when they come from a caller.
    #[inline]
    pub fn from_domain(domain: TimeInterval<T>) -> Result<Self, InvalidDomainError<T>> {
        Self::new(domain.start(), domain.end())
    }

    #[inline]
    pub fn domain(&self) -> TimeInterval<T> {
        self.domain
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a partition covers a non-empty domain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds one to the count of every point in `[start, end) ∩ domain`.
    ///
    /// `end == None` means the interval is still open and runs to the domain
    /// end. Parts outside the domain are clipped; an interval entirely outside
    /// it is accepted and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidQueryIntervalError`] if `end` is present and
    /// `start >= end`. The partition is left untouched in that case.
    pub fn insert_overlap(
        &mut self,
        start: TimePoint<T>,
        end: Option<TimePoint<T>>,
    ) -> Result<Insertion<T>, InvalidQueryIntervalError<T>> {
        if let Some(end) = end.filter(|e| start >= *e) {
            return Err(InvalidQueryIntervalError::new(start, end));
        }

        let clipped_end = end.map_or(self.domain.end(), |e| e.min(self.domain.end()));
        let clipped_start = start.max(self.domain.start());
        let Some(query) = Interval::ordered(clipped_start, clipped_end).filter(|q| !q.is_empty())
        else {
            trace!(%start, "query lies outside the domain");
            return Ok(Insertion::noop());
        };

        // The segment holding `query.start()` is the last one starting at or before it.
        let first = self
            .cells
            .range(..=query.start())
            .next_back()
            .map_or(self.domain.start(), |(s, _)| *s);

        let mut run: Vec<(TimePoint<T>, Cell<T>)> = Vec::new();
        let mut touched = 0;
        for (&s, cell) in self.cells.range(first..query.end()) {
            touched += 1;
            refine(s, *cell, query, &mut run);
        }

        let produced = run.len();
        self.splice(first..query.end(), run);
        trace!(%query, touched, produced, segments = self.cells.len(), "spliced");

        Ok(Insertion {
            applied: Some(query),
            touched,
            produced,
        })
    }

    /// Replaces every segment starting in `range` by `run` in one step.
    ///
    /// Refinement only ever adds boundaries, so each start key in `range`
    /// reappears in `run`; overwriting those keys and inserting the new ones
    /// replaces the whole run without a separate removal pass.
    fn splice(&mut self, range: std::ops::Range<TimePoint<T>>, run: Vec<(TimePoint<T>, Cell<T>)>) {
        debug_assert!(
            self.cells
                .range(range)
                .all(|(k, _)| run.binary_search_by_key(k, |(s, _)| *s).is_ok()),
            "splice would drop an existing boundary"
        );
        self.cells.extend(run);
    }

    /// Overlap count at `t`, or `None` if `t` lies outside the domain.
    #[inline]
    pub fn count_at(&self, t: TimePoint<T>) -> Option<u64> {
        self.segment_at(t).map(|s| s.count())
    }

    /// The segment containing `t`, or `None` if `t` lies outside the domain.
    #[inline]
    pub fn segment_at(&self, t: TimePoint<T>) -> Option<Segment<T>> {
        if !self.domain.contains(t) {
            return None;
        }
        self.cells
            .range(..=t)
            .next_back()
            .map(|(s, c)| segment(*s, c))
    }

    /// Segments in ascending order.
    #[inline]
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = Segment<T>> + ExactSizeIterator + '_ {
        self.cells.iter().map(|(s, c)| segment(*s, c))
    }

    /// `Σ count × duration` over all segments, computed exactly.
    pub fn weighted_sum(&self) -> i128 {
        self.segments().map(|s| s.weight()).sum()
    }

    /// The time-weighted average count over the domain:
    /// `Σ count × duration / domain duration`.
    ///
    /// Only the final division is performed in floating point, so any two
    /// partitions built from the same intervals yield identical results.
    pub fn weighted_reduction(&self) -> Result<f64, EmptyDomainError<T>> {
        let length = self.domain.duration_i128();
        if length <= 0 {
            return Err(EmptyDomainError::new(self.domain));
        }
        Ok(self.weighted_sum() as f64 / length as f64)
    }

    /// Highest count and the earliest segment reaching it.
    pub fn peak(&self) -> Peak<T> {
        self.segments().fold(
            Peak {
                count: 0,
                at: self.first_segment().interval(),
            },
            |best, s| {
                if s.count() > best.count {
                    Peak {
                        count: s.count(),
                        at: s.interval(),
                    }
                } else {
                    best
                }
            },
        )
    }

    /// Total length with at least one covering interval, widened to `i128`
    /// like [`weighted_sum`](Self::weighted_sum).
    pub fn covered_duration(&self) -> i128 {
        self.segments()
            .filter(|s| s.count() > 0)
            .map(|s| s.interval().duration_i128())
            .sum()
    }

    /// Merges neighbouring segments with equal counts and returns how many
    /// segments were removed.
    pub fn coalesce(&mut self) -> usize {
        let before = self.cells.len();
        let mut merged: BTreeMap<TimePoint<T>, Cell<T>> = BTreeMap::new();
        let mut open: Option<(TimePoint<T>, Cell<T>)> = None;
        for (start, cell) in std::mem::take(&mut self.cells) {
            open = match open {
                Some((s, mut acc)) if acc.count == cell.count => {
                    acc.end = cell.end;
                    Some((s, acc))
                }
                Some((s, acc)) => {
                    merged.insert(s, acc);
                    Some((start, cell))
                }
                None => Some((start, cell)),
            };
        }
        if let Some((s, acc)) = open {
            merged.insert(s, acc);
        }
        self.cells = merged;
        before - self.cells.len()
    }

    /// Verifies coverage and monotonicity.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation<T>> {
        let mut expected = self.domain.start();
        let mut first = true;
        for (&start, cell) in &self.cells {
            if first && start != expected {
                return Err(InvariantViolation::StartMismatch {
                    expected,
                    found: start,
                });
            }
            if !first && start != expected {
                return Err(InvariantViolation::Discontinuity {
                    end: expected,
                    next_start: start,
                });
            }
            if start >= cell.end {
                return Err(InvariantViolation::EmptySegment { at: start });
            }
            expected = cell.end;
            first = false;
        }
        if expected != self.domain.end() {
            return Err(InvariantViolation::EndMismatch {
                expected: self.domain.end(),
                found: expected,
            });
        }
        Ok(())
    }

    #[inline]
    fn first_segment(&self) -> Segment<T> {
        self.segments().next().unwrap_or(Segment::new(self.domain, 0))
    }
}

impl<T: TimeVariable> Display for Partition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.segments().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {}) -> {}", s.start().value(), s.end().value(), s.count())?;
        }
        write!(f, "]")
    }
}

#[inline]
fn segment<T: TimeVariable>(start: TimePoint<T>, cell: &Cell<T>) -> Segment<T> {
    Segment::new(TimeInterval::new(start, cell.end), cell.count)
}

/// Pushes the 1 to 3 segments replacing `[s, cell.end)` under `query`.
fn refine<T: TimeVariable>(
    s: TimePoint<T>,
    cell: Cell<T>,
    query: TimeInterval<T>,
    out: &mut Vec<(TimePoint<T>, Cell<T>)>,
) {
    let Cell { end: e, count: c } = cell;
    let (qs, qe) = (query.start(), query.end());
    let bumped = |end| Cell { end, count: c + 1 };
    let kept = |end| Cell { end, count: c };

    match Overlap::classify(TimeInterval::new(s, e), query) {
        Overlap::Covered => out.push((s, bumped(e))),
        Overlap::RightEdgeInside => {
            out.push((s, bumped(qe)));
            out.push((qe, kept(e)));
        }
        Overlap::LeftEdgeInside => {
            out.push((s, kept(qs)));
            out.push((qs, bumped(e)));
        }
        Overlap::StrictlyInside => {
            out.push((s, kept(qs)));
            out.push((qs, bumped(qe)));
            out.push((qe, kept(e)));
        }
    }
}
