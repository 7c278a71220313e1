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

use std::fmt::Display;

use fleet_avail_core::{
    TimeVariable,
    time::{TimeDelta, TimeInterval},
};
use num_traits::NumCast;
use rand::Rng;

use super::err::RecordGenConfigBuildError;
use crate::geo::{BoundingBox, Point};

/// Configuration for synthetic record generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordGenConfig<T: TimeVariable> {
    pub(crate) domain: TimeInterval<T>,
    pub(crate) amount: usize,
    pub(crate) mean_active: TimeDelta<T>,
    pub(crate) lead_in: TimeDelta<T>,
    pub(crate) open_ended_probability: f64,
    pub(crate) extent: BoundingBox,
    pub(crate) seed: u64,
}

impl<T: TimeVariable> RecordGenConfig<T> {
    #[inline]
    pub fn domain(&self) -> TimeInterval<T> {
        self.domain
    }
    #[inline]
    pub fn amount(&self) -> usize {
        self.amount
    }
    #[inline]
    pub fn mean_active(&self) -> TimeDelta<T> {
        self.mean_active
    }
    #[inline]
    pub fn lead_in(&self) -> TimeDelta<T> {
        self.lead_in
    }
    #[inline]
    pub fn open_ended_probability(&self) -> f64 {
        self.open_ended_probability
    }
    #[inline]
    pub fn extent(&self) -> BoundingBox {
        self.extent
    }
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<T: TimeVariable> Display for RecordGenConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RecordGenConfig {{ domain: {}, amount: {}, mean_active: {}, lead_in: {}, \
             open_ended_probability: {:.3}, extent: [{}, {}], seed: {} }}",
            self.domain,
            self.amount,
            self.mean_active,
            self.lead_in,
            self.open_ended_probability,
            self.extent.min(),
            self.extent.max(),
            self.seed
        )
    }
}

/// Builder for `RecordGenConfig`.
pub struct RecordGenConfigBuilder<T: TimeVariable> {
    // Required
    domain: Option<TimeInterval<T>>,
    amount: Option<usize>,

    // Optional with defaults
    mean_active: TimeDelta<T>,
    lead_in: TimeDelta<T>,
    open_ended_probability: f64,
    extent: BoundingBox,
    seed: u64,
}

impl<T: TimeVariable + NumCast> Default for RecordGenConfigBuilder<T> {
    fn default() -> Self {
        fn secs<T: TimeVariable + NumCast>(v: i64) -> TimeDelta<T> {
            TimeDelta::new(NumCast::from(v).unwrap_or_else(T::max_value))
        }
        Self {
            domain: None,
            amount: None,
            mean_active: secs(3 * 3600),
            lead_in: secs(24 * 3600),
            open_ended_probability: 0.1,
            extent: BoundingBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            seed: rand::rng().random(),
        }
    }
}

impl<T: TimeVariable + NumCast> RecordGenConfigBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn domain(mut self, v: TimeInterval<T>) -> Self {
        self.domain = Some(v);
        self
    }
    #[inline]
    pub fn amount(mut self, v: usize) -> Self {
        self.amount = Some(v);
        self
    }
    #[inline]
    pub fn mean_active(mut self, v: TimeDelta<T>) -> Self {
        self.mean_active = v;
        self
    }
    /// How far before the domain start a record may begin.
    #[inline]
    pub fn lead_in(mut self, v: TimeDelta<T>) -> Self {
        self.lead_in = v;
        self
    }
    #[inline]
    pub fn open_ended_probability(mut self, v: f64) -> Self {
        self.open_ended_probability = v;
        self
    }
    #[inline]
    pub fn extent(mut self, v: BoundingBox) -> Self {
        self.extent = v;
        self
    }
    #[inline]
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    pub fn build(self) -> Result<RecordGenConfig<T>, RecordGenConfigBuildError> {
        let domain = self.domain.ok_or(RecordGenConfigBuildError::MissingDomain)?;
        let amount = self.amount.ok_or(RecordGenConfigBuildError::MissingAmount)?;
        if domain.is_empty() {
            return Err(RecordGenConfigBuildError::EmptyDomain);
        }
        if !self.mean_active.is_positive() {
            return Err(RecordGenConfigBuildError::NonPositiveMeanActive);
        }
        if self.lead_in.value() < T::zero() {
            return Err(RecordGenConfigBuildError::NegativeLeadIn);
        }
        if !(0.0..=1.0).contains(&self.open_ended_probability) {
            return Err(RecordGenConfigBuildError::OpenEndedProbabilityOutOfRange);
        }
        if !self.extent.min().is_finite() || !self.extent.max().is_finite() {
            return Err(RecordGenConfigBuildError::NonFiniteExtent);
        }
        Ok(RecordGenConfig {
            domain,
            amount,
            mean_active: self.mean_active,
            lead_in: self.lead_in,
            open_ended_probability: self.open_ended_probability,
            extent: self.extent,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_avail_core::time::TimePoint;

    fn domain() -> TimeInterval<i64> {
        TimeInterval::new(TimePoint::new(0), TimePoint::new(1000))
    }

    #[test]
    fn test_build_requires_domain_and_amount() {
        let e = RecordGenConfigBuilder::<i64>::new().amount(3).build().unwrap_err();
        assert_eq!(e, RecordGenConfigBuildError::MissingDomain);
        let e = RecordGenConfigBuilder::<i64>::new()
            .domain(domain())
            .build()
            .unwrap_err();
        assert_eq!(e, RecordGenConfigBuildError::MissingAmount);
    }

    #[test]
    fn test_build_validates_ranges() {
        let base = || RecordGenConfigBuilder::<i64>::new().domain(domain()).amount(1);
        assert_eq!(
            base().mean_active(TimeDelta::new(0)).build().unwrap_err(),
            RecordGenConfigBuildError::NonPositiveMeanActive
        );
        assert_eq!(
            base().lead_in(TimeDelta::new(-1)).build().unwrap_err(),
            RecordGenConfigBuildError::NegativeLeadIn
        );
        assert_eq!(
            base().open_ended_probability(1.5).build().unwrap_err(),
            RecordGenConfigBuildError::OpenEndedProbabilityOutOfRange
        );
        assert_eq!(
            RecordGenConfigBuilder::<i64>::new()
                .domain(TimeInterval::new(TimePoint::new(5), TimePoint::new(5)))
                .amount(1)
                .build()
                .unwrap_err(),
            RecordGenConfigBuildError::EmptyDomain
        );
    }

    #[test]
    fn test_build_keeps_values() {
        let cfg = RecordGenConfigBuilder::<i64>::new()
            .domain(domain())
            .amount(12)
            .seed(7)
            .open_ended_probability(0.0)
            .build()
            .unwrap();
        assert_eq!(cfg.amount(), 12);
        assert_eq!(cfg.seed(), 7);
        assert_eq!(cfg.open_ended_probability(), 0.0);
        assert!(cfg.to_string().starts_with("RecordGenConfig {"));
    }
}
