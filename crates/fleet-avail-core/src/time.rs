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

//! # Time Types
//!
//! - `TimePoint<T>`: an instant, in seconds.
//! - `TimeDelta<T>`: a signed duration, the difference of two instants.
//! - `TimeInterval<T>`: a half-open `[start, end)` window of two `TimePoint`s.
//!
//! Distinct newtypes keep instants and durations apart at compile time, so
//! two `TimePoint`s cannot be added and a duration cannot be used as an
//! instant by accident.

use crate::primitives::Interval;
use num_traits::{PrimInt, Signed, Zero};
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub},
};

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePoint<T: PrimInt>(T);

impl<T: PrimInt> Default for TimePoint<T> {
    #[inline]
    fn default() -> Self {
        TimePoint(T::zero())
    }
}

impl<T: PrimInt + Display> Display for TimePoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimePoint({})", self.value())
    }
}

impl<T: PrimInt> From<T> for TimePoint<T> {
    #[inline]
    fn from(v: T) -> Self {
        TimePoint(v)
    }
}

impl<T: PrimInt> TimePoint<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        TimePoint(value)
    }

    #[inline]
    pub fn zero() -> Self {
        TimePoint::new(T::zero())
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }
}

impl<T: PrimInt + Signed> TimePoint<T> {
    #[inline]
    pub fn checked_add(self, delta: TimeDelta<T>) -> Option<Self> {
        self.0.checked_add(&delta.0).map(TimePoint)
    }

    #[inline]
    pub fn checked_sub(self, delta: TimeDelta<T>) -> Option<Self> {
        self.0.checked_sub(&delta.0).map(TimePoint)
    }

    #[inline]
    pub fn saturating_add(self, delta: TimeDelta<T>) -> Self {
        TimePoint(self.0.saturating_add(delta.0))
    }

    /// Returns `[self, self + len)`, or `None` on overflow.
    #[inline]
    pub fn span_of(self, len: TimeDelta<T>) -> Option<TimeInterval<T>> {
        let end = self.checked_add(len)?;
        Interval::ordered(self, end)
    }
}

pub type TimeInterval<T> = Interval<TimePoint<T>>;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeDelta<T: PrimInt + Signed>(T);

impl<T: PrimInt + Signed> TimeDelta<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[inline]
    pub fn zero() -> Self {
        Self(T::zero())
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0.is_positive()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Widens the duration to `i128` for exact accumulation.
    #[inline]
    pub fn to_i128(self) -> i128 {
        self.0.to_i128().unwrap_or(i128::MAX)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T: PrimInt + Display + Signed> Display for TimeDelta<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeDelta({})", self.value())
    }
}

impl<T: PrimInt + Signed> Add<TimeDelta<T>> for TimePoint<T> {
    type Output = TimePoint<T>;

    #[inline]
    fn add(self, rhs: TimeDelta<T>) -> Self::Output {
        TimePoint(
            self.0
                .checked_add(&rhs.0)
                .expect("overflow in TimePoint + TimeDelta"),
        )
    }
}

impl<T: PrimInt + Signed> AddAssign<TimeDelta<T>> for TimePoint<T> {
    #[inline]
    fn add_assign(&mut self, rhs: TimeDelta<T>) {
        *self = *self + rhs;
    }
}

impl<T: PrimInt + Signed> Sub<TimeDelta<T>> for TimePoint<T> {
    type Output = TimePoint<T>;

    #[inline]
    fn sub(self, rhs: TimeDelta<T>) -> Self::Output {
        TimePoint(
            self.0
                .checked_sub(&rhs.0)
                .expect("overflow in TimePoint - TimeDelta"),
        )
    }
}

impl<T: PrimInt + Signed> Sub<TimePoint<T>> for TimePoint<T> {
    type Output = TimeDelta<T>;

    #[inline]
    fn sub(self, rhs: TimePoint<T>) -> Self::Output {
        TimeDelta(
            self.0
                .checked_sub(&rhs.0)
                .expect("overflow in TimePoint - TimePoint"),
        )
    }
}

impl<T: PrimInt + Signed> Add for TimeDelta<T> {
    type Output = TimeDelta<T>;

    #[inline]
    fn add(self, rhs: TimeDelta<T>) -> Self::Output {
        TimeDelta(
            self.0
                .checked_add(&rhs.0)
                .expect("overflow in TimeDelta + TimeDelta"),
        )
    }
}

impl<T: PrimInt + Signed> Sub for TimeDelta<T> {
    type Output = TimeDelta<T>;

    #[inline]
    fn sub(self, rhs: TimeDelta<T>) -> Self::Output {
        TimeDelta(
            self.0
                .checked_sub(&rhs.0)
                .expect("overflow in TimeDelta - TimeDelta"),
        )
    }
}

impl<T: PrimInt + Signed> Neg for TimeDelta<T> {
    type Output = TimeDelta<T>;

    #[inline]
    fn neg(self) -> Self::Output {
        TimeDelta(T::zero() - self.0)
    }
}

impl<T: PrimInt + Signed> Mul<T> for TimeDelta<T> {
    type Output = TimeDelta<T>;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        TimeDelta(
            self.0
                .checked_mul(&rhs)
                .expect("overflow in TimeDelta * scalar"),
        )
    }
}

impl<T: PrimInt + Signed> Zero for TimeDelta<T> {
    #[inline]
    fn zero() -> Self {
        TimeDelta(T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<T: PrimInt + Signed> From<T> for TimeDelta<T> {
    #[inline]
    fn from(v: T) -> Self {
        TimeDelta(v)
    }
}

impl<T: PrimInt + Signed> Default for TimeDelta<T> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: PrimInt + Signed> Sum for TimeDelta<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<T: PrimInt + Signed> Interval<TimePoint<T>> {
    #[inline]
    pub fn duration(&self) -> TimeDelta<T> {
        self.end() - self.start()
    }

    /// Length widened to `i128`. Unlike [`duration`](Self::duration) this
    /// cannot overflow for any `T` up to 64 bits, e.g. `[i64::MIN, i64::MAX)`.
    #[inline]
    pub fn duration_i128(&self) -> i128 {
        let start = self.start().value().to_i128().unwrap_or(i128::MIN);
        let end = self.end().value().to_i128().unwrap_or(i128::MAX);
        end.saturating_sub(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_point_display() {
        let tp = TimePoint::new(42);
        assert_eq!(format!("{}", tp), "TimePoint(42)");
    }

    #[test]
    fn test_time_point_difference_is_delta() {
        let a = TimePoint::new(10i64);
        let b = TimePoint::new(25i64);
        assert_eq!(b - a, TimeDelta::new(15));
        assert_eq!(a - b, TimeDelta::new(-15));
    }

    #[test]
    fn test_time_interval_duration_and_display() {
        let interval: TimeInterval<i32> = TimeInterval::new(TimePoint::new(10), TimePoint::new(20));
        assert_eq!(interval.duration(), TimeDelta::new(10));
        assert_eq!(format!("{}", interval), "[TimePoint(10), TimePoint(20))");
    }

    #[test]
    fn test_duration_i128_spans_full_range() {
        let full = TimeInterval::new(TimePoint::new(i64::MIN), TimePoint::new(i64::MAX));
        assert_eq!(full.duration_i128(), u64::MAX as i128);
        let small: TimeInterval<i32> = TimeInterval::new(TimePoint::new(-5), TimePoint::new(5));
        assert_eq!(small.duration_i128(), 10);
    }

    #[test]
    fn test_span_of() {
        let start = TimePoint::new(100i64);
        let span = start.span_of(TimeDelta::new(50)).unwrap();
        assert_eq!(span.start(), TimePoint::new(100));
        assert_eq!(span.end(), TimePoint::new(150));
        assert!(start.span_of(TimeDelta::new(-1)).is_none());
        assert!(TimePoint::new(i64::MAX).span_of(TimeDelta::new(1)).is_none());
    }

    #[test]
    fn test_timedelta_sum_and_widening() {
        let total: TimeDelta<i64> = [1, 2, 3].into_iter().map(TimeDelta::new).sum();
        assert_eq!(total, TimeDelta::new(6));
        assert_eq!(TimeDelta::new(i64::MAX).to_i128(), i64::MAX as i128);
        assert_eq!(TimeDelta::new(7i32).as_secs_f64(), 7.0);
    }

    #[test]
    #[should_panic(expected = "overflow in TimePoint + TimeDelta")]
    fn test_time_point_add_overflow_panics() {
        let _ = TimePoint::new(i32::MAX) + TimeDelta::new(1);
    }

    #[test]
    fn test_negation_and_scaling() {
        assert_eq!(-TimeDelta::new(4i64), TimeDelta::new(-4));
        assert_eq!(TimeDelta::new(4i64) * 3, TimeDelta::new(12));
    }
}
