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

//! # Core Primitives
//!
//! The generic half-open interval every time window in the workspace is
//! built from.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Sub;

/// A half-open interval `[start, end)`.
///
/// The start is inclusive and the end is exclusive, so the interval holds all
/// values `x` with `start <= x < end`. An interval with `start == end` is empty.
///
/// # Examples
///
/// ```
/// use fleet_avail_core::primitives::Interval;
/// let interval = Interval::new(1, 5);
/// assert_eq!(interval.start(), 1);
/// assert_eq!(interval.end(), 5);
/// assert!(interval.contains(3));
/// assert!(!interval.contains(5));
/// assert_eq!(interval.length(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> Interval<T> {
    /// Creates a new half-open interval from two bounds in either order.
    ///
    /// The smaller bound becomes the start. Use [`Interval::ordered`] when a
    /// reversed pair must be treated as invalid input instead.
    ///
    /// # Panics
    ///
    /// Panics if `a` and `b` are not comparable.
    ///
    /// ```
    /// use fleet_avail_core::primitives::Interval;
    ///
    /// let interval = Interval::new(5, 3);
    /// assert_eq!(interval.start(), 3);
    /// assert_eq!(interval.end(), 5);
    /// ```
    #[inline]
    pub fn new(a: T, b: T) -> Self
    where
        T: PartialOrd + Copy,
    {
        let ord = a
            .partial_cmp(&b)
            .expect("Interval::new: non-comparable bounds (NaN?)");
        let (s, e) = match ord {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };
        Self {
            start_inclusive: s,
            end_exclusive: e,
        }
    }

    /// Creates `[start, end)` only if `start <= end`.
    ///
    /// ```
    /// use fleet_avail_core::primitives::Interval;
    ///
    /// assert!(Interval::ordered(1, 5).is_some());
    /// assert!(Interval::ordered(5, 5).is_some());
    /// assert!(Interval::ordered(5, 1).is_none());
    /// ```
    #[inline]
    pub fn ordered(start: T, end: T) -> Option<Self>
    where
        T: PartialOrd,
    {
        (start <= end).then_some(Self {
            start_inclusive: start,
            end_exclusive: end,
        })
    }

    #[inline]
    pub fn start(&self) -> T
    where
        T: Copy,
    {
        self.start_inclusive
    }

    #[inline]
    pub fn end(&self) -> T
    where
        T: Copy,
    {
        self.end_exclusive
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    where
        T: PartialEq,
    {
        self.start_inclusive == self.end_exclusive
    }

    /// Checks whether `x` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, x: T) -> bool
    where
        T: PartialOrd,
    {
        x >= self.start_inclusive && x < self.end_exclusive
    }

    /// Checks whether `other` lies entirely within this interval.
    ///
    /// ```
    /// use fleet_avail_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert!(a.contains_interval(&Interval::new(2, 4)));
    /// assert!(a.contains_interval(&a));
    /// assert!(!a.contains_interval(&Interval::new(0, 6)));
    /// ```
    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        other.start_inclusive >= self.start_inclusive && other.end_exclusive <= self.end_exclusive
    }

    /// Checks whether the two intervals share at least one point.
    ///
    /// Touching intervals such as `[1, 5)` and `[5, 8)` do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    /// Returns the overlap of this interval with `boundary`, or `None` when
    /// the overlap would be empty.
    ///
    /// ```
    /// use fleet_avail_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert_eq!(a.clamp(&Interval::new(3, 7)), Some(Interval::new(3, 5)));
    /// assert_eq!(a.clamp(&Interval::new(5, 8)), None);
    /// ```
    #[inline]
    pub fn clamp(&self, boundary: &Self) -> Option<Self>
    where
        T: PartialOrd + Copy,
    {
        let start = if self.start_inclusive > boundary.start_inclusive {
            self.start_inclusive
        } else {
            boundary.start_inclusive
        };
        let end = if self.end_exclusive < boundary.end_exclusive {
            self.end_exclusive
        } else {
            boundary.end_exclusive
        };
        (start < end).then_some(Self {
            start_inclusive: start,
            end_exclusive: end,
        })
    }

    #[inline]
    pub fn length<D>(&self) -> D
    where
        T: Copy + Sub<Output = D>,
    {
        self.end_exclusive - self.start_inclusive
    }

    #[inline]
    pub fn to_range(&self) -> std::ops::Range<T>
    where
        T: Copy,
    {
        self.start()..self.end()
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T: Copy + PartialOrd> From<std::ops::Range<T>> for Interval<T> {
    #[inline]
    fn from(r: std::ops::Range<T>) -> Self {
        Interval::new(r.start, r.end)
    }
}
