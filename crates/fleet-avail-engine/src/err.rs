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

use fleet_avail_core::{
    TimeVariable,
    time::{TimeInterval, TimePoint},
};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidDomainError<T: TimeVariable> {
    start: TimePoint<T>,
    end: TimePoint<T>,
}

impl<T: TimeVariable> InvalidDomainError<T> {
    #[inline]
    pub fn new(start: TimePoint<T>, end: TimePoint<T>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> TimePoint<T> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimePoint<T> {
        self.end
    }
}

impl<T: TimeVariable> Display for InvalidDomainError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Domain start {} must lie strictly before domain end {}",
            self.start, self.end
        )
    }
}

impl<T: TimeVariable> std::error::Error for InvalidDomainError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidQueryIntervalError<T: TimeVariable> {
    start: TimePoint<T>,
    end: TimePoint<T>,
}

impl<T: TimeVariable> InvalidQueryIntervalError<T> {
    #[inline]
    pub fn new(start: TimePoint<T>, end: TimePoint<T>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> TimePoint<T> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimePoint<T> {
        self.end
    }
}

impl<T: TimeVariable> Display for InvalidQueryIntervalError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Query interval start {} must lie strictly before its end {}",
            self.start, self.end
        )
    }
}

impl<T: TimeVariable> std::error::Error for InvalidQueryIntervalError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyDomainError<T: TimeVariable> {
    domain: TimeInterval<T>,
}

impl<T: TimeVariable> EmptyDomainError<T> {
    #[inline]
    pub fn new(domain: TimeInterval<T>) -> Self {
        Self { domain }
    }

    #[inline]
    pub fn domain(&self) -> TimeInterval<T> {
        self.domain
    }
}

impl<T: TimeVariable> Display for EmptyDomainError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot average over the empty domain {}", self.domain)
    }
}

impl<T: TimeVariable> std::error::Error for EmptyDomainError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionError<T: TimeVariable> {
    InvalidDomain(InvalidDomainError<T>),
    InvalidQueryInterval(InvalidQueryIntervalError<T>),
    EmptyDomain(EmptyDomainError<T>),
}

impl<T: TimeVariable> Display for PartitionError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionError::InvalidDomain(e) => write!(f, "{}", e),
            PartitionError::InvalidQueryInterval(e) => write!(f, "{}", e),
            PartitionError::EmptyDomain(e) => write!(f, "{}", e),
        }
    }
}

impl<T: TimeVariable> std::error::Error for PartitionError<T> {}

impl<T: TimeVariable> From<InvalidDomainError<T>> for PartitionError<T> {
    fn from(err: InvalidDomainError<T>) -> Self {
        Self::InvalidDomain(err)
    }
}

impl<T: TimeVariable> From<InvalidQueryIntervalError<T>> for PartitionError<T> {
    fn from(err: InvalidQueryIntervalError<T>) -> Self {
        Self::InvalidQueryInterval(err)
    }
}

impl<T: TimeVariable> From<EmptyDomainError<T>> for PartitionError<T> {
    fn from(err: EmptyDomainError<T>) -> Self {
        Self::EmptyDomain(err)
    }
}

/// A record whose interval was rejected while aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RejectedRecordError<T: TimeVariable> {
    position: usize,
    source: InvalidQueryIntervalError<T>,
}

impl<T: TimeVariable> RejectedRecordError<T> {
    #[inline]
    pub fn new(position: usize, source: InvalidQueryIntervalError<T>) -> Self {
        Self { position, source }
    }

    /// Zero-based position of the record in the input sequence.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn interval_error(&self) -> InvalidQueryIntervalError<T> {
        self.source
    }
}

impl<T: TimeVariable> Display for RejectedRecordError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record at position {} rejected: {}", self.position, self.source)
    }
}

impl<T: TimeVariable + 'static> std::error::Error for RejectedRecordError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureError<T: TimeVariable> {
    Partition(PartitionError<T>),
    RejectedRecord(RejectedRecordError<T>),
}

impl<T: TimeVariable> Display for MeasureError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::Partition(e) => write!(f, "{}", e),
            MeasureError::RejectedRecord(e) => write!(f, "{}", e),
        }
    }
}

impl<T: TimeVariable> std::error::Error for MeasureError<T> {}

impl<T: TimeVariable> From<PartitionError<T>> for MeasureError<T> {
    fn from(err: PartitionError<T>) -> Self {
        Self::Partition(err)
    }
}

impl<T: TimeVariable> From<InvalidDomainError<T>> for MeasureError<T> {
    fn from(err: InvalidDomainError<T>) -> Self {
        Self::Partition(err.into())
    }
}

impl<T: TimeVariable> From<EmptyDomainError<T>> for MeasureError<T> {
    fn from(err: EmptyDomainError<T>) -> Self {
        Self::Partition(err.into())
    }
}

impl<T: TimeVariable> From<RejectedRecordError<T>> for MeasureError<T> {
    fn from(err: RejectedRecordError<T>) -> Self {
        Self::RejectedRecord(err)
    }
}
