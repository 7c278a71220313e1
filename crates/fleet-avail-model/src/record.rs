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

use crate::id::RecordId;
use fleet_avail_core::{
    TimeVariable,
    primitives::Interval,
    time::{TimeInterval, TimePoint},
};
use std::fmt::Display;

/// A single entity's active window and where it was observed.
///
/// `end == None` means the entity had not become inactive when the data was
/// collected; a measurement treats such a record as active up to the end of
/// its analysis window.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T: TimeVariable, L> {
    id: Option<RecordId>,
    start: TimePoint<T>,
    end: Option<TimePoint<T>>,
    location: L,
}

impl<T: TimeVariable, L> Record<T, L> {
    #[inline]
    pub fn new(start: TimePoint<T>, end: Option<TimePoint<T>>, location: L) -> Self {
        Self {
            id: None,
            start,
            end,
            location,
        }
    }

    #[inline]
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    #[inline]
    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    #[inline]
    pub fn start(&self) -> TimePoint<T> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<TimePoint<T>> {
        self.end
    }

    #[inline]
    pub fn location(&self) -> &L {
        &self.location
    }

    #[inline]
    pub fn is_open_ended(&self) -> bool {
        self.end.is_none()
    }

    /// The closed-off window `[start, end)`, or `None` if the record is open
    /// ended or its bounds are reversed.
    #[inline]
    pub fn window(&self) -> Option<TimeInterval<T>> {
        Interval::ordered(self.start, self.end?)
    }

    /// Maps the location while keeping id and timing.
    pub fn map_location<M>(self, f: impl FnOnce(L) -> M) -> Record<T, M> {
        Record {
            id: self.id,
            start: self.start,
            end: self.end,
            location: f(self.location),
        }
    }
}

impl<T: TimeVariable, L: Display> Display for Record<T, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(f, "Record([{}, {}) at {})", self.start, end, self.location),
            None => write!(f, "Record([{}, ..) at {})", self.start, self.location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_of_closed_and_open_records() {
        let closed = Record::new(TimePoint::new(10i64), Some(TimePoint::new(20)), ());
        assert_eq!(
            closed.window(),
            Some(TimeInterval::new(TimePoint::new(10), TimePoint::new(20)))
        );
        assert!(!closed.is_open_ended());

        let open = Record::new(TimePoint::new(10i64), None, ());
        assert_eq!(open.window(), None);
        assert!(open.is_open_ended());
    }

    #[test]
    fn test_reversed_record_has_no_window() {
        let r = Record::new(TimePoint::new(30i64), Some(TimePoint::new(10)), ());
        assert_eq!(r.window(), None);
    }

    #[test]
    fn test_map_location_keeps_timing_and_id() {
        let r = Record::new(TimePoint::new(1i64), Some(TimePoint::new(2)), 7u32)
            .with_id(RecordId::new(9));
        let mapped = r.map_location(|v| v.to_string());
        assert_eq!(mapped.id(), Some(RecordId::new(9)));
        assert_eq!(mapped.start(), TimePoint::new(1));
        assert_eq!(mapped.location(), "7");
    }

    #[test]
    fn test_display() {
        let r = Record::new(TimePoint::new(1i64), None, "here");
        assert_eq!(r.to_string(), "Record([TimePoint(1), ..) at here)");
    }
}
