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

//! # Fleet Availability Engine (`fleet-avail-engine`)
//!
//! Measures the time-weighted average number of concurrently active entities
//! over an analysis window.
//!
//! - [`partition`]: the interval partition. It keeps an exact tiling of the
//!   window, each piece annotated with how many inserted intervals cover it.
//! - [`measure`]: feeds records through an admission predicate into a
//!   partition and reduces it to a [`measure::Measurement`].

pub mod config;
pub mod err;
pub mod measure;
pub mod partition;

pub mod prelude {
    pub use crate::config::{InvalidIntervalPolicy, MeasureConfig};
    pub use crate::err::{
        EmptyDomainError, InvalidDomainError, InvalidQueryIntervalError, MeasureError,
        PartitionError, RejectedRecordError,
    };
    pub use crate::measure::{
        Aggregator, Measurement, Outcome, Tally, measure, measure_fallible, measure_par,
        measure_with,
    };
    pub use crate::partition::{Insertion, Partition, Peak, Segment};
}
