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

/// What an aggregation does with an admitted record whose end does not lie
/// after its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidIntervalPolicy {
    /// Stop and return the offending record's position and interval.
    #[default]
    Abort,
    /// Log the record, count it in the tally and continue.
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasureConfig {
    /// Emit a progress event every this many records; `0` disables it.
    pub progress_interval: usize,
    pub invalid_interval_policy: InvalidIntervalPolicy,
    /// Merge equal-count neighbours before reporting. Does not change the average.
    pub coalesce: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            progress_interval: 500,
            invalid_interval_policy: InvalidIntervalPolicy::Abort,
            coalesce: false,
        }
    }
}
