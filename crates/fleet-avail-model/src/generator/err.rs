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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordGenConfigBuildError {
    MissingDomain,
    MissingAmount,
    EmptyDomain,
    NonPositiveMeanActive,
    NegativeLeadIn,
    OpenEndedProbabilityOutOfRange,
    NonFiniteExtent,
}

impl Display for RecordGenConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RecordGenConfigBuildError::*;
        match self {
            MissingDomain => write!(f, "Missing domain"),
            MissingAmount => write!(f, "Missing amount"),
            EmptyDomain => write!(f, "Domain must have a positive duration"),
            NonPositiveMeanActive => write!(f, "mean_active must be positive"),
            NegativeLeadIn => write!(f, "lead_in must not be negative"),
            OpenEndedProbabilityOutOfRange => {
                write!(f, "open_ended_probability must lie in [0, 1]")
            }
            NonFiniteExtent => write!(f, "extent must have finite corners"),
        }
    }
}

impl std::error::Error for RecordGenConfigBuildError {}
