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

//! JSON dataset files.
//!
//! ```json
//! {
//!   "domain": { "start": 1546300800, "end": 1546905600 },
//!   "region": "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))",
//!   "records": [
//!     { "id": 1, "start_time": 1546300000, "end_time": 1546310000, "location": "POINT (5 5)" },
//!     { "start_time": 1546400000, "end_time": null, "location": "(2.5, 7)" }
//!   ]
//! }
//! ```
//!
//! The domain and region must be valid for the file to load. Individual
//! records are validated lazily by [`Dataset::records`].

use crate::err::{DatasetError, RecordParseError};
use crate::geo::{Point, Polygon};
use crate::id::RecordId;
use crate::record::Record;
use fleet_avail_core::time::{TimeInterval, TimePoint};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct RawDomain {
    start: i64,
    end: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    start_time: Option<i64>,
    #[serde(default)]
    end_time: Option<i64>,
    location: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawDataset {
    domain: RawDomain,
    region: String,
    #[serde(default)]
    records: Vec<RawRecord>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    domain: TimeInterval<i64>,
    region: Polygon,
    records: Vec<RawRecord>,
}

impl Dataset {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_json_str(s: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(s)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDataset) -> Result<Self, DatasetError> {
        let RawDomain { start, end } = raw.domain;
        if start >= end {
            return Err(DatasetError::InvalidDomain { start, end });
        }
        let region: Polygon = raw.region.parse()?;
        Ok(Self {
            domain: TimeInterval::new(TimePoint::new(start), TimePoint::new(end)),
            region,
            records: raw.records,
        })
    }

    #[inline]
    pub fn domain(&self) -> TimeInterval<i64> {
        self.domain
    }

    #[inline]
    pub fn region(&self) -> &Polygon {
        &self.region
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decodes the records in file order.
    ///
    /// Each item is either a usable record or the reason it cannot be used.
    pub fn records(
        &self,
    ) -> impl ExactSizeIterator<Item = Result<Record<i64, Point>, RecordParseError>> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(index, raw)| decode(index, raw))
    }
}

fn decode(index: usize, raw: &RawRecord) -> Result<Record<i64, Point>, RecordParseError> {
    let start = raw
        .start_time
        .ok_or(RecordParseError::MissingStartTime { index })?;
    let location: Point = raw
        .location
        .parse()
        .map_err(|source| RecordParseError::Location { index, source })?;
    let record = Record::new(
        TimePoint::new(start),
        raw.end_time.map(TimePoint::new),
        location,
    );
    Ok(match raw.id {
        Some(id) => record.with_id(RecordId::new(id)),
        None => record,
    })
}
