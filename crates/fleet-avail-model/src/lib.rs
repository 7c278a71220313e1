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

//! # Fleet Availability Model (`fleet-avail-model`)
//!
//! Data model for availability measurements, built on the time primitives of
//! `fleet-avail-core`.
//!
//! ## Key Data Structures
//!
//! - **`Record<T, L>`**: one entity's active window `[start, end)` together with
//!   a location of type `L`. A missing `end` means the entity is still active.
//! - **`Point`**, **`Polygon`**, **`BoundingBox`**: planar geometry used to decide
//!   which records are admitted into a measurement. `Polygon` and `BoundingBox`
//!   implement the [`geo::Region`] containment test; both parse from WKT.
//! - **`Dataset`**: a JSON document bundling the analysis window, the region and
//!   the raw records. Records with unusable fields are surfaced one by one as
//!   errors so a measurement can skip them instead of aborting.
//! - **`RecordGenerator`**: seeded synthetic records for benchmarks and tests.

pub mod dataset;
pub mod err;
pub mod generator;
pub mod geo;
pub mod id;
pub mod record;

pub mod prelude {
    pub use crate::dataset::Dataset;
    pub use crate::err::{DatasetError, ParseGeometryError, PolygonError, RecordParseError};
    pub use crate::generator::{
        RecordGenConfig, RecordGenConfigBuildError, RecordGenConfigBuilder, RecordGenerator,
    };
    pub use crate::geo::{BoundingBox, Point, Polygon, Region};
    pub use crate::id::RecordId;
    pub use crate::record::Record;
}
