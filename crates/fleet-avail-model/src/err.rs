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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonError {
    TooFewVertices { count: usize },
    NonFiniteCoordinate { index: usize },
}

impl Display for PolygonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolygonError::TooFewVertices { count } => write!(
                f,
                "Polygon needs at least 3 distinct vertices, got {}",
                count
            ),
            PolygonError::NonFiniteCoordinate { index } => {
                write!(f, "Polygon vertex {} has a non-finite coordinate", index)
            }
        }
    }
}

impl std::error::Error for PolygonError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryErrorKind {
    UnexpectedTag,
    UnbalancedParentheses,
    WrongCoordinateCount,
    InvalidNumber,
    Polygon(PolygonError),
}

impl Display for GeometryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryErrorKind::UnexpectedTag => write!(f, "unexpected geometry tag"),
            GeometryErrorKind::UnbalancedParentheses => write!(f, "unbalanced parentheses"),
            GeometryErrorKind::WrongCoordinateCount => {
                write!(f, "expected exactly two coordinates")
            }
            GeometryErrorKind::InvalidNumber => write!(f, "invalid number"),
            GeometryErrorKind::Polygon(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseGeometryError {
    input: String,
    kind: GeometryErrorKind,
}

impl ParseGeometryError {
    #[inline]
    pub fn new(input: impl Into<String>, kind: GeometryErrorKind) -> Self {
        Self {
            input: input.into(),
            kind,
        }
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    pub fn kind(&self) -> GeometryErrorKind {
        self.kind
    }
}

impl Display for ParseGeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot parse geometry {:?}: {}", self.input, self.kind)
    }
}

impl std::error::Error for ParseGeometryError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    MissingStartTime { index: usize },
    Location { index: usize, source: ParseGeometryError },
}

impl RecordParseError {
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            RecordParseError::MissingStartTime { index } => *index,
            RecordParseError::Location { index, .. } => *index,
        }
    }
}

impl Display for RecordParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordParseError::MissingStartTime { index } => {
                write!(f, "Record {} has no start_time", index)
            }
            RecordParseError::Location { index, source } => {
                write!(f, "Record {} has an unusable location: {}", index, source)
            }
        }
    }
}

impl std::error::Error for RecordParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordParseError::MissingStartTime { .. } => None,
            RecordParseError::Location { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Region(ParseGeometryError),
    InvalidDomain { start: i64, end: i64 },
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "Cannot read dataset: {}", e),
            DatasetError::Json(e) => write!(f, "Malformed dataset: {}", e),
            DatasetError::Region(e) => write!(f, "Malformed dataset region: {}", e),
            DatasetError::InvalidDomain { start, end } => write!(
                f,
                "Dataset domain must satisfy start < end, got [{}, {})",
                start, end
            ),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            DatasetError::Json(e) => Some(e),
            DatasetError::Region(e) => Some(e),
            DatasetError::InvalidDomain { .. } => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ParseGeometryError> for DatasetError {
    fn from(err: ParseGeometryError) -> Self {
        Self::Region(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parse_error_display_and_index() {
        let err = RecordParseError::Location {
            index: 4,
            source: ParseGeometryError::new("POINT (1)", GeometryErrorKind::WrongCoordinateCount),
        };
        assert_eq!(err.index(), 4);
        assert_eq!(
            err.to_string(),
            "Record 4 has an unusable location: Cannot parse geometry \"POINT (1)\": expected exactly two coordinates"
        );
    }

    #[test]
    fn test_dataset_error_display() {
        let err = DatasetError::InvalidDomain { start: 10, end: 5 };
        assert_eq!(
            err.to_string(),
            "Dataset domain must satisfy start < end, got [10, 5)"
        );
    }
}
