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

//! Planar geometry for admitting records by location.
//!
//! Containment is strict: a point lying exactly on a region's boundary is not
//! inside it. Text input follows WKT (`POINT (x y)`, `POLYGON ((x y, ...))`);
//! points additionally accept the tuple form `(x, y)`.

use crate::err::{GeometryErrorKind, ParseGeometryError, PolygonError};
use std::fmt::Display;
use std::str::FromStr;

/// A region that can decide whether a point lies strictly inside it.
pub trait Region {
    fn contains(&self, point: &Point) -> bool;
}

impl<R: Region + ?Sized> Region for &R {
    #[inline]
    fn contains(&self, point: &Point) -> bool {
        (**self).contains(point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT ({} {})", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = ParseGeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |kind| ParseGeometryError::new(s, kind);
        let trimmed = s.trim();
        let (body, separator) = match strip_tag(trimmed, "POINT") {
            Some(rest) => (rest, None),
            None if trimmed.starts_with('(') => (trimmed, Some(',')),
            None => return Err(err(GeometryErrorKind::UnexpectedTag)),
        };
        let inner = parenthesised(body).ok_or_else(|| err(GeometryErrorKind::UnbalancedParentheses))?;
        let coords: Vec<&str> = match separator {
            Some(c) => inner.split(c).map(str::trim).collect(),
            None => inner.split_whitespace().collect(),
        };
        match coords.as_slice() {
            [x, y] => Ok(Point::new(parse_f64(x).map_err(err)?, parse_f64(y).map_err(err)?)),
            _ => Err(err(GeometryErrorKind::WrongCoordinateCount)),
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Point,
    max: Point,
}

impl BoundingBox {
    /// Creates the box spanned by two opposite corners in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = *it.next()?;
        Some(it.fold(Self::new(first, first), |b, p| Self {
            min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        }))
    }

    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Containment including the edges.
    #[inline]
    pub fn covers(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Region for BoundingBox {
    #[inline]
    fn contains(&self, p: &Point) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingSide {
    Inside,
    Boundary,
    Outside,
}

/// A simple polygon with optional holes.
///
/// Rings are stored open: a closing vertex equal to the first one is dropped
/// on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<Point>,
    holes: Vec<Vec<Point>>,
    bounds: BoundingBox,
}

impl Polygon {
    pub fn new(exterior: Vec<Point>) -> Result<Self, PolygonError> {
        Self::with_holes(exterior, Vec::new())
    }

    pub fn with_holes(exterior: Vec<Point>, holes: Vec<Vec<Point>>) -> Result<Self, PolygonError> {
        let exterior = open_ring(exterior)?;
        let holes = holes
            .into_iter()
            .map(open_ring)
            .collect::<Result<Vec<_>, _>>()?;
        let bounds = BoundingBox::enclosing(&exterior)
            .ok_or(PolygonError::TooFewVertices { count: 0 })?;
        Ok(Self {
            exterior,
            holes,
            bounds,
        })
    }

    #[inline]
    pub fn exterior(&self) -> &[Point] {
        &self.exterior
    }

    #[inline]
    pub fn holes(&self) -> &[Vec<Point>] {
        &self.holes
    }

    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}

impl Region for Polygon {
    fn contains(&self, p: &Point) -> bool {
        if !p.is_finite() || !self.bounds.covers(p) {
            return false;
        }
        ring_side(&self.exterior, p) == RingSide::Inside
            && self
                .holes
                .iter()
                .all(|hole| ring_side(hole, p) == RingSide::Outside)
    }
}

impl FromStr for Polygon {
    type Err = ParseGeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |kind| ParseGeometryError::new(s, kind);
        let body = strip_tag(s.trim(), "POLYGON").ok_or_else(|| err(GeometryErrorKind::UnexpectedTag))?;
        let mut rest = parenthesised(body).ok_or_else(|| err(GeometryErrorKind::UnbalancedParentheses))?;

        let mut rings = Vec::new();
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            let open = rest
                .strip_prefix('(')
                .ok_or_else(|| err(GeometryErrorKind::UnbalancedParentheses))?;
            let close = open
                .find(')')
                .ok_or_else(|| err(GeometryErrorKind::UnbalancedParentheses))?;
            let ring = open[..close]
                .split(',')
                .map(|pair| match pair.split_whitespace().collect::<Vec<_>>().as_slice() {
                    [x, y] => Ok(Point::new(parse_f64(x).map_err(err)?, parse_f64(y).map_err(err)?)),
                    _ => Err(err(GeometryErrorKind::WrongCoordinateCount)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rings.push(ring);
            rest = open[close + 1..].trim_start();
            rest = rest.strip_prefix(',').unwrap_or(rest);
        }

        let mut rings = rings.into_iter();
        let exterior = rings
            .next()
            .ok_or_else(|| err(GeometryErrorKind::Polygon(PolygonError::TooFewVertices { count: 0 })))?;
        Polygon::with_holes(exterior, rings.collect())
            .map_err(|e| err(GeometryErrorKind::Polygon(e)))
    }
}

fn open_ring(mut ring: Vec<Point>) -> Result<Vec<Point>, PolygonError> {
    if let Some(index) = ring.iter().position(|p| !p.is_finite()) {
        return Err(PolygonError::NonFiniteCoordinate { index });
    }
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(PolygonError::TooFewVertices { count: ring.len() });
    }
    Ok(ring)
}

/// Even-odd crossing test with an explicit on-edge check.
fn ring_side(ring: &[Point], p: &Point) -> RingSide {
    let mut inside = false;
    let n = ring.len();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if on_segment(&a, &b, p) {
            return RingSide::Boundary;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    if inside {
        RingSide::Inside
    } else {
        RingSide::Outside
    }
}

fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross.abs() > 1e-12 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Strips a case-insensitive WKT tag, returning the trimmed remainder.
fn strip_tag<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    let head = s.get(..tag.len())?;
    head.eq_ignore_ascii_case(tag)
        .then(|| s[tag.len()..].trim())
}

/// Returns the text between a leading `(` and its trailing `)`.
fn parenthesised(s: &str) -> Option<&str> {
    s.trim().strip_prefix('(')?.strip_suffix(')')
}

fn parse_f64(s: &str) -> Result<f64, GeometryErrorKind> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| GeometryErrorKind::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_wkt_point() {
        assert_eq!("POINT (1.5 -2)".parse::<Point>().unwrap(), Point::new(1.5, -2.0));
        assert_eq!("point(3 4)".parse::<Point>().unwrap(), Point::new(3.0, 4.0));
        assert_eq!("  POINT  ( 3   4 ) ".parse::<Point>().unwrap(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_parse_tuple_point() {
        assert_eq!(
            "(-122.67, 45.52)".parse::<Point>().unwrap(),
            Point::new(-122.67, 45.52)
        );
    }

    #[test]
    fn test_parse_point_errors() {
        let e = "LINESTRING (1 2, 3 4)".parse::<Point>().unwrap_err();
        assert_eq!(e.kind(), GeometryErrorKind::UnexpectedTag);
        let e = "POINT (1 2".parse::<Point>().unwrap_err();
        assert_eq!(e.kind(), GeometryErrorKind::UnbalancedParentheses);
        let e = "POINT (1 2 3)".parse::<Point>().unwrap_err();
        assert_eq!(e.kind(), GeometryErrorKind::WrongCoordinateCount);
        let e = "POINT (a 2)".parse::<Point>().unwrap_err();
        assert_eq!(e.kind(), GeometryErrorKind::InvalidNumber);
        assert_eq!(e.input(), "POINT (a 2)");
    }

    #[test]
    fn test_point_display_round_trips_through_parse() {
        let p = Point::new(1.25, -7.0);
        assert_eq!(p.to_string().parse::<Point>().unwrap(), p);
    }

    #[test]
    fn test_polygon_contains_is_strict() {
        let sq = square(10.0);
        assert!(sq.contains(&Point::new(5.0, 5.0)));
        assert!(!sq.contains(&Point::new(0.0, 5.0)));
        assert!(!sq.contains(&Point::new(10.0, 10.0)));
        assert!(!sq.contains(&Point::new(11.0, 5.0)));
        assert!(!sq.contains(&Point::new(f64::NAN, 5.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening upwards.
        let u = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(2.0, 3.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
            Point::new(0.0, 3.0),
        ])
        .unwrap();
        assert!(u.contains(&Point::new(0.5, 2.0)));
        assert!(u.contains(&Point::new(2.5, 2.0)));
        assert!(!u.contains(&Point::new(1.5, 2.0)));
        assert!(u.contains(&Point::new(1.5, 0.5)));
    }

    #[test]
    fn test_polygon_from_wkt_with_hole() {
        let poly: Polygon = "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))"
            .parse()
            .unwrap();
        assert_eq!(poly.exterior().len(), 4);
        assert_eq!(poly.holes().len(), 1);
        assert!(poly.contains(&Point::new(2.0, 2.0)));
        assert!(!poly.contains(&Point::new(5.0, 5.0)));
        assert!(!poly.contains(&Point::new(4.0, 5.0)));
    }

    #[test]
    fn test_polygon_validation() {
        assert_eq!(
            Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 0.0)]),
            Err(PolygonError::TooFewVertices { count: 2 })
        );
        assert_eq!(
            Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(f64::INFINITY, 0.0),
                Point::new(0.0, 1.0)
            ]),
            Err(PolygonError::NonFiniteCoordinate { index: 1 })
        );
        let e = "POLYGON ((0 0, 1 1))".parse::<Polygon>().unwrap_err();
        assert_eq!(
            e.kind(),
            GeometryErrorKind::Polygon(PolygonError::TooFewVertices { count: 2 })
        );
    }

    #[test]
    fn test_bounding_box() {
        let b = BoundingBox::new(Point::new(4.0, 3.0), Point::new(0.0, 0.0));
        assert_eq!(b.min(), Point::new(0.0, 0.0));
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 3.0);
        assert!(b.contains(&Point::new(1.0, 1.0)));
        assert!(!b.contains(&Point::new(0.0, 1.0)));
        assert!(b.covers(&Point::new(0.0, 1.0)));
        assert!(BoundingBox::enclosing(&[]).is_none());
    }

    #[test]
    fn test_region_by_reference() {
        fn count_inside<R: Region>(r: R, pts: &[Point]) -> usize {
            pts.iter().filter(|p| r.contains(p)).count()
        }
        let sq = square(2.0);
        let pts = [Point::new(1.0, 1.0), Point::new(3.0, 1.0)];
        assert_eq!(count_inside(&sq, &pts), 1);
    }
}
