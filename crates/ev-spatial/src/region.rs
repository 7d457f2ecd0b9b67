//! Polygonal regions used to locate the nodes a population record covers.

use std::str::FromStr;

use ev_core::Point;

use crate::SpatialError;

/// A simple polygon given by its outer ring.  The ring is implicitly closed;
/// repeating the first vertex at the end is allowed but not required.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub ring: Vec<Point>,
}

impl Polygon {
    pub fn new(ring: Vec<Point>) -> Self {
        Self { ring }
    }

    /// Axis-aligned rectangle from two opposite corners.
    pub fn rect(min: Point, max: Point) -> Self {
        Self::new(vec![
            Point::new(min.x, min.y),
            Point::new(max.x, min.y),
            Point::new(max.x, max.y),
            Point::new(min.x, max.y),
        ])
    }

    /// Bounding box as `(min, max)`, or `None` for an empty ring.
    pub fn bbox(&self) -> Option<(Point, Point)> {
        let first = *self.ring.first()?;
        Some(self.ring.iter().fold((first, first), |(lo, hi), p| {
            (Point::new(lo.x.min(p.x), lo.y.min(p.y)), Point::new(hi.x.max(p.x), hi.y.max(p.y)))
        }))
    }

    /// Even-odd ray casting.  Points on an edge or vertex count as inside.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.ring.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.ring[i];
            let b = self.ring[j];
            if on_segment(a, b, p) {
                return true;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross.abs() > 1e-9 * (1.0 + a.distance(b)) {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

// ── Region ────────────────────────────────────────────────────────────────────

/// One or more polygons; a point is inside the region if any polygon holds it.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub polygons: Vec<Polygon>,
}

impl Region {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.polygons.iter().any(|poly| poly.contains(p))
    }

    /// Union of the polygon bounding boxes.
    pub fn bbox(&self) -> Option<(Point, Point)> {
        self.polygons
            .iter()
            .filter_map(Polygon::bbox)
            .reduce(|(lo, hi), (l, h)| {
                (Point::new(lo.x.min(l.x), lo.y.min(l.y)), Point::new(hi.x.max(h.x), hi.y.max(h.y)))
            })
    }
}

impl From<Polygon> for Region {
    fn from(poly: Polygon) -> Self {
        Region::new(vec![poly])
    }
}

/// Parses `x y;x y;...` rings separated by `|`.
///
/// ```
/// use ev_spatial::Region;
///
/// let r: Region = "0 0;10 0;10 10;0 10".parse().unwrap();
/// assert!(r.contains(ev_core::Point::new(5.0, 5.0)));
/// ```
impl FromStr for Region {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let polygons = s
            .split('|')
            .map(parse_ring)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Region::new(polygons))
    }
}

fn parse_ring(s: &str) -> Result<Polygon, SpatialError> {
    let ring = s
        .split(';')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|vertex| {
            let mut parts = vertex.split_whitespace().map(str::parse::<f64>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(x)), Some(Ok(y)), None) => Ok(Point::new(x, y)),
                _ => Err(SpatialError::InvalidRegion(format!("bad vertex {vertex:?}"))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ring.len() < 3 {
        return Err(SpatialError::InvalidRegion(format!(
            "ring needs at least 3 vertices, got {}",
            ring.len()
        )));
    }
    Ok(Polygon::new(ring))
}
