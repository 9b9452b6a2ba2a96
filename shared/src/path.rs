use std::fmt::Write as FmtWrite;

use geo::{
    BoundingRect, Contains, Coord, LineString, MultiLineString, MultiPolygon, Point, Polygon, Rect,
};

use crate::projection::Projection;

/// A feature's polygons projected into canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShape {
    polygons: MultiPolygon<f64>,
    bounds: Option<Rect<f64>>,
}

impl ProjectedShape {
    /// Project every ring. Points the projection drops are skipped, and a
    /// ring left with fewer than three points is discarded.
    pub fn project(geometry: &MultiPolygon<f64>, projection: &impl Projection) -> Self {
        let polygons: Vec<Polygon<f64>> = geometry
            .iter()
            .filter_map(|polygon| {
                let exterior = project_ring(polygon.exterior(), projection)?;
                let interiors = polygon
                    .interiors()
                    .iter()
                    .filter_map(|ring| project_ring(ring, projection))
                    .collect();
                Some(Polygon::new(exterior, interiors))
            })
            .collect();
        let polygons = MultiPolygon::new(polygons);
        let bounds = polygons.bounding_rect();
        Self { polygons, bounds }
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.0.is_empty()
    }

    /// Every ring, exteriors and holes alike, in drawing order.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        let (min, max) = (bounds.min(), bounds.max());
        if x < min.x || x > max.x || y < min.y || y > max.y {
            return false;
        }
        self.polygons.contains(&Point::new(x, y))
    }

    /// SVG path data, one closed subpath per ring.
    pub fn svg_path(&self) -> String {
        let mut d = String::new();
        for ring in self.rings() {
            write_subpath(&mut d, ring, true);
        }
        d
    }
}

/// Projected line work, such as the state-border mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedLines {
    lines: MultiLineString<f64>,
}

impl ProjectedLines {
    pub fn project(geometry: &MultiLineString<f64>, projection: &impl Projection) -> Self {
        let lines = geometry
            .iter()
            .map(|line| project_coords(line, projection))
            .filter(|coords| coords.len() >= 2)
            .map(LineString::new)
            .collect();
        Self {
            lines: MultiLineString::new(lines),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.lines.iter()
    }

    pub fn svg_path(&self) -> String {
        let mut d = String::new();
        for line in &self.lines {
            write_subpath(&mut d, line, false);
        }
        d
    }
}

fn project_coords(line: &LineString<f64>, projection: &impl Projection) -> Vec<Coord<f64>> {
    line.coords()
        .filter_map(|c| projection.project(c.x, c.y))
        .map(|(x, y)| Coord { x, y })
        .collect()
}

fn project_ring(ring: &LineString<f64>, projection: &impl Projection) -> Option<LineString<f64>> {
    let coords = project_coords(ring, projection);
    (coords.len() >= 3).then(|| LineString::new(coords))
}

fn write_subpath(d: &mut String, line: &LineString<f64>, close: bool) {
    let mut coords = line.coords();
    let Some(first) = coords.next() else {
        return;
    };
    if !d.is_empty() {
        d.push(' ');
    }
    let _ = write!(d, "M{:.3},{:.3}", first.x, first.y);
    for c in coords {
        let _ = write!(d, " L{:.3},{:.3}", c.x, c.y);
    }
    if close {
        d.push_str(" Z");
    }
}
