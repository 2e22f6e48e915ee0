//! Polygonal shapes carried by zones.

use geo::BoundingRect;
use geo_types::{MultiPolygon, Point, Polygon, Rect};

/// A zone outline as imported: either a single polygon or a multi-polygon.
///
/// Keeping the original variant lets export reproduce the GeoJSON geometry
/// type the shape arrived with.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A single polygon, optionally with holes.
    Polygon(Polygon<f64>),
    /// Several disjoint polygons.
    MultiPolygon(MultiPolygon<f64>),
}

impl Shape {
    /// Iterate over the member polygons.
    pub fn polygons(&self) -> Box<dyn Iterator<Item = &Polygon<f64>> + '_> {
        match self {
            Shape::Polygon(polygon) => Box::new(std::iter::once(polygon)),
            Shape::MultiPolygon(multi) => Box::new(multi.0.iter()),
        }
    }

    /// Copy the shape into a multi-polygon.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon(self.polygons().cloned().collect())
    }

    /// Strict interior containment.
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        self.polygons()
            .any(|polygon| super::point_in_polygon(point, polygon))
    }

    /// Geodesic area in square meters.
    pub fn area(&self) -> f64 {
        super::area(&self.to_multi_polygon())
    }

    /// Axis-aligned bounds, `None` for an empty shape.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Shape::Polygon(polygon) => polygon.bounding_rect(),
            Shape::MultiPolygon(multi) => multi.bounding_rect(),
        }
    }
}

impl From<Polygon<f64>> for Shape {
    fn from(polygon: Polygon<f64>) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for Shape {
    fn from(multi: MultiPolygon<f64>) -> Self {
        Shape::MultiPolygon(multi)
    }
}

/// A shape with its bounding rectangle cached.
///
/// Points outside the rectangle are rejected before the polygon test.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    shape: Shape,
    bounds: Option<Rect<f64>>,
}

impl Footprint {
    /// Wrap a shape, computing its bounds.
    pub fn new(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let bounds = shape.bounding_rect();
        Self { shape, bounds }
    }

    /// The wrapped shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Cached bounds.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    /// Containment test with a bounding-rectangle prefilter.
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        let (min, max) = (bounds.min(), bounds.max());
        if point.x() < min.x || point.x() > max.x || point.y() < min.y || point.y() > max.y {
            return false;
        }
        self.shape.contains_point(point)
    }
}
