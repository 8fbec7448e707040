//! Normalized geometry representation.

use serde::{Deserialize, Serialize};

use crate::bounds::LatLngBounds;
use crate::latlng::LatLng;

/// Geometry of a single feature, independent of the format it was decoded from.
///
/// Polygons are stored as a list of rings, outer ring first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geom {
    /// Single point.
    Point(LatLng),
    /// Set of points.
    MultiPoint(Vec<LatLng>),
    /// Open or closed polyline.
    LineString(Vec<LatLng>),
    /// Set of polylines.
    MultiLineString(Vec<Vec<LatLng>>),
    /// Polygon with optional holes.
    Polygon(Vec<Vec<LatLng>>),
    /// Set of polygons.
    MultiPolygon(Vec<Vec<Vec<LatLng>>>),
    /// Heterogeneous collection of geometries.
    Collection(Vec<Geom>),
}

impl Geom {
    /// Returns true for the [`Geom::Point`] variant.
    pub fn is_point(&self) -> bool {
        matches!(self, Geom::Point(_))
    }

    /// Calls `f` for every vertex of the geometry in storage order.
    pub fn for_each_coordinate(&self, f: &mut impl FnMut(&LatLng)) {
        match self {
            Geom::Point(p) => f(p),
            Geom::MultiPoint(points) | Geom::LineString(points) => points.iter().for_each(f),
            Geom::MultiLineString(lines) | Geom::Polygon(lines) => {
                lines.iter().flatten().for_each(f)
            }
            Geom::MultiPolygon(polygons) => polygons.iter().flatten().flatten().for_each(f),
            Geom::Collection(geometries) => {
                for geometry in geometries {
                    geometry.for_each_coordinate(f);
                }
            }
        }
    }

    /// Bounding box of all vertices, or `None` if the geometry has no vertices.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let mut bounds: Option<LatLngBounds> = None;
        self.for_each_coordinate(&mut |p: &LatLng| {
            bounds = Some(match bounds {
                Some(b) => b.extend(p),
                None => LatLngBounds::from_point(p),
            });
        });

        bounds
    }

    /// The first vertex of the geometry: the point itself, or the first vertex of the first
    /// line or ring.
    pub fn first_coordinate(&self) -> Option<LatLng> {
        match self {
            Geom::Point(p) => Some(*p),
            Geom::MultiPoint(points) | Geom::LineString(points) => points.first().copied(),
            Geom::MultiLineString(lines) | Geom::Polygon(lines) => {
                lines.iter().find_map(|l| l.first().copied())
            }
            Geom::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .find_map(|ring| ring.first().copied()),
            Geom::Collection(geometries) => geometries.iter().find_map(Geom::first_coordinate),
        }
    }
}
