//! Conversion of GeoJSON geometries into [`Geom`].

use geojson::{LineStringType, PolygonType, Position, Value};

use crate::error::GeoViewTypesError;
use crate::geometry::Geom;
use crate::latlng::LatLng;

impl TryFrom<&geojson::Geometry> for Geom {
    type Error = GeoViewTypesError;

    fn try_from(geometry: &geojson::Geometry) -> Result<Self, Self::Error> {
        Geom::try_from(&geometry.value)
    }
}

impl TryFrom<&Value> for Geom {
    type Error = GeoViewTypesError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Point(p) => Geom::Point(convert_position(p)?),
            Value::MultiPoint(points) => Geom::MultiPoint(convert_line(points)?),
            Value::LineString(line) => Geom::LineString(convert_line(line)?),
            Value::MultiLineString(lines) => Geom::MultiLineString(convert_lines(lines)?),
            Value::Polygon(polygon) => Geom::Polygon(convert_lines(polygon)?),
            Value::MultiPolygon(polygons) => Geom::MultiPolygon(
                polygons
                    .iter()
                    .map(|p| convert_lines(p))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::GeometryCollection(geometries) => Geom::Collection(
                geometries
                    .iter()
                    .map(Geom::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }
}

fn convert_position(position: &Position) -> Result<LatLng, GeoViewTypesError> {
    match position.as_slice() {
        [lng, lat, ..] => Ok(LatLng::from_lng_lat(*lng, *lat)),
        _ => Err(GeoViewTypesError::Conversion(
            "point must contain at least 2 dimensions".to_string(),
        )),
    }
}

fn convert_line(line: &LineStringType) -> Result<Vec<LatLng>, GeoViewTypesError> {
    line.iter().map(convert_position).collect()
}

fn convert_lines(lines: &PolygonType) -> Result<Vec<Vec<LatLng>>, GeoViewTypesError> {
    lines.iter().map(convert_line).collect()
}
