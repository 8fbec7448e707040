//! Conversion of [`geo_types`](::geo_types) points, as produced by GPX readers.

use ::geo_types::Point;

use crate::latlng::LatLng;

impl From<Point<f64>> for LatLng {
    fn from(value: Point<f64>) -> Self {
        LatLng::from_lng_lat(value.x(), value.y())
    }
}

#[cfg(test)]
mod tests {
    use ::geo_types::point;

    use super::*;
    use crate::latlng;

    #[test]
    fn point_axis_order() {
        assert_eq!(LatLng::from(point!(x: 53.0, y: 32.0)), latlng!(32.0, 53.0));
    }
}
