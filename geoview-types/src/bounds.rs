//! Geographic bounding box.

use serde::{Deserialize, Serialize};

use crate::latlng::{GeoPoint, LatLng};

/// The smallest latitude/longitude rectangle covering a set of geometries.
///
/// A box built from a single point is degenerate (zero area) but still valid. Validity is checked
/// with [`LatLngBounds::is_valid`], since boxes can also come from external sources that may put
/// NaNs or swapped corners into them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    south_west: LatLng,
    north_east: LatLng,
}

impl LatLngBounds {
    /// Creates a box from its corners. No normalization is performed.
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// South-west (minimum) corner.
    pub fn south_west(&self) -> LatLng {
        self.south_west
    }

    /// North-east (maximum) corner.
    pub fn north_east(&self) -> LatLng {
        self.north_east
    }

    /// Degenerate box with both corners at the given point.
    pub fn from_point(p: &impl GeoPoint) -> Self {
        let point = LatLng::from_geo(p);
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Returns a box that also covers the given point.
    pub fn extend(&self, p: &impl GeoPoint) -> Self {
        self.merge(Self::from_point(p))
    }

    /// Union of two boxes. The operation is commutative and associative, so the result of
    /// merging a set of boxes does not depend on the order they come in.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            south_west: LatLng::new(
                self.south_west.lat().min(other.south_west.lat()),
                self.south_west.lng().min(other.south_west.lng()),
            ),
            north_east: LatLng::new(
                self.north_east.lat().max(other.north_east.lat()),
                self.north_east.lng().max(other.north_east.lng()),
            ),
        }
    }

    /// Union of all boxes of the iterator, or `None` if it is empty.
    pub fn union_all(boxes: impl IntoIterator<Item = LatLngBounds>) -> Option<Self> {
        boxes.into_iter().reduce(|acc, b| acc.merge(b))
    }

    /// A box is valid if all its coordinates are finite and the south-west corner is not
    /// north or east of the north-east one.
    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south_west.lat() <= self.north_east.lat()
            && self.south_west.lng() <= self.north_east.lng()
    }

    /// Checks if the point is inside the box (borders included).
    pub fn contains(&self, point: &impl GeoPoint) -> bool {
        self.south_west.lat() <= point.lat()
            && self.north_east.lat() >= point.lat()
            && self.south_west.lng() <= point.lng()
            && self.north_east.lng() >= point.lng()
    }

    /// Arithmetic center of the box.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat() + self.north_east.lat()) / 2.0,
            (self.south_west.lng() + self.north_east.lng()) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlng;

    #[test]
    fn single_point_box_is_valid() {
        let point = latlng!(35.7, 51.4);
        let bounds = LatLngBounds::from_point(&point);
        assert_eq!(bounds.south_west(), point);
        assert_eq!(bounds.north_east(), point);
        assert!(bounds.is_valid());
    }

    #[test]
    fn merge_is_order_independent() {
        let boxes = [
            LatLngBounds::from_point(&latlng!(10.0, 20.0)),
            LatLngBounds::new(latlng!(-5.0, 0.0), latlng!(1.0, 3.0)),
            LatLngBounds::from_point(&latlng!(40.0, -70.0)),
        ];

        let forward = LatLngBounds::union_all(boxes).unwrap();
        let mut reversed = boxes;
        reversed.reverse();
        let backward = LatLngBounds::union_all(reversed).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward.south_west(), latlng!(-5.0, -70.0));
        assert_eq!(forward.north_east(), latlng!(40.0, 20.0));
    }

    #[test]
    fn union_of_nothing_is_none() {
        assert!(LatLngBounds::union_all(Vec::new()).is_none());
    }

    #[test]
    fn invalid_boxes() {
        assert!(!LatLngBounds::new(latlng!(f64::NAN, 0.0), latlng!(1.0, 1.0)).is_valid());
        assert!(!LatLngBounds::new(latlng!(2.0, 0.0), latlng!(1.0, 1.0)).is_valid());
        assert!(!LatLngBounds::new(latlng!(0.0, 0.0), latlng!(1.0, f64::INFINITY)).is_valid());
    }

    #[test]
    fn contains_and_center() {
        let bounds = LatLngBounds::new(latlng!(0.0, 0.0), latlng!(10.0, 20.0));
        assert!(bounds.contains(&latlng!(5.0, 5.0)));
        assert!(bounds.contains(&latlng!(10.0, 20.0)));
        assert!(!bounds.contains(&latlng!(11.0, 5.0)));
        assert_eq!(bounds.center(), latlng!(5.0, 10.0));
    }
}
