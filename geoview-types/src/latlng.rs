//! Geographic point type.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// Anything that has a position on the globe, expressed in degrees.
pub trait GeoPoint {
    /// Latitude in degrees.
    fn lat(&self) -> f64;
    /// Longitude in degrees.
    fn lng(&self) -> f64;

    /// Returns true if both coordinates are finite numbers.
    fn is_finite(&self) -> bool {
        self.lat().is_finite() && self.lng().is_finite()
    }
}

/// 2d point on the surface of the Earth.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Creates a new point from latitude and longitude in degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a new point from longitude and latitude in degrees. This is the axis order used by
    /// GeoJSON, KML and most other exchange formats.
    pub const fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    /// Copies the position of any other geographic point.
    pub fn from_geo(other: &impl GeoPoint) -> Self {
        Self {
            lat: other.lat(),
            lng: other.lng(),
        }
    }
}

impl GeoPoint for LatLng {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lng(&self) -> f64 {
        self.lng
    }
}

impl AbsDiffEq for LatLng {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lng.abs_diff_eq(&other.lng, epsilon)
    }
}

impl RelativeEq for LatLng {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lng.relative_eq(&other.lng, epsilon, max_relative)
    }
}

/// Creates a new [`LatLng`] from latitude and longitude values (in degrees).
///
/// ```
/// use geoview_types::{latlng, GeoPoint};
///
/// let point = latlng!(32.4279, 53.688);
/// assert_eq!(point.lat(), 32.4279);
/// ```
#[macro_export]
macro_rules! latlng {
    ($lat:expr, $lng:expr) => {
        $crate::latlng::LatLng::new($lat, $lng)
    };
}
