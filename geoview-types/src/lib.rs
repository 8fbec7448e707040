//! Geographic primitives used by the GeoView viewer.
//!
//! The crate is intentionally small: a [`LatLng`] point, the [`LatLngBounds`] bounding box with
//! its validity and union rules, a screen [`Size`], and the [`Geom`] enum every decoded feature is
//! normalized into. Conversions from [`geojson`](::geojson) geometries and
//! [`geo_types`](::geo_types) points are available behind the features of the same names.
//!
//! ```
//! use geoview_types::{latlng, LatLngBounds};
//!
//! let bounds = LatLngBounds::from_point(&latlng!(35.7, 51.4)).extend(&latlng!(29.6, 52.5));
//! assert_eq!(bounds.south_west(), latlng!(29.6, 51.4));
//! assert!(bounds.is_valid());
//! ```

pub mod bounds;
pub mod error;
pub mod geometry;
pub mod latlng;
pub mod size;

#[cfg(feature = "geo-types")]
mod geo_types;
#[cfg(feature = "geojson")]
mod geojson;

pub use bounds::LatLngBounds;
pub use geometry::Geom;
pub use latlng::{GeoPoint, LatLng};
pub use size::Size;
