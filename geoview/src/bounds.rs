//! Computation of the area a layer covers.
//!
//! Layers differ in what they can tell about themselves, so [`compute_bounds`] tries several
//! strategies, the first that succeeds wins:
//!
//! 1. aggregate bounds of the layer, if they are valid;
//! 2. union of the bounds of every feature, where point features contribute a degenerate box
//!    at their position;
//! 3. the first coordinate found in the features, as a [`BoundsOutcome::FocusPoint`];
//! 4. [`BoundsOutcome::Unavailable`].
//!
//! None of the steps is an error: a layer without usable extent is still a loaded layer.

use geoview_types::{GeoPoint, LatLng, LatLngBounds};
use log::{debug, info};

use crate::layer::{DataLayer, LayerFeature};

/// Result of the bounds computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsOutcome {
    /// Valid bounding box of the data. Might be degenerate.
    Bounds(LatLngBounds),
    /// No bounds can be computed, but the data has at least one known coordinate.
    FocusPoint(LatLng),
    /// The data has no known location.
    Unavailable,
}

impl BoundsOutcome {
    /// Bounding box, if one was found.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        match self {
            BoundsOutcome::Bounds(bounds) => Some(*bounds),
            _ => None,
        }
    }
}

/// Computes the area covered by the layer.
pub fn compute_bounds(layer: &dyn DataLayer) -> BoundsOutcome {
    if let Some(bounds) = layer.bounds().filter(LatLngBounds::is_valid) {
        return BoundsOutcome::Bounds(bounds);
    }
    debug!("Layer has no valid aggregate bounds, trying feature bounds");

    if let Some(bounds) = feature_bounds(layer) {
        return BoundsOutcome::Bounds(bounds);
    }
    debug!("No feature bounds, looking for a focus point");

    if let Some(point) = focus_point(layer) {
        return BoundsOutcome::FocusPoint(point);
    }

    info!("Cannot determine the location of the layer data");
    BoundsOutcome::Unavailable
}

fn feature_bounds(layer: &dyn DataLayer) -> Option<LatLngBounds> {
    let features = layer.features()?;
    let bounds = LatLngBounds::union_all(features.filter_map(single_feature_bounds))?;

    bounds.is_valid().then_some(bounds)
}

fn single_feature_bounds(feature: &dyn LayerFeature) -> Option<LatLngBounds> {
    feature
        .bounds()
        .filter(LatLngBounds::is_valid)
        .or_else(|| {
            feature
                .position()
                .map(|p| LatLngBounds::from_point(&p))
                .filter(LatLngBounds::is_valid)
        })
}

fn focus_point(layer: &dyn DataLayer) -> Option<LatLng> {
    layer.features()?.find_map(|feature| {
        feature
            .position()
            .or_else(|| feature.first_coordinate())
            .filter(|p| p.is_finite())
    })
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use geoview_types::latlng;

    use super::*;

    /// Feature exposing only what it is given.
    #[derive(Default)]
    struct TestFeature {
        bounds: Option<LatLngBounds>,
        position: Option<LatLng>,
        first_coordinate: Option<LatLng>,
    }

    impl LayerFeature for TestFeature {
        fn bounds(&self) -> Option<LatLngBounds> {
            self.bounds
        }

        fn position(&self) -> Option<LatLng> {
            self.position
        }

        fn first_coordinate(&self) -> Option<LatLng> {
            self.first_coordinate
        }
    }

    /// Layer that cannot report aggregate bounds.
    struct TestLayer {
        features: Option<Vec<TestFeature>>,
    }

    impl DataLayer for TestLayer {
        fn features(&self) -> Option<Box<dyn Iterator<Item = &dyn LayerFeature> + '_>> {
            let features = self.features.as_ref()?;
            Some(Box::new(features.iter().map(|f| f as &dyn LayerFeature)))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn point(p: LatLng) -> TestFeature {
        TestFeature {
            position: Some(p),
            ..Default::default()
        }
    }

    fn boxed(sw: LatLng, ne: LatLng) -> TestFeature {
        TestFeature {
            bounds: Some(LatLngBounds::new(sw, ne)),
            first_coordinate: Some(sw),
            ..Default::default()
        }
    }

    #[test]
    fn single_point_gives_degenerate_box() {
        let p = latlng!(35.7, 51.4);
        let layer = TestLayer {
            features: Some(vec![point(p)]),
        };

        let outcome = compute_bounds(&layer);
        let bounds = outcome.bounds().unwrap();
        assert_eq!(bounds.south_west(), p);
        assert_eq!(bounds.north_east(), p);
        assert!(bounds.is_valid());
        assert_eq!(compute_bounds(&layer), outcome);
    }

    #[test]
    fn union_does_not_depend_on_feature_order() {
        let forward = TestLayer {
            features: Some(vec![
                point(latlng!(30.0, 50.0)),
                boxed(latlng!(31.0, 48.0), latlng!(33.0, 49.0)),
                point(latlng!(36.0, 59.0)),
            ]),
        };
        let backward = TestLayer {
            features: Some(vec![
                point(latlng!(36.0, 59.0)),
                boxed(latlng!(31.0, 48.0), latlng!(33.0, 49.0)),
                point(latlng!(30.0, 50.0)),
            ]),
        };

        let expected = LatLngBounds::new(latlng!(30.0, 48.0), latlng!(36.0, 59.0));
        assert_eq!(compute_bounds(&forward), BoundsOutcome::Bounds(expected));
        assert_eq!(compute_bounds(&backward), BoundsOutcome::Bounds(expected));
    }

    #[test]
    fn invalid_feature_bounds_are_ignored() {
        let layer = TestLayer {
            features: Some(vec![
                boxed(latlng!(f64::NAN, 0.0), latlng!(1.0, 1.0)),
                point(latlng!(2.0, 3.0)),
            ]),
        };

        let bounds = compute_bounds(&layer).bounds().unwrap();
        assert_eq!(bounds.south_west(), latlng!(2.0, 3.0));
    }

    #[test]
    fn line_without_bounds_gives_focus_point() {
        let layer = TestLayer {
            features: Some(vec![
                TestFeature::default(),
                TestFeature {
                    first_coordinate: Some(latlng!(29.6, 52.5)),
                    ..Default::default()
                },
            ]),
        };

        assert_eq!(
            compute_bounds(&layer),
            BoundsOutcome::FocusPoint(latlng!(29.6, 52.5))
        );
    }

    #[test]
    fn nothing_known_is_unavailable() {
        let no_features = TestLayer {
            features: Some(vec![TestFeature::default()]),
        };
        assert_eq!(compute_bounds(&no_features), BoundsOutcome::Unavailable);

        let not_enumerable = TestLayer { features: None };
        assert_eq!(compute_bounds(&not_enumerable), BoundsOutcome::Unavailable);
    }

    #[test]
    fn aggregate_bounds_are_preferred() {
        struct Aggregated;
        impl DataLayer for Aggregated {
            fn bounds(&self) -> Option<LatLngBounds> {
                Some(LatLngBounds::new(latlng!(1.0, 2.0), latlng!(3.0, 4.0)))
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let bounds = compute_bounds(&Aggregated).bounds().unwrap();
        assert!(bounds.contains(&latlng!(2.0, 3.0)));
    }
}
