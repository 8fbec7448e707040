//! Map viewport and the controller that fits it to the loaded data.

use std::f64::consts::PI;

use geoview_types::{GeoPoint, LatLng, LatLngBounds, Size};
use log::{debug, info};
use nalgebra::Point2;

use crate::bounds::{compute_bounds, BoundsOutcome};
use crate::config::ViewerConfig;
use crate::layer::DataLayer;

/// Size of the whole world in pixels at zoom level 0.
const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the Web Mercator projection.
const MAX_LATITUDE: f64 = 85.0511287798;
/// Lowest zoom level of the map.
const MIN_ZOOM: f64 = 0.0;

/// Position, zoom level and pixel size of the map viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    center: LatLng,
    zoom: f64,
    size: Size,
}

impl MapView {
    /// Creates a view with zero size.
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            size: Size::default(),
        }
    }

    /// Center of the view.
    pub fn center(&self) -> LatLng {
        self.center
    }

    /// Zoom level. At zoom `z` the whole world is `256 * 2^z` pixels wide.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Size of the viewport in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns a copy of the view with the given size.
    pub fn with_size(&self, size: Size) -> Self {
        Self { size, ..*self }
    }

    /// Returns a copy of the view with the given center and zoom.
    pub fn with_center(&self, center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..*self
        }
    }

    /// Area of the globe visible in the viewport.
    pub fn visible_bounds(&self) -> LatLngBounds {
        let center = project(&self.center);
        let scale = 2f64.powf(self.zoom);
        let half_width = self.size.half_width() / scale;
        let half_height = self.size.half_height() / scale;

        LatLngBounds::new(
            unproject(Point2::new(center.x - half_width, center.y + half_height)),
            unproject(Point2::new(center.x + half_width, center.y - half_height)),
        )
    }
}

/// Projects a point to Web Mercator pixel coordinates at zoom level 0. The y axis points south.
fn project(point: &impl GeoPoint) -> Point2<f64> {
    let lat = point.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let sin = lat.sin();

    Point2::new(
        TILE_SIZE * (point.lng() + 180.0) / 360.0,
        TILE_SIZE * (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)),
    )
}

fn unproject(point: Point2<f64>) -> LatLng {
    let n = PI * (1.0 - 2.0 * point.y / TILE_SIZE);
    LatLng::new(
        n.sinh().atan().to_degrees(),
        point.x / TILE_SIZE * 360.0 - 180.0,
    )
}

/// Owns the map view and moves it to show the data.
#[derive(Debug, Clone)]
pub struct ViewController {
    view: MapView,
    default_center: LatLng,
    default_zoom: f64,
    focus_zoom: f64,
    fit_padding: f64,
    max_zoom: f64,
}

impl ViewController {
    /// Creates a controller showing the default view of the configuration.
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            view: MapView::new(config.default_center, config.default_zoom)
                .with_size(config.viewport_size),
            default_center: config.default_center,
            default_zoom: config.default_zoom,
            focus_zoom: config.focus_zoom,
            fit_padding: config.fit_padding,
            max_zoom: config.max_zoom,
        }
    }

    /// Current view.
    pub fn view(&self) -> MapView {
        self.view
    }

    /// Changes the viewport size, keeping the center and zoom.
    pub fn set_size(&mut self, size: Size) {
        self.view = self.view.with_size(size);
    }

    /// Shows the bounds with the configured padding on every side, at the highest zoom level
    /// (up to the configured maximum) at which they fit into the viewport.
    ///
    /// A box that is flat along one axis (a parallel or a meridian, or data beyond the latitude
    /// limit of the projection) is fitted along the other axis only. A single point is shown at
    /// the maximum zoom.
    pub fn fit_to_bounds(&mut self, bounds: &LatLngBounds) {
        let south_west = project(&bounds.south_west());
        let north_east = project(&bounds.north_east());
        let extent = north_east - south_west;
        let available = self.view.size.shrink(self.fit_padding);

        let scale = [
            (available.width(), extent.x.abs()),
            (available.height(), extent.y.abs()),
        ]
        .into_iter()
        .filter(|&(_, projected)| projected > 0.0)
        .map(|(pixels, projected)| pixels / projected)
        .reduce(f64::min);

        let zoom = match scale {
            Some(scale) => scale.log2().floor().clamp(MIN_ZOOM, self.max_zoom),
            None => self.max_zoom,
        };

        let center = unproject(nalgebra::center(&south_west, &north_east));
        debug!("Fitting view to {bounds:?}: center {center:?}, zoom {zoom}");
        self.view = self.view.with_center(center, zoom);
    }

    /// Centers the view on the point.
    pub fn center_on(&mut self, point: LatLng, zoom: f64) {
        self.view = self.view.with_center(point, zoom.clamp(MIN_ZOOM, self.max_zoom));
    }

    /// Returns to the configured default view.
    pub fn set_default_view(&mut self) {
        self.view = self.view.with_center(self.default_center, self.default_zoom);
    }

    /// Moves the view to the result of the bounds computation: fits to bounds, centers on a focus
    /// point at the focus zoom. Returns false and keeps the view if nothing is known, the caller
    /// decides what to show then.
    pub fn show(&mut self, outcome: &BoundsOutcome) -> bool {
        match outcome {
            BoundsOutcome::Bounds(bounds) => self.fit_to_bounds(bounds),
            BoundsOutcome::FocusPoint(point) => self.center_on(*point, self.focus_zoom),
            BoundsOutcome::Unavailable => return false,
        }

        true
    }

    /// Shows all the data again.
    ///
    /// Uses the cached bounds if they are valid, otherwise recomputes them from the layer. Falls
    /// back to the default view if neither gives a location.
    pub fn reset_view(&mut self, cached: Option<LatLngBounds>, layer: Option<&dyn DataLayer>) {
        if let Some(bounds) = cached.filter(LatLngBounds::is_valid) {
            info!("Resetting view to data bounds");
            self.fit_to_bounds(&bounds);
            return;
        }

        if let Some(layer) = layer {
            info!("Recalculating bounds");
            if self.show(&compute_bounds(layer)) {
                return;
            }
        }

        info!("No data location known, showing the default view");
        self.set_default_view();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geoview_types::{latlng, Geom};

    use super::*;
    use crate::config::{DEFAULT_CENTER, DEFAULT_ZOOM, MAX_FIT_ZOOM};
    use crate::layer::{Feature, FeatureLayer};

    fn controller() -> ViewController {
        ViewController::new(&ViewerConfig::default())
    }

    #[test]
    fn projection_round_trip() {
        let point = latlng!(35.6892, 51.389);
        assert_relative_eq!(unproject(project(&point)), point, epsilon = 1e-9);
        assert_relative_eq!(project(&latlng!(0.0, 0.0)), Point2::new(128.0, 128.0));
    }

    #[test]
    fn fitted_view_contains_bounds_with_padding() {
        let mut controller = controller();
        let bounds = LatLngBounds::new(latlng!(25.0, 44.0), latlng!(40.0, 63.0));
        controller.fit_to_bounds(&bounds);

        let view = controller.view();
        assert!(view.zoom() <= MAX_FIT_ZOOM);
        assert_eq!(view.zoom(), view.zoom().floor());

        let visible = view.visible_bounds();
        assert!(visible.contains(&bounds.south_west()));
        assert!(visible.contains(&bounds.north_east()));
        assert_relative_eq!(view.center().lng(), 53.5, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_bounds_use_max_zoom() {
        let mut controller = controller();
        let point = latlng!(35.7, 51.4);
        controller.fit_to_bounds(&LatLngBounds::from_point(&point));

        assert_relative_eq!(controller.view().zoom(), MAX_FIT_ZOOM);
        assert_relative_eq!(controller.view().center(), point, epsilon = 1e-9);
    }

    #[test]
    fn flat_bounds_fit_along_their_length() {
        let parallel = LatLngBounds::new(latlng!(35.0, 44.0), latlng!(35.0, 63.0));
        let meridian = LatLngBounds::new(latlng!(25.0, 53.0), latlng!(40.0, 53.0));

        for bounds in [parallel, meridian] {
            let mut controller = controller();
            controller.fit_to_bounds(&bounds);

            let view = controller.view();
            assert!(view.zoom() < MAX_FIT_ZOOM, "{bounds:?} at zoom {}", view.zoom());
            let visible = view.visible_bounds();
            assert!(visible.contains(&bounds.south_west()));
            assert!(visible.contains(&bounds.north_east()));
        }
    }

    #[test]
    fn bounds_beyond_projection_limit_fit_by_width() {
        let mut controller = controller();
        controller.fit_to_bounds(&LatLngBounds::new(
            latlng!(86.0, 10.0),
            latlng!(88.0, 30.0),
        ));

        assert!(controller.view().zoom() < MAX_FIT_ZOOM);
        assert_relative_eq!(controller.view().center().lng(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn small_bounds_are_capped() {
        let mut controller = controller();
        controller.fit_to_bounds(&LatLngBounds::new(
            latlng!(35.70000, 51.40000),
            latlng!(35.70001, 51.40001),
        ));
        assert_relative_eq!(controller.view().zoom(), MAX_FIT_ZOOM);
    }

    #[test]
    fn reset_without_data_shows_default_view() {
        let mut controller = controller();
        controller.fit_to_bounds(&LatLngBounds::from_point(&latlng!(1.0, 1.0)));
        controller.reset_view(None, None);

        assert_eq!(controller.view().center(), DEFAULT_CENTER);
        assert_relative_eq!(controller.view().zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn reset_prefers_cached_bounds() {
        let mut controller = controller();
        let cached = LatLngBounds::from_point(&latlng!(10.0, 10.0));
        let layer = FeatureLayer::new(vec![Feature::new(Geom::Point(latlng!(20.0, 20.0)))]);

        controller.reset_view(Some(cached), Some(&layer));
        assert_relative_eq!(controller.view().center(), latlng!(10.0, 10.0), epsilon = 1e-9);
    }

    #[test]
    fn reset_recomputes_from_layer() {
        let mut controller = controller();
        let invalid = LatLngBounds::new(latlng!(f64::NAN, 0.0), latlng!(1.0, 1.0));
        let layer = FeatureLayer::new(vec![Feature::new(Geom::Point(latlng!(20.0, 20.0)))]);

        controller.reset_view(Some(invalid), Some(&layer));
        assert_relative_eq!(controller.view().center(), latlng!(20.0, 20.0), epsilon = 1e-9);

        controller.reset_view(None, Some(&FeatureLayer::default()));
        assert_eq!(controller.view().center(), DEFAULT_CENTER);
    }

    #[test]
    fn focus_point_is_centered_at_focus_zoom() {
        let mut controller = controller();
        assert!(controller.show(&BoundsOutcome::FocusPoint(latlng!(29.6, 52.5))));
        assert_relative_eq!(controller.view().zoom(), crate::config::FOCUS_ZOOM);

        let before = controller.view();
        assert!(!controller.show(&BoundsOutcome::Unavailable));
        assert_eq!(controller.view(), before);
    }
}
