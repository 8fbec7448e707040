//! Viewer configuration.

use geoview_types::{latlng, LatLng, Size};
use serde::{Deserialize, Serialize};

use crate::error::{Capability, GeoViewError};
use crate::messages::Locale;

/// Centre of Iran, the default view before any data is shown.
pub const DEFAULT_CENTER: LatLng = latlng!(32.4279, 53.6880);
/// Zoom level of the default view.
pub const DEFAULT_ZOOM: f64 = 6.0;
/// Zoom level used when only a single focus point of the data is known.
pub const FOCUS_ZOOM: f64 = 15.0;
/// Padding (in pixels, on every side) applied when fitting the view to data bounds.
pub const FIT_PADDING: f64 = 50.0;
/// Maximum zoom level the view is fitted to. Prevents over-zooming on point datasets.
pub const MAX_FIT_ZOOM: f64 = 18.0;

/// Set of decoding capabilities available to the viewer.
///
/// The default value contains everything that was compiled in. A host can switch capabilities
/// off, but switching on a capability whose cargo feature is disabled has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// KML/GPX converter (`kml` and `gpx` features).
    pub markup: bool,
    /// KMZ archive reader (`kmz` feature).
    pub archive: bool,
    /// Shapefile converter (`shapefile` feature).
    pub shapefile: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::compiled()
    }
}

impl Capabilities {
    /// Capabilities provided by the enabled cargo features.
    pub fn compiled() -> Self {
        Self {
            markup: cfg!(any(feature = "kml", feature = "gpx")),
            archive: cfg!(feature = "kmz"),
            shapefile: cfg!(feature = "shapefile"),
        }
    }

    /// No capabilities at all. Only GeoJSON files can be loaded.
    pub fn none() -> Self {
        Self {
            markup: false,
            archive: false,
            shapefile: false,
        }
    }

    /// Returns an error if the capability is not available.
    pub fn require(&self, capability: Capability) -> Result<(), GeoViewError> {
        let available = match capability {
            Capability::Markup => self.markup,
            Capability::Archive => self.archive,
            Capability::Shapefile => self.shapefile,
        };

        if available {
            Ok(())
        } else {
            Err(GeoViewError::CapabilityMissing(capability))
        }
    }
}

/// Configuration of a [`Viewer`](crate::Viewer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Center of the view shown before the data is loaded and when the data has no location.
    pub default_center: LatLng,
    /// Zoom of the default view.
    pub default_zoom: f64,
    /// Zoom used to center on a single focus point.
    pub focus_zoom: f64,
    /// Padding in pixels on every side of the fitted data bounds.
    pub fit_padding: f64,
    /// Maximum zoom the view is fitted to.
    pub max_zoom: f64,
    /// Size of the map viewport in pixels.
    pub viewport_size: Size,
    /// Language of the status messages.
    pub locale: Locale,
    /// User agent of the HTTP loader.
    pub user_agent: String,
    /// Decoding capabilities.
    pub capabilities: Capabilities,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            focus_zoom: FOCUS_ZOOM,
            fit_padding: FIT_PADDING,
            max_zoom: MAX_FIT_ZOOM,
            viewport_size: Size::new(1024.0, 768.0),
            locale: Locale::default(),
            user_agent: format!("geoview/{}", env!("CARGO_PKG_VERSION")),
            capabilities: Capabilities::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses the configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, GeoViewError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.capabilities = config.capabilities.restrict_to_compiled();
        Ok(config)
    }
}

impl Capabilities {
    fn restrict_to_compiled(self) -> Self {
        let compiled = Self::compiled();
        Self {
            markup: self.markup && compiled.markup,
            archive: self.archive && compiled.archive,
            shapefile: self.shapefile && compiled.shapefile,
        }
    }
}
