//! Feature layers produced by the [decoders](crate::decoder).
//!
//! The viewer works with layers through the [`DataLayer`] trait. Every operation of the trait is
//! optional: a layer may be unable to report its aggregate bounds or to enumerate its features,
//! and the [bounds aggregator](crate::bounds) degrades accordingly. [`FeatureLayer`] is the layer
//! all built-in decoders produce and it implements the whole trait.

use std::any::Any;

use geoview_types::{Geom, LatLng, LatLngBounds};
use maybe_sync::{MaybeSend, MaybeSync};
use serde_json::Value;

/// Key/value properties of a feature, in source order.
pub type Properties = serde_json::Map<String, Value>;

/// A single renderable entity of a layer.
pub trait LayerFeature {
    /// Bounding region of the feature. Point features usually do not expose one.
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Position of a point feature.
    fn position(&self) -> Option<LatLng> {
        None
    }

    /// First vertex of a line or polygon feature.
    fn first_coordinate(&self) -> Option<LatLng> {
        None
    }

    /// Content of the popup shown when the feature is clicked.
    fn popup(&self) -> Option<&str> {
        None
    }
}

/// Decoded set of geographic features held by the viewer.
pub trait DataLayer: MaybeSend + MaybeSync {
    /// Aggregate bounds of all features, if the layer can compute them.
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Iterates over the features of the layer, if the layer supports enumeration.
    fn features(&self) -> Option<Box<dyn Iterator<Item = &dyn LayerFeature> + '_>> {
        None
    }

    /// The viewer stores layers as trait objects. This method can be used to convert the trait
    /// object into the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Geographic feature with properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: Geom,
    properties: Properties,
    popup: Option<String>,
}

impl Feature {
    /// Creates a feature without properties.
    pub fn new(geometry: Geom) -> Self {
        Self {
            geometry,
            properties: Properties::new(),
            popup: None,
        }
    }

    /// Sets the properties of the feature.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Generates the popup content from the current properties.
    pub fn with_property_popup(mut self) -> Self {
        self.popup = popup_content(&self.properties);
        self
    }

    /// Geometry of the feature.
    pub fn geometry(&self) -> &Geom {
        &self.geometry
    }

    /// Properties of the feature.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl LayerFeature for Feature {
    fn bounds(&self) -> Option<LatLngBounds> {
        if self.geometry.is_point() {
            None
        } else {
            self.geometry.bounds()
        }
    }

    fn position(&self) -> Option<LatLng> {
        match self.geometry {
            Geom::Point(p) => Some(p),
            _ => None,
        }
    }

    fn first_coordinate(&self) -> Option<LatLng> {
        self.geometry.first_coordinate()
    }

    fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }
}

/// Builds popup markup listing every property as a labeled line, in source key order.
///
/// Returns `None` if there are no properties.
pub fn popup_content(properties: &Properties) -> Option<String> {
    if properties.is_empty() {
        return None;
    }

    let lines: Vec<String> = properties
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("<strong>{key}:</strong> {value}")
        })
        .collect();

    Some(lines.join("<br>"))
}

/// Layer of decoded features. Produced by all built-in decoders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureLayer {
    features: Vec<Feature>,
}

impl FeatureLayer {
    /// Creates a new layer.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Features of the layer.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the layer has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl From<Vec<Feature>> for FeatureLayer {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}

impl DataLayer for FeatureLayer {
    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::union_all(self.features.iter().filter_map(|f| f.geometry.bounds()))
    }

    fn features(&self) -> Option<Box<dyn Iterator<Item = &dyn LayerFeature> + '_>> {
        Some(Box::new(
            self.features.iter().map(|f| f as &dyn LayerFeature),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
