//! KML decoder.

use async_trait::async_trait;

use crate::decoder::{DecodeContext, DecodeStage, FormatDecoder};
use crate::error::{Capability, GeoViewError};
use crate::layer::{DataLayer, FeatureLayer};
use crate::request::FileType;

/// Decoder of KML documents.
pub struct KmlDecoder;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FormatDecoder for KmlDecoder {
    async fn decode(
        &self,
        url: &str,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn DataLayer>, GeoViewError> {
        ctx.capabilities().require(Capability::Markup)?;

        ctx.report(FileType::Kml, DecodeStage::Download);
        let bytes = ctx.fetch(url).await?;

        ctx.report(FileType::Kml, DecodeStage::Decode);
        let layer = kml_layer(std::str::from_utf8(&bytes)?)?;

        ctx.report(FileType::Kml, DecodeStage::Render);
        Ok(Box::new(layer))
    }
}

/// Converts a KML document into a layer with one feature per placemark.
///
/// Placemarks are collected from documents and folders at any depth. Placemarks without geometry
/// are skipped. `name` and `description` become feature properties.
#[cfg(feature = "kml")]
pub fn kml_layer(text: &str) -> Result<FeatureLayer, GeoViewError> {
    let document: ::kml::Kml<f64> = text.parse()?;
    let mut features = Vec::new();
    convert::collect_placemarks(&document, &mut features);

    Ok(FeatureLayer::new(features))
}

/// Converts a KML document into a layer. The `kml` feature is disabled, so this always fails.
#[cfg(not(feature = "kml"))]
pub fn kml_layer(_text: &str) -> Result<FeatureLayer, GeoViewError> {
    Err(GeoViewError::CapabilityMissing(Capability::Markup))
}

#[cfg(feature = "kml")]
mod convert {
    use ::kml::types::{Coord, Geometry, LinearRing, Placemark};
    use ::kml::Kml;
    use geoview_types::{Geom, LatLng};
    use log::debug;
    use serde_json::Value;

    use crate::layer::{Feature, Properties};

    pub(super) fn collect_placemarks(element: &Kml<f64>, features: &mut Vec<Feature>) {
        match element {
            Kml::KmlDocument(document) => document
                .elements
                .iter()
                .for_each(|e| collect_placemarks(e, features)),
            Kml::Document { elements, .. } => elements
                .iter()
                .for_each(|e| collect_placemarks(e, features)),
            Kml::Folder { elements, .. } => elements
                .iter()
                .for_each(|e| collect_placemarks(e, features)),
            Kml::Placemark(placemark) => {
                if let Some(feature) = placemark_feature(placemark) {
                    features.push(feature);
                }
            }
            _ => {}
        }
    }

    fn placemark_feature(placemark: &Placemark<f64>) -> Option<Feature> {
        let Some(geometry) = placemark.geometry.as_ref().and_then(convert_geometry) else {
            debug!("Skipping placemark {:?} without geometry", placemark.name);
            return None;
        };

        let mut properties = Properties::new();
        if let Some(name) = &placemark.name {
            properties.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(description) = &placemark.description {
            properties.insert("description".into(), Value::String(description.clone()));
        }

        Some(Feature::new(geometry).with_properties(properties))
    }

    fn convert_geometry(geometry: &Geometry<f64>) -> Option<Geom> {
        match geometry {
            Geometry::Point(point) => Some(Geom::Point(coord(&point.coord))),
            Geometry::LineString(line) => Some(Geom::LineString(coords(&line.coords))),
            Geometry::LinearRing(ring) => Some(Geom::LineString(coords(&ring.coords))),
            Geometry::Polygon(polygon) => Some(Geom::Polygon(
                std::iter::once(&polygon.outer)
                    .chain(&polygon.inner)
                    .map(|ring: &LinearRing<f64>| coords(&ring.coords))
                    .collect(),
            )),
            Geometry::MultiGeometry(multi) => {
                let geometries: Vec<Geom> =
                    multi.geometries.iter().filter_map(convert_geometry).collect();
                if geometries.is_empty() {
                    None
                } else {
                    Some(Geom::Collection(geometries))
                }
            }
            _ => None,
        }
    }

    fn coord(coord: &Coord<f64>) -> LatLng {
        LatLng::from_lng_lat(coord.x, coord.y)
    }

    fn coords(coords: &[Coord<f64>]) -> Vec<LatLng> {
        coords.iter().map(coord).collect()
    }
}
