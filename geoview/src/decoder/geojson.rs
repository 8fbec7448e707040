//! GeoJSON decoder.

use ::geojson::GeoJson;
use async_trait::async_trait;
use geoview_types::Geom;
use log::debug;

use crate::decoder::{DecodeContext, DecodeStage, FormatDecoder};
use crate::error::GeoViewError;
use crate::layer::{DataLayer, Feature, FeatureLayer};
use crate::request::FileType;

/// Decoder of GeoJSON documents.
pub struct GeoJsonDecoder;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FormatDecoder for GeoJsonDecoder {
    async fn decode(
        &self,
        url: &str,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn DataLayer>, GeoViewError> {
        ctx.report(FileType::GeoJson, DecodeStage::Download);
        let bytes = ctx.fetch(url).await?;

        ctx.report(FileType::GeoJson, DecodeStage::Decode);
        let layer = geojson_layer(std::str::from_utf8(&bytes)?)?;

        ctx.report(FileType::GeoJson, DecodeStage::Render);
        Ok(Box::new(layer))
    }
}

/// Parses a GeoJSON document into a layer.
///
/// A feature collection, a single feature and a bare geometry are all accepted. Every feature
/// gets a popup listing its properties.
pub fn geojson_layer(text: &str) -> Result<FeatureLayer, GeoViewError> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![::geojson::Feature {
            geometry: Some(geometry),
            ..Default::default()
        }],
    };

    features_to_layer(features)
}

/// Builds a layer from GeoJSON features. Features without geometry are not rendered and are
/// therefore left out of the layer.
pub fn features_to_layer(
    features: impl IntoIterator<Item = ::geojson::Feature>,
) -> Result<FeatureLayer, GeoViewError> {
    let mut layer_features = Vec::new();
    for feature in features {
        let Some(geometry) = &feature.geometry else {
            debug!("Skipping feature {:?} without geometry", feature.id);
            continue;
        };

        let geometry = Geom::try_from(geometry)?;
        layer_features.push(
            Feature::new(geometry)
                .with_properties(feature.properties.unwrap_or_default())
                .with_property_popup(),
        );
    }

    Ok(FeatureLayer::new(layer_features))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geoview_types::latlng;

    use super::*;
    use crate::layer::LayerFeature;

    #[test]
    fn feature_collection() {
        let layer = geojson_layer(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": { "name": "Tehran", "pop": 9 },
                      "geometry": { "type": "Point", "coordinates": [51.389, 35.689] } },
                    { "type": "Feature", "properties": null,
                      "geometry": { "type": "LineString", "coordinates": [[51.0, 35.0], [52.0, 36.0]] } },
                    { "type": "Feature", "properties": { "orphan": true }, "geometry": null }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(layer.len(), 2);
        assert_eq!(
            layer.features()[0].geometry(),
            &Geom::Point(latlng!(35.689, 51.389))
        );
        assert_eq!(
            layer.features()[0].popup(),
            Some("<strong>name:</strong> Tehran<br><strong>pop:</strong> 9")
        );
        assert_eq!(layer.features()[1].popup(), None);
    }

    #[test]
    fn bare_geometry_is_one_feature() {
        let layer =
            geojson_layer(r#"{ "type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[0,0]]] }"#)
                .unwrap();
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert_matches!(
            geojson_layer(r#"{ "type": "FeatureCollection", "features": [ "#),
            Err(GeoViewError::Parse(_))
        );
    }
}
