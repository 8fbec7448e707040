//! GPX decoder.

use async_trait::async_trait;

use crate::decoder::{DecodeContext, DecodeStage, FormatDecoder};
use crate::error::{Capability, GeoViewError};
use crate::layer::{DataLayer, FeatureLayer};
use crate::request::FileType;

/// Decoder of GPX tracks, routes and waypoints.
pub struct GpxDecoder;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FormatDecoder for GpxDecoder {
    async fn decode(
        &self,
        url: &str,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn DataLayer>, GeoViewError> {
        ctx.capabilities().require(Capability::Markup)?;

        ctx.report(FileType::Gpx, DecodeStage::Download);
        let bytes = ctx.fetch(url).await?;

        ctx.report(FileType::Gpx, DecodeStage::Decode);
        let layer = gpx_layer(&bytes)?;

        ctx.report(FileType::Gpx, DecodeStage::Render);
        Ok(Box::new(layer))
    }
}

/// Converts a GPX document into a layer.
///
/// Waypoints become points, routes become lines and tracks become lines or multi-lines
/// (one line per segment). Waypoints first, then routes, then tracks.
#[cfg(feature = "gpx")]
pub fn gpx_layer(bytes: &[u8]) -> Result<FeatureLayer, GeoViewError> {
    use geoview_types::{Geom, LatLng};
    use serde_json::Value;

    use crate::layer::{Feature, Properties};

    fn line(points: &[::gpx::Waypoint]) -> Vec<LatLng> {
        points.iter().map(|p| LatLng::from(p.point())).collect()
    }

    fn properties(name: &Option<String>, description: &Option<String>) -> Properties {
        let mut properties = Properties::new();
        if let Some(name) = name {
            properties.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(description) = description {
            properties.insert("desc".into(), Value::String(description.clone()));
        }
        properties
    }

    let gpx = ::gpx::read(bytes)?;
    let mut features = Vec::new();

    for waypoint in &gpx.waypoints {
        let mut props = properties(&waypoint.name, &waypoint.description);
        if let Some(elevation) = waypoint.elevation {
            props.insert("ele".into(), Value::from(elevation));
        }
        features.push(
            Feature::new(Geom::Point(LatLng::from(waypoint.point()))).with_properties(props),
        );
    }

    for route in &gpx.routes {
        if route.points.is_empty() {
            continue;
        }
        features.push(
            Feature::new(Geom::LineString(line(&route.points)))
                .with_properties(properties(&route.name, &route.description)),
        );
    }

    for track in &gpx.tracks {
        let mut lines: Vec<Vec<LatLng>> = track
            .segments
            .iter()
            .filter(|s| !s.points.is_empty())
            .map(|s| line(&s.points))
            .collect();

        let geometry = match lines.len() {
            0 => continue,
            1 => Geom::LineString(lines.remove(0)),
            _ => Geom::MultiLineString(lines),
        };
        features.push(
            Feature::new(geometry).with_properties(properties(&track.name, &track.description)),
        );
    }

    Ok(FeatureLayer::new(features))
}

/// Converts a GPX document into a layer. The `gpx` feature is disabled, so this always fails.
#[cfg(not(feature = "gpx"))]
pub fn gpx_layer(_bytes: &[u8]) -> Result<FeatureLayer, GeoViewError> {
    Err(GeoViewError::CapabilityMissing(Capability::Markup))
}

#[cfg(all(test, feature = "gpx"))]
mod tests {
    use assert_matches::assert_matches;
    use geoview_types::{latlng, Geom};

    use super::*;
    use crate::tests::SAMPLE_GPX;

    #[test]
    fn waypoints_routes_and_tracks() {
        let layer = gpx_layer(SAMPLE_GPX.as_bytes()).unwrap();
        assert_eq!(layer.len(), 3);

        let waypoint = &layer.features()[0];
        assert_eq!(waypoint.geometry(), &Geom::Point(latlng!(36.3, 59.6)));
        assert_eq!(waypoint.properties()["name"], "Mashhad");

        assert_matches!(
            layer.features()[1].geometry(),
            Geom::LineString(points) if points.len() == 2
        );
        assert_matches!(
            layer.features()[2].geometry(),
            Geom::MultiLineString(lines) if lines.len() == 2
        );
    }

    #[test]
    fn not_gpx_is_a_parse_error() {
        assert_matches!(gpx_layer(b"<kml></kml>"), Err(GeoViewError::Parse(_)));
    }
}
