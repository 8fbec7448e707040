//! ESRI shapefile decoder for bare `.shp` files and zipped shapefile sets.

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

use crate::decoder::{DecodeContext, DecodeStage, FormatDecoder};
use crate::error::{Capability, GeoViewError};
use crate::layer::{DataLayer, FeatureLayer};
use crate::request::FileType;

/// Decoder of ESRI shapefiles, either a bare `.shp` file or a ZIP archive with one or more
/// shapefile sets.
///
/// Attributes are read from the `.dbf` file of the same name. Inside an archive it is looked up
/// by the entry name; for a bare `.shp` file the sibling `.dbf` resource is fetched, and a
/// missing one only means that the features have no properties.
pub struct ShapefileDecoder;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FormatDecoder for ShapefileDecoder {
    async fn decode(
        &self,
        url: &str,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn DataLayer>, GeoViewError> {
        ctx.capabilities().require(Capability::Shapefile)?;

        ctx.report(FileType::Shp, DecodeStage::Download);
        let bytes = ctx.fetch(url).await?;
        info!("Shapefile data downloaded, {} bytes", bytes.len());

        let layer = if is_zip(&bytes) {
            ctx.report(FileType::Shp, DecodeStage::Extract);
            let sets = read_archive(&bytes)?;

            ctx.report(FileType::Shp, DecodeStage::Decode);
            let mut features = Vec::new();
            for (shp, dbf) in &sets {
                features.extend(shapefile_features(shp, dbf.as_deref())?);
            }
            crate::decoder::features_to_layer(features)?
        } else {
            let dbf = match dbf_url(url) {
                Some(dbf_url) => fetch_optional(ctx, &dbf_url).await,
                None => None,
            };

            ctx.report(FileType::Shp, DecodeStage::Decode);
            shapefile_layer(&bytes, dbf.as_deref())?
        };

        ctx.report(FileType::Shp, DecodeStage::Render);
        Ok(Box::new(layer))
    }
}

async fn fetch_optional(ctx: &DecodeContext<'_>, url: &str) -> Option<Bytes> {
    match ctx.fetch(url).await {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            debug!("No attribute table for the shapefile: {err}");
            None
        }
    }
}

/// Checks the local file header (or the end of central directory of an empty archive) signature.
fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(b"PK\x05\x06")
}

/// Locator of the `.dbf` file next to a `.shp` locator. The query string is kept, since it often
/// carries access tokens.
fn dbf_url(url: &str) -> Option<String> {
    let path_end = url.find(['?', '#']).unwrap_or(url.len());
    let (path, rest) = url.split_at(path_end);
    let stem = path
        .strip_suffix(".shp")
        .or_else(|| path.strip_suffix(".SHP"))?;

    Some(format!("{stem}.dbf{rest}"))
}

/// Converts a shapefile (and its optional attribute table) into a layer.
pub fn shapefile_layer(shp: &[u8], dbf: Option<&[u8]>) -> Result<FeatureLayer, GeoViewError> {
    crate::decoder::features_to_layer(shapefile_features(shp, dbf)?)
}

#[cfg(feature = "shapefile")]
fn read_archive(bytes: &[u8]) -> Result<Vec<(Vec<u8>, Option<Vec<u8>>)>, GeoViewError> {
    use std::io::{Cursor, Read};

    use crate::error::ArchiveError;

    fn read_entry(
        archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
        name: &str,
    ) -> Result<Vec<u8>, ArchiveError> {
        let mut entry = archive
            .by_name(name)
            .map_err(|err| ArchiveError::Corrupt(err.to_string()))?;
        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|err| ArchiveError::UnreadableEntry {
                name: name.to_string(),
                reason: err.to_string(),
            })?;
        Ok(buf)
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ArchiveError::Corrupt(err.to_string()))?;
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    let mut sets = Vec::new();
    for name in &names {
        let lower = name.to_lowercase();
        let Some(stem) = lower.strip_suffix(".shp") else {
            continue;
        };

        let dbf_name = names
            .iter()
            .find(|candidate| candidate.to_lowercase() == format!("{stem}.dbf"));
        debug!("Found shapefile {name} with attribute table {dbf_name:?}");

        let shp = read_entry(&mut archive, name)?;
        let dbf = match dbf_name {
            Some(dbf_name) => Some(read_entry(&mut archive, dbf_name)?),
            None => None,
        };
        sets.push((shp, dbf));
    }

    if sets.is_empty() {
        return Err(ArchiveError::DocumentNotFound("shapefile").into());
    }

    Ok(sets)
}

#[cfg(not(feature = "shapefile"))]
fn read_archive(_bytes: &[u8]) -> Result<Vec<(Vec<u8>, Option<Vec<u8>>)>, GeoViewError> {
    Err(GeoViewError::CapabilityMissing(Capability::Shapefile))
}

#[cfg(not(feature = "shapefile"))]
fn shapefile_features(
    _shp: &[u8],
    _dbf: Option<&[u8]>,
) -> Result<Vec<::geojson::Feature>, GeoViewError> {
    Err(GeoViewError::CapabilityMissing(Capability::Shapefile))
}

#[cfg(feature = "shapefile")]
use convert::shapefile_features;

#[cfg(feature = "shapefile")]
mod convert {
    use std::io::Cursor;

    use ::geojson::{Feature, Geometry, JsonObject, Value as GeoJsonValue};
    use ::shapefile::dbase::{self, FieldValue};
    use ::shapefile::{Point, PointM, PointZ, PolygonRing, Shape, ShapeReader};
    use log::{debug, warn};
    use serde_json::Value;

    use crate::error::GeoViewError;

    trait Planar {
        fn position(&self) -> Vec<f64>;
    }

    impl Planar for Point {
        fn position(&self) -> Vec<f64> {
            vec![self.x, self.y]
        }
    }

    impl Planar for PointM {
        fn position(&self) -> Vec<f64> {
            vec![self.x, self.y]
        }
    }

    impl Planar for PointZ {
        fn position(&self) -> Vec<f64> {
            vec![self.x, self.y]
        }
    }

    pub(super) fn shapefile_features(
        shp: &[u8],
        dbf: Option<&[u8]>,
    ) -> Result<Vec<Feature>, GeoViewError> {
        let shapes = ShapeReader::new(Cursor::new(shp))?.read()?;
        let records = match dbf {
            Some(dbf) => read_records(dbf)?,
            None => Vec::new(),
        };
        debug!(
            "Read {} shapes and {} attribute records",
            shapes.len(),
            records.len()
        );

        let mut records = records.into_iter();
        let mut features = Vec::with_capacity(shapes.len());
        for shape in &shapes {
            let properties = records.next();
            let Some(geometry) = convert_shape(shape) else {
                continue;
            };

            features.push(Feature {
                geometry: Some(Geometry::new(geometry)),
                properties,
                ..Default::default()
            });
        }

        Ok(features)
    }

    fn read_records(dbf: &[u8]) -> Result<Vec<JsonObject>, GeoViewError> {
        let parse_error = |err: dbase::Error| GeoViewError::Parse(err.to_string());

        let mut reader = dbase::Reader::new(Cursor::new(dbf)).map_err(parse_error)?;
        let field_names: Vec<String> = reader
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();

        let records = reader.read().map_err(parse_error)?;
        Ok(records
            .iter()
            .map(|record| {
                field_names
                    .iter()
                    .map(|name| {
                        let value = record.get(name).map(field_value).unwrap_or(Value::Null);
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect())
    }

    fn field_value(value: &FieldValue) -> Value {
        match value {
            FieldValue::Character(text) => text.clone().map(Value::String).unwrap_or(Value::Null),
            FieldValue::Numeric(number) => number.map(Value::from).unwrap_or(Value::Null),
            FieldValue::Float(number) => number.map(Value::from).unwrap_or(Value::Null),
            FieldValue::Logical(flag) => flag.map(Value::Bool).unwrap_or(Value::Null),
            FieldValue::Integer(number) => Value::from(*number),
            FieldValue::Double(number) | FieldValue::Currency(number) => Value::from(*number),
            FieldValue::Memo(text) => Value::String(text.clone()),
            other => Value::String(format!("{other:?}")),
        }
    }

    fn convert_shape(shape: &Shape) -> Option<GeoJsonValue> {
        match shape {
            Shape::NullShape => None,
            Shape::Point(p) => Some(GeoJsonValue::Point(p.position())),
            Shape::PointM(p) => Some(GeoJsonValue::Point(p.position())),
            Shape::PointZ(p) => Some(GeoJsonValue::Point(p.position())),
            Shape::Multipoint(m) => Some(GeoJsonValue::MultiPoint(positions(m.points()))),
            Shape::MultipointM(m) => Some(GeoJsonValue::MultiPoint(positions(m.points()))),
            Shape::MultipointZ(m) => Some(GeoJsonValue::MultiPoint(positions(m.points()))),
            Shape::Polyline(line) => lines(line.parts()),
            Shape::PolylineM(line) => lines(line.parts()),
            Shape::PolylineZ(line) => lines(line.parts()),
            Shape::Polygon(polygon) => polygons(polygon.rings()),
            Shape::PolygonM(polygon) => polygons(polygon.rings()),
            Shape::PolygonZ(polygon) => polygons(polygon.rings()),
            Shape::Multipatch(_) => {
                warn!("Multipatch shapes are not supported, skipping");
                None
            }
        }
    }

    fn positions<P: Planar>(points: &[P]) -> Vec<Vec<f64>> {
        points.iter().map(Planar::position).collect()
    }

    fn lines<P: Planar>(parts: &[Vec<P>]) -> Option<GeoJsonValue> {
        let mut lines: Vec<Vec<Vec<f64>>> = parts
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| positions(part))
            .collect();

        match lines.len() {
            0 => None,
            1 => Some(GeoJsonValue::LineString(lines.remove(0))),
            _ => Some(GeoJsonValue::MultiLineString(lines)),
        }
    }

    /// Outer rings start a new polygon, inner rings are holes of the last outer ring.
    fn polygons<P: Planar>(rings: &[PolygonRing<P>]) -> Option<GeoJsonValue> {
        let mut polygons: Vec<Vec<Vec<Vec<f64>>>> = Vec::new();
        for ring in rings {
            let points = positions(ring.points());
            match (ring, polygons.last_mut()) {
                (PolygonRing::Inner(_), Some(polygon)) => polygon.push(points),
                _ => polygons.push(vec![points]),
            }
        }

        match polygons.len() {
            0 => None,
            1 => Some(GeoJsonValue::Polygon(polygons.remove(0))),
            _ => Some(GeoJsonValue::MultiPolygon(polygons)),
        }
    }
}

#[cfg(all(test, feature = "shapefile"))]
mod tests {
    use assert_matches::assert_matches;
    use geoview_types::{latlng, Geom};

    use super::*;
    use crate::error::ArchiveError;
    use crate::layer::LayerFeature;
    use crate::tests::{point_dbf, point_shp, zip_archive};

    #[test]
    fn sibling_dbf_url() {
        assert_eq!(
            dbf_url("https://x/data/roads.shp?token=1"),
            Some("https://x/data/roads.dbf?token=1".to_string())
        );
        assert_eq!(dbf_url("/tmp/ROADS.SHP"), Some("/tmp/ROADS.dbf".to_string()));
        assert_eq!(dbf_url("https://x/download.php?id=3"), None);
    }

    #[test]
    fn zip_is_detected_by_signature() {
        assert!(is_zip(&zip_archive(&[("a.txt", b"a".as_slice())])));
        assert!(!is_zip(&point_shp(&[(51.4, 35.7)])));
    }

    #[test]
    fn bare_points_without_attributes() {
        let layer = shapefile_layer(&point_shp(&[(51.4, 35.7), (59.6, 36.3)]), None).unwrap();

        assert_eq!(layer.len(), 2);
        assert_eq!(layer.features()[0].geometry(), &Geom::Point(latlng!(35.7, 51.4)));
        assert_eq!(layer.features()[1].popup(), None);
    }

    #[test]
    fn attributes_become_popups() {
        let layer = shapefile_layer(
            &point_shp(&[(51.4, 35.7), (59.6, 36.3)]),
            Some(&point_dbf(&["Tehran", "Mashhad"])),
        )
        .unwrap();

        assert_eq!(layer.features()[1].properties()["NAME"], "Mashhad");
        assert_eq!(
            layer.features()[0].popup(),
            Some("<strong>NAME:</strong> Tehran")
        );
    }

    #[test]
    fn archive_sets_are_paired_by_name() {
        let archive = zip_archive(&[
            ("cities/cities.shp", point_shp(&[(51.4, 35.7)]).as_slice()),
            ("cities/cities.DBF", point_dbf(&["Tehran"]).as_slice()),
            ("cities/readme.txt", b"hello".as_slice()),
        ]);

        let sets = read_archive(&archive).unwrap();
        assert_eq!(sets.len(), 1);
        assert!(sets[0].1.is_some());
    }

    #[test]
    fn archive_without_shapefile() {
        let archive = zip_archive(&[("readme.txt", b"hello".as_slice())]);
        assert_matches!(
            read_archive(&archive),
            Err(GeoViewError::Archive(ArchiveError::DocumentNotFound(
                "shapefile"
            )))
        );
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert_matches!(
            shapefile_layer(b"not a shapefile at all", None),
            Err(GeoViewError::Parse(_))
        );
    }
}
