//! KMZ decoder: a KML document inside a ZIP archive.

use async_trait::async_trait;
use log::{debug, info};

use crate::decoder::{kml_layer, DecodeContext, DecodeStage, FormatDecoder};
use crate::error::{ArchiveError, Capability, GeoViewError};
use crate::layer::DataLayer;
use crate::request::FileType;

/// Decoder of KMZ files: zipped KML documents, possibly with images and other resources.
///
/// The first `.kml` entry of the archive is extracted and parsed in memory with the same
/// converter the [`KmlDecoder`](super::KmlDecoder) uses.
pub struct KmzDecoder;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FormatDecoder for KmzDecoder {
    async fn decode(
        &self,
        url: &str,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn DataLayer>, GeoViewError> {
        ctx.capabilities().require(Capability::Archive)?;
        ctx.capabilities().require(Capability::Markup)?;

        ctx.report(FileType::Kmz, DecodeStage::Download);
        let bytes = ctx.fetch(url).await?;
        info!("KMZ file downloaded, {} bytes", bytes.len());

        ctx.report(FileType::Kmz, DecodeStage::Extract);
        let document = extract_kml(&bytes)?;
        debug!("Extracted KML document of {} bytes", document.len());

        ctx.report(FileType::Kmz, DecodeStage::Decode);
        let layer = kml_layer(&document)?;

        ctx.report(FileType::Kmz, DecodeStage::Render);
        Ok(Box::new(layer))
    }
}

/// Extracts the text of the first `.kml` entry (case-insensitive, in archive order) of a KMZ
/// archive.
#[cfg(feature = "kmz")]
pub fn extract_kml(bytes: &[u8]) -> Result<String, ArchiveError> {
    use std::io::{Cursor, Read};

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ArchiveError::Corrupt(err.to_string()))?;

    let mut found = None;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|err| ArchiveError::Corrupt(err.to_string()))?;
        debug!("Found archive entry {}", entry.name());
        if entry.is_file() && entry.name().to_lowercase().ends_with(".kml") {
            found = Some(index);
            break;
        }
    }

    let Some(index) = found else {
        return Err(ArchiveError::DocumentNotFound("KML"));
    };

    let mut entry = archive
        .by_index(index)
        .map_err(|err| ArchiveError::Corrupt(err.to_string()))?;
    let name = entry.name().to_string();
    info!("KML document found in the archive: {name}");

    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .map_err(|err| ArchiveError::UnreadableEntry {
            name,
            reason: err.to_string(),
        })?;

    Ok(text)
}

/// Extracts the KML document of a KMZ archive. The `kmz` feature is disabled, so this always
/// fails.
#[cfg(not(feature = "kmz"))]
pub fn extract_kml(_bytes: &[u8]) -> Result<String, ArchiveError> {
    Err(ArchiveError::Corrupt("archive support is not compiled in".into()))
}

#[cfg(all(test, feature = "kmz"))]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::tests::{zip_archive, SAMPLE_KML};

    #[test]
    fn extracts_first_kml_entry() {
        let archive = zip_archive(&[
            ("images/icon.png", b"\x89PNG".as_slice()),
            ("Doc.KML", SAMPLE_KML.as_bytes()),
            ("other.kml", b"<kml/>".as_slice()),
        ]);

        assert_eq!(extract_kml(&archive).unwrap(), SAMPLE_KML);
    }

    #[test]
    fn archive_without_kml() {
        let archive = zip_archive(&[("readme.txt", b"nothing here".as_slice())]);
        assert_matches!(
            extract_kml(&archive),
            Err(ArchiveError::DocumentNotFound("KML"))
        );
    }

    #[test]
    fn kml_entry_that_is_not_text() {
        let archive = zip_archive(&[("doc.kml", b"<kml>\xff\xfe</kml>".as_slice())]);
        assert_matches!(
            extract_kml(&archive),
            Err(ArchiveError::UnreadableEntry { name, .. }) if name == "doc.kml"
        );
    }

    #[test]
    fn corrupt_archive() {
        assert_matches!(
            extract_kml(b"definitely not a zip archive"),
            Err(ArchiveError::Corrupt(_))
        );
    }
}
