//! Format decoders turn a resource locator into a [`DataLayer`].
//!
//! There is one decoder per supported [`FileType`]; `shp` and `zip` share the
//! [`ShapefileDecoder`]. Every decoder runs its stages strictly in sequence (download, extract,
//! decode, render) and reports the stage boundaries through the [`ProgressSink`] of the
//! [`DecodeContext`]. The reports are advisory only, the result of the decoder is its return value.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::config::Capabilities;
use crate::error::GeoViewError;
use crate::layer::DataLayer;
use crate::platform::ResourceLoader;
use crate::request::FileType;

mod geojson;
mod gpx;
mod kml;
mod kmz;
mod shapefile;

pub use self::geojson::{features_to_layer, geojson_layer, GeoJsonDecoder};
pub use self::gpx::{gpx_layer, GpxDecoder};
pub use self::kml::{kml_layer, KmlDecoder};
pub use self::kmz::{extract_kml, KmzDecoder};
pub use self::shapefile::{shapefile_layer, ShapefileDecoder};

/// Stage boundary of a decode pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// The resource is being fetched.
    Download,
    /// A document is being extracted from an archive.
    Extract,
    /// The content is being decoded into features.
    Decode,
    /// The decoded features are being handed to the map.
    Render,
}

/// Receives stage reports of a running decoder.
pub trait ProgressSink: MaybeSend + MaybeSync {
    /// Called when the decoder of the `file_type` enters the `stage`.
    fn stage(&self, file_type: FileType, stage: DecodeStage);
}

/// Everything a decoder needs from the viewer.
pub struct DecodeContext<'a> {
    loader: &'a dyn ResourceLoader,
    capabilities: Capabilities,
    progress: &'a dyn ProgressSink,
}

impl<'a> DecodeContext<'a> {
    /// Creates a new context.
    pub fn new(
        loader: &'a dyn ResourceLoader,
        capabilities: Capabilities,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            loader,
            capabilities,
            progress,
        }
    }

    /// Available capabilities.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Fetches the resource.
    pub async fn fetch(&self, url: &str) -> Result<Bytes, GeoViewError> {
        self.loader.load_bytes(url).await
    }

    /// Reports a stage boundary.
    pub fn report(&self, file_type: FileType, stage: DecodeStage) {
        self.progress.stage(file_type, stage);
    }
}

/// Decoder of a single file format.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FormatDecoder: MaybeSend + MaybeSync {
    /// Fetches the resource at `url` and decodes it into a feature layer.
    async fn decode(
        &self,
        url: &str,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn DataLayer>, GeoViewError>;
}

/// Table mapping each file type to its decoder.
#[derive(Clone)]
pub struct DecoderSet {
    decoders: HashMap<FileType, Arc<dyn FormatDecoder>>,
}

impl Default for DecoderSet {
    fn default() -> Self {
        let shapefile: Arc<dyn FormatDecoder> = Arc::new(ShapefileDecoder);
        let mut decoders: HashMap<FileType, Arc<dyn FormatDecoder>> = HashMap::new();
        decoders.insert(FileType::Kml, Arc::new(KmlDecoder));
        decoders.insert(FileType::Kmz, Arc::new(KmzDecoder));
        decoders.insert(FileType::GeoJson, Arc::new(GeoJsonDecoder));
        decoders.insert(FileType::Gpx, Arc::new(GpxDecoder));
        decoders.insert(FileType::Shp, shapefile.clone());
        decoders.insert(FileType::Zip, shapefile);

        Self { decoders }
    }
}

impl DecoderSet {
    /// Replaces the decoder of the given file type.
    pub fn with_decoder(mut self, file_type: FileType, decoder: Arc<dyn FormatDecoder>) -> Self {
        self.decoders.insert(file_type, decoder);
        self
    }

    /// Returns the decoder of the file type.
    pub fn get(&self, file_type: FileType) -> Option<Arc<dyn FormatDecoder>> {
        self.decoders.get(&file_type).cloned()
    }
}
