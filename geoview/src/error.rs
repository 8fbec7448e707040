//! Error types used by the crate.

use thiserror::Error;

/// Optional decoding capability that a file format depends on.
///
/// Capabilities are compiled in through cargo features and can additionally be switched off by
/// the host through [`Capabilities`](crate::config::Capabilities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Markup (KML/GPX) to features converter.
    Markup,
    /// Archive reader used for KMZ files.
    Archive,
    /// Shapefile to features converter.
    Shapefile,
}

/// Problems with the load request itself, detected before any decoding starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The file locator is empty.
    #[error("file locator is empty")]
    EmptyUrl,
    /// The file type token is not one of the supported formats.
    #[error("unsupported file format `{0}`")]
    UnsupportedFormat(String),
}

/// KMZ archive failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// The archive cannot be opened.
    #[error("archive is corrupt: {0}")]
    Corrupt(String),
    /// The archive contains no document of the expected kind.
    #[error("no {0} document found inside the archive")]
    DocumentNotFound(&'static str),
    /// The document was found but its content cannot be read as text.
    #[error("cannot read archive entry `{name}`: {reason}")]
    UnreadableEntry {
        /// Entry name.
        name: String,
        /// Underlying problem.
        reason: String,
    },
}

/// GeoView error type.
#[derive(Debug, Error)]
pub enum GeoViewError {
    /// Invalid load request.
    #[error(transparent)]
    Input(#[from] InputError),
    /// A converter or extractor the format depends on is not available.
    #[error("{0:?} library is not available")]
    CapabilityMissing(Capability),
    /// The resource could not be fetched.
    #[error("could not fetch {url}: {reason}")]
    Network {
        /// Requested resource.
        url: String,
        /// Transport error or HTTP status.
        reason: String,
    },
    /// KMZ or shapefile archive error.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// The content cannot be decoded.
    #[error("failed to parse data: {0}")]
    Parse(String),
}

impl GeoViewError {
    /// Creates a [`GeoViewError::Network`] error.
    pub fn network(url: &str, reason: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for GeoViewError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<geojson::Error> for GeoViewError {
    fn from(value: geojson::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<geoview_types::error::GeoViewTypesError> for GeoViewError {
    fn from(value: geoview_types::error::GeoViewTypesError) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<std::str::Utf8Error> for GeoViewError {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::Parse(format!("document is not valid UTF-8: {value}"))
    }
}

#[cfg(feature = "kml")]
impl From<kml::Error> for GeoViewError {
    fn from(value: kml::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(feature = "gpx")]
impl From<gpx::errors::GpxError> for GeoViewError {
    fn from(value: gpx::errors::GpxError) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(feature = "shapefile")]
impl From<shapefile::Error> for GeoViewError {
    fn from(value: shapefile::Error) -> Self {
        Self::Parse(value.to_string())
    }
}
