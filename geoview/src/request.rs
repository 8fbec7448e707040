//! Load request and file type resolution.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::InputError;

/// Geospatial file formats the viewer can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Keyhole Markup Language.
    Kml,
    /// Zipped KML.
    Kmz,
    /// GeoJSON.
    GeoJson,
    /// GPS Exchange Format.
    Gpx,
    /// Bare ESRI shapefile.
    Shp,
    /// Shapefile set inside a ZIP archive.
    Zip,
}

impl FileType {
    /// All supported types.
    pub const ALL: [FileType; 6] = [
        FileType::Kml,
        FileType::Kmz,
        FileType::GeoJson,
        FileType::Gpx,
        FileType::Shp,
        FileType::Zip,
    ];

    /// Name of the format shown to the user.
    pub fn display_name(&self) -> &'static str {
        match self {
            FileType::Kml => "KML",
            FileType::Kmz => "KMZ",
            FileType::GeoJson => "GeoJSON",
            FileType::Gpx => "GPX",
            FileType::Shp | FileType::Zip => "Shapefile",
        }
    }

    /// Canonical type token.
    pub fn token(&self) -> &'static str {
        match self {
            FileType::Kml => "kml",
            FileType::Kmz => "kmz",
            FileType::GeoJson => "geojson",
            FileType::Gpx => "gpx",
            FileType::Shp => "shp",
            FileType::Zip => "zip",
        }
    }
}

impl FromStr for FileType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kml" => Ok(FileType::Kml),
            "kmz" => Ok(FileType::Kmz),
            "geojson" | "json" => Ok(FileType::GeoJson),
            "gpx" => Ok(FileType::Gpx),
            "shp" => Ok(FileType::Shp),
            "zip" => Ok(FileType::Zip),
            other => Err(InputError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Type of a load request, either a supported format or the raw unrecognized token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// Supported format.
    Known(FileType),
    /// Token that does not name a supported format (possibly empty).
    Unknown(String),
}

impl DeclaredType {
    /// Returns the file type, or the input error for an unrecognized token.
    pub fn file_type(&self) -> Result<FileType, InputError> {
        match self {
            DeclaredType::Known(file_type) => Ok(*file_type),
            DeclaredType::Unknown(token) => Err(InputError::UnsupportedFormat(token.clone())),
        }
    }
}

/// Request to load a single file. Built once from the startup input and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    url: String,
    declared_type: DeclaredType,
}

impl LoadRequest {
    /// Creates a new request.
    ///
    /// The type token is lower-cased. If it is empty, the type is inferred from the extension of
    /// the locator. This never fails: unsupported types are reported when the request is
    /// dispatched.
    pub fn new(url: impl Into<String>, type_token: &str) -> Self {
        let url = url.into();
        let token = type_token.trim().to_lowercase();
        let token = if token.is_empty() {
            extension(&url).unwrap_or_default()
        } else {
            token
        };

        let declared_type = match token.parse() {
            Ok(file_type) => DeclaredType::Known(file_type),
            Err(_) => DeclaredType::Unknown(token),
        };

        Self { url, declared_type }
    }

    /// File locator.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Declared or inferred type.
    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }
}

/// Lower-cased extension of the last path segment of the locator, ignoring the query string and
/// the fragment.
pub fn extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }

    Some(ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_type_is_lower_cased() {
        let request = LoadRequest::new("https://x/data", "KMZ");
        assert_eq!(request.declared_type(), &DeclaredType::Known(FileType::Kmz));
    }

    #[test]
    fn empty_type_is_inferred_from_extension() {
        let request = LoadRequest::new("https://x/y.geojson", "");
        assert_eq!(
            request.declared_type(),
            &DeclaredType::Known(FileType::GeoJson)
        );

        let request = LoadRequest::new("https://x/files/Tracks.GPX?token=abc#top", "");
        assert_eq!(request.declared_type(), &DeclaredType::Known(FileType::Gpx));
    }

    #[test]
    fn explicit_type_wins_over_extension() {
        let request = LoadRequest::new("https://x/download.php?id=4", "shp");
        assert_eq!(request.declared_type(), &DeclaredType::Known(FileType::Shp));
    }

    #[test]
    fn unknown_tokens_are_kept() {
        let request = LoadRequest::new("https://x/y.csv", "");
        assert_eq!(
            request.declared_type(),
            &DeclaredType::Unknown("csv".to_string())
        );
        assert_eq!(
            request.declared_type().file_type(),
            Err(InputError::UnsupportedFormat("csv".to_string()))
        );

        let request = LoadRequest::new("https://x/no-extension", "");
        assert_eq!(request.declared_type(), &DeclaredType::Unknown(String::new()));
    }

    #[test]
    fn extension_edge_cases() {
        assert_eq!(extension("https://x.org/a.b/file"), None);
        assert_eq!(extension(".hidden"), None);
        assert_eq!(extension("C:\\data\\roads.ZIP"), Some("zip".to_string()));
    }

    #[test]
    fn every_type_parses_from_its_token() {
        for file_type in FileType::ALL {
            assert_eq!(file_type.token().parse::<FileType>(), Ok(file_type));
        }
    }
}
