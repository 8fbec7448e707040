//! User-facing texts of the status line and the info panel.

use serde::{Deserialize, Serialize};

use crate::error::Capability;

/// Language of the user-facing messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Persian. The viewer is primarily built for Persian users, so this is the default.
    #[default]
    Fa,
    /// English.
    En,
}

/// A localizable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    /// Generic message shown when a load starts.
    LoadingFile,
    /// The file is being downloaded.
    Downloading(&'a str),
    /// A document is being extracted from an archive.
    Extracting(&'a str),
    /// The downloaded content is being decoded.
    Decoding(&'a str),
    /// Decoded features are being put on the map.
    Rendering,
    /// The file was loaded.
    Loaded(&'a str),
    /// The file type is not supported.
    UnsupportedFormat,
    /// The request has no file locator.
    NoFileSpecified,
    /// A library the format needs is not available.
    CapabilityMissing(Capability),
    /// Loading of the given format failed.
    LoadFailed(&'a str),
    /// Label of the file type row in the info panel.
    FileTypeLabel,
    /// Label of the feature count row in the info panel.
    FeatureCountLabel,
    /// Label of the bounds row in the info panel.
    BoundsLabel,
    /// The data has known bounds.
    Available,
    /// The value is not known.
    Unknown,
}

impl Message<'_> {
    /// Returns the text of the message in the given language.
    pub fn text(&self, locale: Locale) -> String {
        match locale {
            Locale::Fa => self.fa(),
            Locale::En => self.en(),
        }
    }

    fn fa(&self) -> String {
        match self {
            Message::LoadingFile => "در حال بارگذاری فایل...".into(),
            Message::Downloading(kind) => format!("در حال دانلود فایل {kind}..."),
            Message::Extracting(kind) => format!("در حال استخراج {kind}..."),
            Message::Decoding(kind) => format!("در حال پردازش فایل {kind}..."),
            Message::Rendering => "در حال نمایش نقشه...".into(),
            Message::Loaded(kind) => format!("✅ فایل {kind} بارگذاری شد"),
            Message::UnsupportedFormat => "❌ فرمت فایل پشتیبانی نمی‌شود".into(),
            Message::NoFileSpecified => "❌ فایل مشخص نشده است".into(),
            Message::CapabilityMissing(capability) => {
                format!("❌ کتابخانه {} بارگذاری نشده است", capability_name(*capability))
            }
            Message::LoadFailed(kind) => format!("❌ خطا در بارگذاری {kind}"),
            Message::FileTypeLabel => "نوع فایل".into(),
            Message::FeatureCountLabel => "تعداد عوارض".into(),
            Message::BoundsLabel => "محدوده".into(),
            Message::Available => "موجود".into(),
            Message::Unknown => "نامشخص".into(),
        }
    }

    fn en(&self) -> String {
        match self {
            Message::LoadingFile => "Loading file...".into(),
            Message::Downloading(kind) => format!("Downloading {kind} file..."),
            Message::Extracting(kind) => format!("Extracting {kind}..."),
            Message::Decoding(kind) => format!("Decoding {kind} file..."),
            Message::Rendering => "Rendering map...".into(),
            Message::Loaded(kind) => format!("✅ {kind} file loaded"),
            Message::UnsupportedFormat => "❌ File format is not supported".into(),
            Message::NoFileSpecified => "❌ No file specified".into(),
            Message::CapabilityMissing(capability) => {
                format!("❌ {} library is not available", capability_name(*capability))
            }
            Message::LoadFailed(kind) => format!("❌ Failed to load {kind}"),
            Message::FileTypeLabel => "File type".into(),
            Message::FeatureCountLabel => "Features".into(),
            Message::BoundsLabel => "Bounds".into(),
            Message::Available => "available".into(),
            Message::Unknown => "unknown".into(),
        }
    }
}

fn capability_name(capability: Capability) -> &'static str {
    match capability {
        Capability::Markup => "KML/GPX",
        Capability::Archive => "ZIP",
        Capability::Shapefile => "Shapefile",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persian_is_default() {
        assert_eq!(Locale::default(), Locale::Fa);
        assert_eq!(
            Message::Loaded("KML").text(Locale::default()),
            "✅ فایل KML بارگذاری شد"
        );
    }

    #[test]
    fn capability_messages_name_the_library() {
        let text = Message::CapabilityMissing(Capability::Archive).text(Locale::En);
        assert_eq!(text, "❌ ZIP library is not available");
    }
}
