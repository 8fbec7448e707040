//! Load status state machine and its projections into user-visible markup.

use std::fmt::{Display, Formatter};

use log::{error, info};
use maybe_sync::{MaybeSend, MaybeSync};

use crate::messages::{Locale, Message};

/// State of the current load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A load is in progress.
    Loading,
    /// The last load finished and its layer is shown.
    Success,
    /// The last load failed. Terminal for the request.
    Error,
}

impl StatusKind {
    /// Name used as the CSS class of the status element.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// The single current status of the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStatus {
    /// State.
    pub kind: StatusKind,
    /// Localized human readable message.
    pub message: String,
}

impl LoadStatus {
    /// Creates a loading status.
    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Loading,
            message: message.into(),
        }
    }

    /// Creates a success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    /// Creates an error status.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    /// Status element markup.
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="status {}">{}</div>"#,
            self.kind.as_str(),
            self.message
        )
    }
}

impl Display for LoadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

/// Number of features of a loaded layer. Unknown if the layer cannot enumerate its features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureCount {
    /// Exact count.
    Known(usize),
    /// The layer does not support enumeration.
    Unknown,
}

/// Summary of the loaded file shown in the info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoSummary {
    /// Display name of the file type.
    pub file_type: String,
    /// Number of features.
    pub feature_count: FeatureCount,
    /// Whether valid bounds of the data are known.
    pub bounds_available: bool,
}

impl FileInfoSummary {
    /// Info panel markup.
    pub fn to_html(&self, locale: Locale) -> String {
        let count = match self.feature_count {
            FeatureCount::Known(count) => count.to_string(),
            FeatureCount::Unknown => Message::Unknown.text(locale),
        };
        let bounds = if self.bounds_available {
            Message::Available
        } else {
            Message::Unknown
        };

        [
            (Message::FileTypeLabel, self.file_type.clone()),
            (Message::FeatureCountLabel, count),
            (Message::BoundsLabel, bounds.text(locale)),
        ]
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="info-item"><strong>{}:</strong> {value}</div>"#,
                label.text(locale)
            )
        })
        .collect()
    }
}

/// Receives every status change and the summary of each successful load.
pub trait StatusReporter: MaybeSend + MaybeSync {
    /// Called when the status changes, including loading message updates.
    fn update_status(&self, status: &LoadStatus);
    /// Called after a successful load.
    fn display_file_info(&self, summary: &FileInfoSummary);
}

/// Reporter writing everything to the log.
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn update_status(&self, status: &LoadStatus) {
        match status.kind {
            StatusKind::Error => error!("{status}"),
            _ => info!("{status}"),
        }
    }

    fn display_file_info(&self, summary: &FileInfoSummary) {
        info!("{summary:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_markup() {
        assert_eq!(
            LoadStatus::error("❌ File format is not supported").to_html(),
            r#"<div class="status error">❌ File format is not supported</div>"#
        );
        assert_eq!(LoadStatus::loading("...").to_string(), "[loading] ...");
    }

    #[test]
    fn summary_markup() {
        let summary = FileInfoSummary {
            file_type: "GeoJSON".into(),
            feature_count: FeatureCount::Known(2),
            bounds_available: true,
        };
        assert_eq!(
            summary.to_html(Locale::En),
            concat!(
                r#"<div class="info-item"><strong>File type:</strong> GeoJSON</div>"#,
                r#"<div class="info-item"><strong>Features:</strong> 2</div>"#,
                r#"<div class="info-item"><strong>Bounds:</strong> available</div>"#,
            )
        );
    }

    #[test]
    fn unknown_count_is_localized() {
        let summary = FileInfoSummary {
            file_type: "KML".into(),
            feature_count: FeatureCount::Unknown,
            bounds_available: false,
        };
        let html = summary.to_html(Locale::Fa);
        assert!(html.contains("<strong>تعداد عوارض:</strong> نامشخص"));
        assert!(html.contains("<strong>محدوده:</strong> نامشخص"));
    }
}
