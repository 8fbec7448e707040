//! GeoView is the core of a single-file geospatial viewer. It takes a file locator and an optional
//! type token, fetches and decodes the file (KML, KMZ, GeoJSON, GPX or Shapefile, bare or zipped)
//! into a uniform feature layer, finds the area the data covers and fits the map view to it,
//! reporting every step through one status state machine.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use geoview::platform::HttpLoader;
//! use geoview::status::LogReporter;
//! use geoview::{LoadRequest, Viewer, ViewerConfig};
//!
//! # tokio_test::block_on(async {
//! let viewer = Viewer::new(
//!     ViewerConfig::default(),
//!     Arc::new(HttpLoader::default()),
//!     Arc::new(LogReporter),
//! );
//!
//! viewer
//!     .dispatch(LoadRequest::new("https://example.com/tracks/day1.gpx", ""))
//!     .await;
//! println!("{}", viewer.status());
//! # });
//! ```
//!
//! # Main components
//!
//! * [`Viewer`] is the session context. It owns the active layer, the cached data bounds, the
//!   [`ViewController`](view::ViewController) and the current [`LoadStatus`](status::LoadStatus),
//!   and dispatches [`LoadRequest`]s to a [`decoder`].
//! * [`decoder`]s turn a fetched resource into a [`FeatureLayer`](layer::FeatureLayer). All of them
//!   go through a [`ResourceLoader`](platform::ResourceLoader), so the viewer can run against the
//!   network, the local file system, or an in-memory fixture.
//! * The [`bounds`] aggregator computes the area to show, degrading to a single focus point or
//!   to the default view when a layer has no usable extent.
//! * [`status`] projects the state machine into user-visible text and markup.

pub mod bounds;
pub mod config;
pub mod decoder;
pub mod error;
pub mod layer;
pub mod messages;
pub mod platform;
pub mod request;
pub mod status;
pub mod view;
mod viewer;

pub use config::ViewerConfig;
pub use error::GeoViewError;
pub use request::{DeclaredType, FileType, LoadRequest};
pub use viewer::Viewer;

// Reexport geoview_types
pub use geoview_types;
