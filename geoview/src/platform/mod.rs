//! Resource loading. Provides the [`ResourceLoader`] trait and its platform specific
//! implementations.

use async_trait::async_trait;
use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::error::GeoViewError;

/// Fetches the content of a resource by its locator.
///
/// Implementations must treat every non-success response as a
/// [`GeoViewError::Network`] error. The viewer performs exactly one load per request (plus the
/// optional sidecar files of a bare shapefile), so no caching is expected.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ResourceLoader: MaybeSend + MaybeSync {
    /// Loads a byte array from the given url.
    async fn load_bytes(&self, url: &str) -> Result<Bytes, GeoViewError>;
}

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(not(target_arch = "wasm32"))]
pub use native::HttpLoader;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebLoader;
