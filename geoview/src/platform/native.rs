//! Resource loading for native targets: HTTP(S) through `reqwest`, local files through `tokio`.

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

use crate::error::GeoViewError;
use crate::platform::ResourceLoader;

/// Loader for native targets. Fetches `http(s)` urls with `reqwest` and reads `file://` urls
/// and plain paths from the local file system.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    http_client: reqwest::Client,
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::with_user_agent(&format!("geoview/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl HttpLoader {
    /// Creates a loader that sends the given user agent with every request.
    pub fn with_user_agent(user_agent: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self { http_client }
    }

    async fn load_from_web(&self, url: &str) -> Result<Bytes, GeoViewError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|err| GeoViewError::network(url, err))?;

        if !response.status().is_success() {
            info!("Failed to load {url}: {}", response.status());
            return Err(GeoViewError::network(url, response.status()));
        }

        response
            .bytes()
            .await
            .map_err(|err| GeoViewError::network(url, err))
    }

    async fn load_from_file(&self, url: &str, path: &str) -> Result<Bytes, GeoViewError> {
        debug!("Reading {path} from the file system");
        tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|err| GeoViewError::network(url, err))
    }
}

#[async_trait]
impl ResourceLoader for HttpLoader {
    async fn load_bytes(&self, url: &str) -> Result<Bytes, GeoViewError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.load_from_web(url).await
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            self.load_from_file(url, path).await
        }
    }
}
