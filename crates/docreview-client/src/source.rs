//! Where review resources are read from
//!
//! A base location is either an `http(s)://` URL or a local directory. Each
//! resource is a plain-text file addressed by name relative to that base.

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::FetchError;

#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetch one named resource as text
    async fn fetch_text(&self, name: &str) -> Result<String, FetchError>;

    /// Human-readable base location, for logs and status lines
    fn describe(&self) -> String;
}

/// Resources served over HTTP
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(location: &str, timeout: Duration) -> Result<Self, FetchError> {
        // Url::join drops the last path segment unless the base ends in '/'
        let normalized = if location.ends_with('/') {
            location.to_string()
        } else {
            format!("{}/", location)
        };
        let base = Url::parse(&normalized)
            .map_err(|_| FetchError::InvalidLocation(location.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Ok(Self { client, base })
    }

    fn resource_url(&self, name: &str) -> Result<Url, FetchError> {
        self.base
            .join(name)
            .map_err(|_| FetchError::InvalidLocation(format!("{}{}", self.base, name)))
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch_text(&self, name: &str) -> Result<String, FetchError> {
        let url = self.resource_url(name)?;
        tracing::debug!(%url, "fetching resource");

        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                resource: name.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource: name.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            resource: name.to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Resources read from a local directory
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResourceSource for DirSource {
    async fn fetch_text(&self, name: &str) -> Result<String, FetchError> {
        let path = self.root.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::Missing {
                resource: name.to_string(),
            }),
            Err(source) => Err(FetchError::Io {
                resource: name.to_string(),
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Pick a source for a configured location
pub fn source_from_location(
    location: &str,
    timeout: Duration,
) -> Result<Arc<dyn ResourceSource>, FetchError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(location, timeout)?))
    } else if location.trim().is_empty() {
        Err(FetchError::InvalidLocation(location.to_string()))
    } else {
        Ok(Arc::new(DirSource::new(location)))
    }
}
