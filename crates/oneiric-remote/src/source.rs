// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Where a manifest's bytes and detached signature come from (§4.7 step 1):
//! an HTTP URL or a local path. Both fetch the envelope and a sibling
//! `.sig` file — the signature is detached, never embedded in the envelope
//! bytes being signed.

use async_trait::async_trait;
use oneiric_core::OneiricError;
use std::time::Duration;

/// Fetch timeout (§5: "remote `fetch` 10s").
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct FetchedManifest {
    pub envelope_bytes: Vec<u8>,
    pub signature_bytes: Vec<u8>,
}

#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self) -> Result<FetchedManifest, OneiricError>;

    /// A stable identifier for this source, used to scope `source=remote`
    /// retirement (§4.7 step 6) to only this source's own prior entries.
    fn name(&self) -> &str;
}

pub struct HttpManifestSource {
    client: reqwest::Client,
    url: String,
    name: String,
}

impl HttpManifestSource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self { client: reqwest::Client::new(), name: url.clone(), url }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self) -> Result<FetchedManifest, OneiricError> {
        let envelope_bytes = fetch_http(&self.client, &self.url).await?;
        let signature_bytes = fetch_http(&self.client, &format!("{}.sig", self.url)).await?;
        Ok(FetchedManifest { envelope_bytes, signature_bytes })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

async fn fetch_http(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, OneiricError> {
    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(url).send())
        .await
        .map_err(|_| OneiricError::RemoteFetch(format!("fetching {url} timed out")))?
        .map_err(|error| OneiricError::RemoteFetch(format!("fetching {url} failed: {error}")))?;
    let bytes = response.bytes().await.map_err(|error| OneiricError::RemoteFetch(format!("reading {url} body failed: {error}")))?;
    Ok(bytes.to_vec())
}

pub struct LocalManifestSource {
    path: std::path::PathBuf,
    name: String,
}

impl LocalManifestSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl ManifestSource for LocalManifestSource {
    async fn fetch(&self) -> Result<FetchedManifest, OneiricError> {
        let envelope_bytes = tokio::fs::read(&self.path).await.map_err(OneiricError::Io)?;
        let sig_path = self.path.with_extension(
            self.path.extension().map(|ext| format!("{}.sig", ext.to_string_lossy())).unwrap_or_else(|| "sig".to_string()),
        );
        let signature_bytes = tokio::fs::read(&sig_path).await.map_err(OneiricError::Io)?;
        Ok(FetchedManifest { envelope_bytes, signature_bytes })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
