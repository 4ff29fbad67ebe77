//! Document fetching over HTTP.
//!
//! Remote decks are fetched directly first; when the server doesn't allow
//! that (CORS-style restrictions, blocked egress) and a relay proxy is
//! configured, the same document is requested once more through the
//! proxy.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::time::Duration;
use url::Url;

/// Timeout applied to each fetch attempt by default.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// How remote documents are downloaded.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    proxy_base: Option<Url>,
    timeout: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            proxy_base: None,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl FetchPolicy {
    /// Policy with no proxy and the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relay proxy endpoint used when direct fetches fail.
    pub fn with_proxy(mut self, proxy_base: Url) -> Self {
        self.proxy_base = Some(proxy_base);
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The proxied URL for a target, if a proxy is configured.
    ///
    /// The target rides along as a `url` query parameter.
    pub fn proxy_url(&self, target: &Url) -> Option<Url> {
        let mut proxy = self.proxy_base.clone()?;
        proxy.query_pairs_mut().append_pair("url", target.as_str());
        Some(proxy)
    }
}

/// Download a document, falling back to the relay proxy when configured.
pub async fn fetch_bytes(url: &Url, policy: &FetchPolicy) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(policy.timeout)
        .build()
        .map_err(|e| Error::Fetch(e.to_string()))?;

    let direct_err = match fetch_once(&client, url).await {
        Ok(bytes) => {
            debug!("fetched {} bytes from {}", bytes.len(), url);
            return Ok(bytes);
        }
        Err(e) => e,
    };

    let proxy = match policy.proxy_url(url) {
        Some(proxy) => proxy,
        None => return Err(Error::Fetch(direct_err)),
    };

    warn!(
        "direct fetch of {} failed ({}), retrying through proxy",
        url, direct_err
    );
    match fetch_once(&client, &proxy).await {
        Ok(bytes) => {
            debug!("fetched {} bytes via proxy", bytes.len());
            Ok(bytes)
        }
        Err(proxy_err) => Err(Error::Fetch(format!(
            "direct: {}; proxy: {}",
            direct_err, proxy_err
        ))),
    }
}

async fn fetch_once(
    client: &reqwest::Client,
    url: &Url,
) -> std::result::Result<Vec<u8>, String> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("server returned {}", status));
    }

    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}
