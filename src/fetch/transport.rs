// src/fetch/transport.rs
// =============================================================================
// This module downloads resources from the site being mirrored.
//
// The engine only knows about the Transport trait, so tests can hand it an
// in-memory site instead of a real server. HttpTransport is the real thing:
// a reqwest Client plus the site's base URL.
//
// Error categorisation follows what reqwest can tell us:
// - non-2xx status -> TransportError::Status
// - timeout        -> TransportError::Timeout
// - connect error  -> TransportError::Connect
// - anything else  -> TransportError::Request
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::TransportError;
use crate::links::RemotePath;

// Something that can GET a resource by its path on the site
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_text(&self, path: &RemotePath) -> Result<String, TransportError>;
    async fn get_bytes(&self, path: &RemotePath) -> Result<Vec<u8>, TransportError>;
}

pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    // Builds a transport for `base_url` with a per-request timeout
    //
    // Connection pooling comes for free: every worker shares this Client.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", base_url, e))?;
        // "http://host/site" must keep "site" when paths are joined onto it
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }

        let client = Client::builder()
            .user_agent(concat!("site-mirror/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, base })
    }

    // Remote paths are relative to the base URL, not to the host root
    fn url_for(&self, path: &RemotePath) -> Result<Url, TransportError> {
        self.base
            .join(path.as_str().trim_start_matches('/'))
            .map_err(|e| TransportError::Request(e.to_string()))
    }

    async fn get(&self, path: &RemotePath) -> Result<reqwest::Response, TransportError> {
        let url = self.url_for(path)?;
        tracing::debug!(%url, "GET");

        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, path: &RemotePath) -> Result<String, TransportError> {
        self.get(path).await?.text().await.map_err(categorize_error)
    }

    async fn get_bytes(&self, path: &RemotePath) -> Result<Vec<u8>, TransportError> {
        let bytes = self.get(path).await?.bytes().await.map_err(categorize_error)?;
        Ok(bytes.to_vec())
    }
}

// Turns a reqwest error into one of our categories
fn categorize_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else if let Some(status) = error.status() {
        TransportError::Status {
            status: status.as_u16(),
        }
    } else {
        TransportError::Request(error.to_string())
    }
}
