//! HTTP fetcher implementation
//!
//! This module handles the network side of the crawler:
//! - Building the shared HTTP client with a proper user agent string
//! - The `BlobFetcher` capability used for binary assets
//! - Streaming asset bodies without buffering them in memory
//! - Error classification for log messages

use crate::config::UserAgentConfig;
use crate::url::CanonicalUrl;
use crate::FetchError;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};
use reqwest::{redirect::Policy, Client};
use std::pin::Pin;
use std::time::Duration;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Body of a fetched asset, chunk by chunk
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, FetchError>> + Send>>;

/// Fetches raw bytes for binary assets
///
/// Implementations only report what the server sent; deciding where the
/// bytes go and whether to fetch at all is up to the asset downloader.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    /// Starts fetching `url`, returning its body as a stream
    async fn fetch(&self, url: &CanonicalUrl) -> Result<ByteStream, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `request_timeout` - Upper bound for a whole request, body included
///
/// # Example
///
/// ```no_run
/// use site_archiver::config::UserAgentConfig;
/// use site_archiver::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    request_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Describes a transport error for log output
pub(crate) fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    }
}

/// `BlobFetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpBlobFetcher {
    client: Client,
}

impl HttpBlobFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobFetcher for HttpBlobFetcher {
    async fn fetch(&self, url: &CanonicalUrl) -> Result<ByteStream, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: describe_error(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let url = url.to_string();
        let body: ByteStream = Box::pin(response.bytes_stream().map(move |chunk| {
            chunk.map_err(|e| FetchError::Stream {
                url: url.clone(),
                message: describe_error(&e),
            })
        }));

        Ok(body)
    }
}
