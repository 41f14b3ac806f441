//! HTTP client abstraction for fetching the announcement thumbnail.
//!
//! The notifier only needs a plain GET that reports the status code instead
//! of failing on it, so a non-200 thumbnail can be logged and the post
//! dropped. The trait keeps the notifier testable without a network; the
//! default implementation wraps reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// A generic trait for fetching remote resources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Transport failures are errors; HTTP error statuses are not.
    async fn get(&self, url: &str) -> Result<HttpResponse, Error>;
}

#[derive(Clone, Default)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
