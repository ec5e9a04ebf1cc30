// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - The Fetcher trait: what the crawler needs from an HTTP client
// - ReqwestFetcher: the default implementation on top of reqwest
// - Redirects are NOT followed: a 301/302 is a final answer for that address
// - 4xx/5xx responses and connection failures become a FetchError
//
// Rust concepts:
// - async-trait: async methods in traits (so tests can plug in a fake)
// - Result<T, E>: success carries the response, failure carries the reason
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{redirect, Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::address::Address;
use crate::error::{CrawlError, FailureKind, FetchError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A fetched page.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL the response came from
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchResponse {
    pub fn new(url: impl Into<String>, status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body: body.into(),
        }
    }

    /// Target of a 3xx response, if the server sent one.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// Anything that can GET an address.
///
/// Implementations must cope with many `fetch` calls in flight at once; the
/// crawler runs up to its configured concurrency simultaneously.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &Address) -> Result<FetchResponse, FetchError>;
}

/// Default fetcher backed by a single pooled reqwest Client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Builds a fetcher with crawl-friendly defaults: 10 second timeouts,
    /// no redirect following, and a cookie jar shared by every request.
    pub fn new() -> Result<Self, CrawlError> {
        let client = client_builder().build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client. The caller is responsible for its settings.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Posts a login form first, then keeps the session cookies for the crawl.
    ///
    /// Fails if the login request cannot be sent or the server answers with
    /// a 4xx/5xx status, so a broken login surfaces before any crawling starts.
    pub async fn logged_in(login_url: &str, form: &[(String, String)]) -> Result<Self, CrawlError> {
        let client = client_builder().build()?;

        let response = client.post(login_url).form(form).send().await?;
        let status = response.status();
        debug!(url = login_url, %status, "login form submitted");

        if status.is_client_error() || status.is_server_error() {
            return Err(CrawlError::Login {
                url: login_url.to_string(),
                status,
            });
        }

        Ok(Self { client })
    }
}

fn client_builder() -> ClientBuilder {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .redirect(redirect::Policy::none())
        .cookie_store(true)
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, address: &Address) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(address.render())
            .send()
            .await
            .map_err(categorize_error)?;

        let url = response.url().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|error| FetchError::Body {
            url: url.clone(),
            status,
            message: error.to_string(),
        })?;

        let response = FetchResponse::new(url, status, headers, body);

        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                response: Box::new(response),
            });
        }

        Ok(response)
    }
}

// Sorts reqwest errors into the few kinds the report cares about.
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Connection refused / reset
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string().to_lowercase();

    let kind = if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            FailureKind::Dns
        } else {
            FailureKind::Connect
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") || error_string.contains("tls") {
        FailureKind::Tls
    } else {
        FailureKind::Other
    };

    FetchError::NoResponse {
        kind,
        message: error.to_string(),
    }
}
