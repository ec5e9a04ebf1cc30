// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Only CrawlError is fatal, and every CrawlError is raised before the first
// page is fetched. Everything that goes wrong for a single page is a
// FetchError: it is handed to the observer and the crawl moves on.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets `?` convert one error type into another automatically
// =============================================================================

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::fetch::FetchResponse;

/// Why a request produced no response at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Dns,
    Tls,
    Connect,
    Other,
}

/// A failed fetch of a single page.
///
/// Connection problems and error status codes end up in the same type so the
/// crawler can treat them identically.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// No response was received.
    #[error("{message}")]
    NoResponse { kind: FailureKind, message: String },

    /// A response arrived with a 4xx or 5xx status.
    #[error("HTTP {}", .response.status)]
    Status { response: Box<FetchResponse> },

    /// The server answered, but reading the body failed part way.
    #[error("HTTP {status}, body could not be read: {message}")]
    Body {
        url: String,
        status: StatusCode,
        message: String,
    },
}

impl FetchError {
    /// The status code, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::NoResponse { .. } => None,
            FetchError::Status { response } => Some(response.status),
            FetchError::Body { status, .. } => Some(*status),
        }
    }

    /// The partial response, if the server answered at all.
    pub fn response(&self) -> Option<&FetchResponse> {
        match self {
            FetchError::NoResponse { .. } | FetchError::Body { .. } => None,
            FetchError::Status { response } => Some(response),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start the browser: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("browser exited with {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    #[error("rendered page is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("concurrency must be greater than 0, got {0}")]
    InvalidConcurrency(usize),
}

/// Fatal errors. None of these can happen once crawling has started.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid crawler configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("seed '{0}' is not an absolute http(s) address")]
    InvalidSeed(String),

    #[error("execute_scripts is enabled but no script renderer was provided")]
    MissingRenderer,

    #[error("login at {url} was refused with HTTP {status}")]
    Login { url: String, status: StatusCode },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
