// src/report.rs
// =============================================================================
// A ready-made observer that classifies every crawled page.
//
// Each page ends up as a PageResult with one of these statuses:
// - Ok (2xx), Redirect (3xx, with its target), Broken (404/410)
// - Timeout, SslError, DnsError (no response at all)
// - Error (any other failure or status code)
//
// The CLI prints these as a table or as JSON.
// =============================================================================

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::address::Address;
use crate::crawl::CrawlObserver;
use crate::error::{FailureKind, FetchError};
use crate::fetch::FetchResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "target", rename_all = "snake_case")]
pub enum PageStatus {
    /// Page is working (2xx)
    Ok,
    /// Page redirects elsewhere (3xx); holds the Location target
    Redirect(String),
    /// Page is gone (404, 410)
    Broken,
    Timeout,
    SslError,
    DnsError,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_on: Option<String>,
    #[serde(flatten)]
    pub status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PageResult {
    /// Ok and Redirect both count as healthy.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, PageStatus::Ok | PageStatus::Redirect(_))
    }

    fn new(address: &Address, discovered_on: Option<&Address>, status: PageStatus, message: String) -> Self {
        Self {
            url: address.to_string(),
            found_on: discovered_on.map(|a| a.to_string()),
            status,
            message: Some(message),
        }
    }
}

/// Collects a PageResult for every page, in completion order.
#[derive(Debug, Default)]
pub struct CrawlReport {
    results: Vec<PageResult>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CrawlObserver for CrawlReport {
    type Output = Vec<PageResult>;

    fn will_crawl(&mut self, address: &Address) {
        info!(url = %address, "crawling");
    }

    fn has_been_crawled(
        &mut self,
        address: &Address,
        outcome: Result<&FetchResponse, &FetchError>,
        discovered_on: Option<&Address>,
    ) {
        let (status, message) = match outcome {
            Ok(response) => analyze_response(response),
            Err(error) => analyze_error(error),
        };
        self.results
            .push(PageResult::new(address, discovered_on, status, message));
    }

    fn finished(self) -> Vec<PageResult> {
        self.results
    }
}

// HTTP status codes:
// - 200-299: Success
// - 300-399: Redirect
// - 400-499: Client error (404 not found, etc.)
// - 500-599: Server error
pub fn analyze_response(response: &FetchResponse) -> (PageStatus, String) {
    let status_code = response.status;

    if status_code.is_success() {
        (PageStatus::Ok, format!("HTTP {}", status_code.as_u16()))
    } else if status_code.is_redirection() {
        let target = response.location().unwrap_or("unknown").to_string();
        let message = format!("HTTP {} -> {}", status_code.as_u16(), target);
        (PageStatus::Redirect(target), message)
    } else if matches!(status_code, StatusCode::NOT_FOUND | StatusCode::GONE) {
        (PageStatus::Broken, format!("HTTP {}", status_code.as_u16()))
    } else {
        (PageStatus::Error, format!("HTTP {}", status_code.as_u16()))
    }
}

pub fn analyze_error(error: &FetchError) -> (PageStatus, String) {
    match error {
        FetchError::Status { response } => analyze_response(response),
        FetchError::NoResponse { kind, message } => {
            let status = match kind {
                FailureKind::Timeout => PageStatus::Timeout,
                FailureKind::Dns => PageStatus::DnsError,
                FailureKind::Tls => PageStatus::SslError,
                FailureKind::Connect | FailureKind::Other => PageStatus::Error,
            };
            (status, message.clone())
        }
        FetchError::Body { .. } => (PageStatus::Error, error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, LOCATION};

    fn response(status: StatusCode) -> FetchResponse {
        FetchResponse::new("http://a.test/", status, HeaderMap::new(), "")
    }

    #[test]
    fn test_page_result_is_ok() {
        let ok = PageResult {
            url: "https://example.com".to_string(),
            found_on: None,
            status: PageStatus::Ok,
            message: None,
        };
        assert!(ok.is_ok());

        let broken = PageResult {
            status: PageStatus::Broken,
            ..ok.clone()
        };
        assert!(!broken.is_ok());
    }

    #[test]
    fn test_classify_statuses() {
        assert_eq!(analyze_response(&response(StatusCode::OK)).0, PageStatus::Ok);
        assert_eq!(analyze_response(&response(StatusCode::GONE)).0, PageStatus::Broken);
        assert_eq!(
            analyze_response(&response(StatusCode::INTERNAL_SERVER_ERROR)).0,
            PageStatus::Error
        );

        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("https://a.test/new"));
        let moved = FetchResponse::new("http://a.test/", StatusCode::FOUND, headers, "");
        let (status, message) = analyze_response(&moved);
        assert_eq!(status, PageStatus::Redirect("https://a.test/new".to_string()));
        assert_eq!(message, "HTTP 302 -> https://a.test/new");
    }

    #[test]
    fn test_classify_errors() {
        let timeout = FetchError::NoResponse {
            kind: FailureKind::Timeout,
            message: "operation timed out".to_string(),
        };
        assert_eq!(analyze_error(&timeout).0, PageStatus::Timeout);

        let not_found = FetchError::Status {
            response: Box::new(response(StatusCode::NOT_FOUND)),
        };
        assert_eq!(analyze_error(&not_found), (PageStatus::Broken, "HTTP 404".to_string()));

        let truncated = FetchError::Body {
            url: "http://a.test/".to_string(),
            status: StatusCode::OK,
            message: "connection closed".to_string(),
        };
        let (status, message) = analyze_error(&truncated);
        assert_eq!(status, PageStatus::Error);
        assert!(message.starts_with("HTTP 200 OK"));
    }

    #[test]
    fn test_report_collects_results() {
        let mut report = CrawlReport::new();
        let seed = Address::parse("http://a.test/");
        let page = Address::parse("http://a.test/b");

        report.will_crawl(&seed);
        report.has_been_crawled(&seed, Ok(&response(StatusCode::OK)), None);
        let error = FetchError::NoResponse {
            kind: FailureKind::Dns,
            message: "dns error".to_string(),
        };
        report.has_been_crawled(&page, Err(&error), Some(&seed));

        let results = report.finished();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].status, PageStatus::DnsError);
        assert_eq!(results[1].found_on.as_deref(), Some("http://a.test/"));
    }

    #[test]
    fn test_json_shape() {
        let result = PageResult {
            url: "http://a.test/old".to_string(),
            found_on: None,
            status: PageStatus::Redirect("http://a.test/new".to_string()),
            message: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "redirect");
        assert_eq!(json["target"], "http://a.test/new");
        assert!(json.get("found_on").is_none());
    }
}
