// src/lib.rs
// =============================================================================
// link-crawler: a concurrent, queue-driven website crawler.
//
// Give it a seed URL and it follows links, fetching up to N pages at once,
// never fetching the same page twice, and stopping at a depth or page-count
// limit if you set one. What happens to each page is up to the observer you
// plug in.
//
// Quick tour:
//   let fetcher = Arc::new(ReqwestFetcher::new()?);
//   let results = Crawler::new(fetcher, CrawlReport::new(), CrawlerConfig::default())?
//       .with_policy(SameHost::new(&Address::parse(seed)))
//       .start_crawling(seed)
//       .await?;
//
// Modules:
// - address: the URL value type used everywhere
// - crawl: queue, policies, observer trait, depth tracking, the Crawler itself
// - fetch: HTTP fetching, link extraction, headless rendering
// - report: an observer that classifies each page (OK, BROKEN, ...)
// - error: error types
// - logging: tracing setup for the binary
// =============================================================================

pub mod address;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod report;

pub use address::Address;
pub use crawl::{
    AcceptAll, CrawlObserver, CrawlPolicy, CrawlQueue, Crawler, CrawlerConfig, DepthIndex, EntryId,
    InMemoryCrawlQueue, IncludeSubdomains, QueueEntry, SameHost,
};
pub use error::{ConfigError, CrawlError, FailureKind, FetchError, RenderError};
pub use fetch::{ChromeRenderer, FetchResponse, Fetcher, HtmlLinkExtractor, LinkExtractor, ReqwestFetcher, ScriptRenderer};
pub use report::{CrawlReport, PageResult, PageStatus};
