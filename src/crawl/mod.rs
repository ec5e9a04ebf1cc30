// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Submodules:
// - entry: QueueEntry, one admitted address plus where it was found
// - queue: the deduplicating crawl queue (trait + in-memory version)
// - policy: which addresses are allowed in at all
// - observer: callbacks that report what the crawler is doing
// - depth: link-hop distance of every address from the seed
// - crawler: the orchestrator that ties it all together
//
// Features:
// - Concurrent fetching with a configurable limit
// - Depth and total-count limits
// - Same-host / subdomain / custom scoping
// =============================================================================

mod crawler;
mod depth;
mod entry;
mod observer;
mod policy;
mod queue;

pub use crawler::{Crawler, CrawlerConfig, DEFAULT_CONCURRENCY, DEFAULT_FAILURE_BACKOFF_MS};
pub use depth::DepthIndex;
pub use entry::{EntryId, QueueEntry};
pub use observer::CrawlObserver;
pub use policy::{AcceptAll, CrawlPolicy, IncludeSubdomains, SameHost};
pub use queue::{CrawlQueue, InMemoryCrawlQueue};
