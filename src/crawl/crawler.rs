// src/crawl/crawler.rs
// =============================================================================
// This module drives a crawl.
//
// How it works:
// 1. Parse the seed and put it in the queue at depth 0
// 2. Run a "wave": pull pending entries from the queue and fetch them,
//    keeping at most `concurrency` fetches in flight
// 3. Whenever a fetch finishes, report it to the observer, extract the
//    page's links and admit the new ones to the same queue. With
//    execute_scripts the page is rendered inside the same in-flight future,
//    so a slow browser only holds up its own slot
// 4. The wave keeps pulling, so entries admitted mid-wave are fetched in
//    the same wave. It ends when nothing is pending and nothing is in flight
// 5. Start another wave while the queue still has pending entries
// 6. Hand back whatever the observer's finished() returns
//
// Admission rules for a discovered link, in order:
// - scheme must be http, https or absent
// - fragment is dropped
// - must have a host
// - the policy must accept it
// - it must not already be in the queue
// - its depth must not exceed maximum_depth
// - fewer than maximum_crawl_count entries may have been admitted so far
//
// Rust concepts:
// - FuturesUnordered: a set of futures that yields each one as it finishes
// - Arc<dyn Trait>: shared ownership of a trait object across futures
// - Generics: the observer type decides what start_crawling() returns
// =============================================================================

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::crawl::depth::DepthIndex;
use crate::crawl::entry::{EntryId, QueueEntry};
use crate::crawl::observer::CrawlObserver;
use crate::crawl::policy::{AcceptAll, CrawlPolicy};
use crate::crawl::queue::{CrawlQueue, InMemoryCrawlQueue};
use crate::error::{ConfigError, CrawlError, FetchError};
use crate::fetch::{FetchResponse, Fetcher, HtmlLinkExtractor, LinkExtractor, ScriptRenderer};

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_FAILURE_BACKOFF_MS: u64 = 100;

/// Tunables for a crawl. Policy, queue and observer are passed separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight at once
    pub concurrency: usize,
    /// Stop admitting new addresses once this many have been admitted
    pub maximum_crawl_count: Option<usize>,
    /// Deepest link-hop distance from the seed that may be admitted
    pub maximum_depth: Option<usize>,
    /// Extract links from the page as rendered by a headless browser
    pub execute_scripts: bool,
    /// Pause after a failed fetch before dispatching more work
    pub failure_backoff_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            maximum_crawl_count: None,
            maximum_depth: None,
            execute_scripts: false,
            failure_backoff_ms: DEFAULT_FAILURE_BACKOFF_MS,
        }
    }
}

impl CrawlerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }
        Ok(())
    }

    pub fn failure_backoff(&self) -> Duration {
        Duration::from_millis(self.failure_backoff_ms)
    }
}

// Bookkeeping that only exists while start_crawling() runs
struct CrawlState {
    seed: Address,
    depths: DepthIndex,
    crawled_count: usize,
}

impl CrawlState {
    fn new(seed: Address) -> Self {
        Self {
            seed,
            depths: DepthIndex::new(),
            crawled_count: 0,
        }
    }
}

pub struct Crawler<O: CrawlObserver> {
    config: CrawlerConfig,
    fetcher: Arc<dyn Fetcher>,
    observer: O,
    policy: Box<dyn CrawlPolicy>,
    queue: Arc<dyn CrawlQueue>,
    link_extractor: Box<dyn LinkExtractor>,
    renderer: Option<Arc<dyn ScriptRenderer>>,
}

impl<O: CrawlObserver> Crawler<O> {
    /// Builds a crawler with the default policy (accept everything), an
    /// in-memory queue and the scraper-based link extractor.
    pub fn new(fetcher: Arc<dyn Fetcher>, observer: O, config: CrawlerConfig) -> Result<Self, CrawlError> {
        config.validate()?;

        Ok(Self {
            config,
            fetcher,
            observer,
            policy: Box::new(AcceptAll),
            queue: Arc::new(InMemoryCrawlQueue::new()),
            link_extractor: Box::new(HtmlLinkExtractor),
            renderer: None,
        })
    }

    pub fn with_policy(mut self, policy: impl CrawlPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Crawl into a caller-provided queue. Keep a clone of the Arc to inspect
    /// the queue after the crawl.
    pub fn with_queue(mut self, queue: Arc<dyn CrawlQueue>) -> Self {
        self.queue = queue;
        self
    }

    pub fn with_link_extractor(mut self, link_extractor: impl LinkExtractor + 'static) -> Self {
        self.link_extractor = Box::new(link_extractor);
        self
    }

    pub fn with_renderer(mut self, renderer: impl ScriptRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls everything reachable from `seed` and returns the observer's
    /// result.
    ///
    /// Errors only for problems found before the first fetch: a seed that is
    /// not an absolute http(s) address, or scripts enabled without a
    /// renderer. Failed pages are reported to the observer, never returned.
    pub async fn start_crawling(mut self, seed: &str) -> Result<O::Output, CrawlError> {
        if self.config.execute_scripts && self.renderer.is_none() {
            return Err(CrawlError::MissingRenderer);
        }

        let seed_address = Address::parse(seed);
        if seed_address.is_relative() || seed_address.is_schemeless() || !seed_address.has_crawlable_scheme() {
            return Err(CrawlError::InvalidSeed(seed.to_string()));
        }

        info!(
            seed = %seed_address,
            concurrency = self.config.concurrency,
            maximum_depth = ?self.config.maximum_depth,
            maximum_crawl_count = ?self.config.maximum_crawl_count,
            "starting crawl"
        );

        let mut state = CrawlState::new(seed_address.clone());
        state.depths.record_seed(&seed_address);
        self.admit(&mut state, seed_address, None);

        let mut waves = 0usize;
        while self.queue.has_pending() {
            waves += 1;
            debug!(wave = waves, "starting wave");
            self.run_wave(&mut state).await;
        }

        info!(admitted = state.crawled_count, waves, "crawl finished");

        Ok(self.observer.finished())
    }

    async fn run_wave(&mut self, state: &mut CrawlState) {
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < self.config.concurrency {
                let Some(entry) = self.next_dispatchable() else {
                    break;
                };

                self.observer.will_crawl(&entry.address);
                self.queue.mark_processed(&entry);

                debug!(id = %entry.id, url = %entry.address, "dispatching fetch");

                let fetcher = Arc::clone(&self.fetcher);
                let renderer = self.renderer_for(&entry.address, &state.seed);
                let QueueEntry { id, address, .. } = entry;
                in_flight.push(async move {
                    let outcome = fetcher.fetch(&address).await;
                    let rendered = match (&outcome, renderer) {
                        (Ok(_), Some(renderer)) => render_for_links(renderer.as_ref(), &address).await,
                        _ => None,
                    };
                    (id, outcome, rendered)
                });
            }

            // None here means nothing is in flight and nothing was dispatchable
            match in_flight.next().await {
                Some((id, outcome, rendered)) => self.handle_completion(state, id, outcome, rendered).await,
                None => break,
            }
        }
    }

    // Pulls entries until one may be fetched. Entries the policy rejects (or
    // that were somehow processed already) are marked processed so
    // next_pending() moves past them.
    fn next_dispatchable(&self) -> Option<QueueEntry> {
        while let Some(entry) = self.queue.next_pending() {
            if self.queue.is_processed(&entry) || !self.policy.should_crawl(&entry.address) {
                debug!(url = %entry.address, "skipping queued address");
                self.queue.mark_processed(&entry);
                continue;
            }
            return Some(entry);
        }
        None
    }

    async fn handle_completion(
        &mut self,
        state: &mut CrawlState,
        id: EntryId,
        outcome: Result<FetchResponse, FetchError>,
        rendered: Option<String>,
    ) {
        let Some(entry) = self.queue.by_id(id) else {
            warn!(%id, "finished fetch has no queue entry");
            return;
        };

        match outcome {
            Ok(response) => {
                debug!(url = %entry.address, status = %response.status, "fetched");
                self.observer
                    .has_been_crawled(&entry.address, Ok(&response), entry.discovered_on.as_ref());

                if !self.follows_links_on(&entry.address, &state.seed) {
                    return;
                }

                let html = rendered.unwrap_or(response.body);
                self.admit_links(state, &entry, &html);
            }
            Err(error) => {
                warn!(url = %entry.address, %error, "fetch failed");
                self.observer
                    .has_been_crawled(&entry.address, Err(&error), entry.discovered_on.as_ref());

                tokio::time::sleep(self.config.failure_backoff()).await;
            }
        }
    }

    // Links are only taken from the seed's host unless the policy spans
    // subdomains.
    fn follows_links_on(&self, address: &Address, seed: &Address) -> bool {
        self.policy.includes_subdomains() || address.host() == seed.host()
    }

    // The renderer to run after fetching `address`, if its links will be used
    fn renderer_for(&self, address: &Address, seed: &Address) -> Option<Arc<dyn ScriptRenderer>> {
        if !self.config.execute_scripts || !self.follows_links_on(address, seed) {
            return None;
        }
        self.renderer.as_ref().map(Arc::clone)
    }

    fn admit_links(&self, state: &mut CrawlState, found_on: &QueueEntry, html: &str) {
        let parent_depth = state.depths.depth_of(&found_on.address).unwrap_or(0);

        for link in self.link_extractor.extract_links(html, found_on.address.render()) {
            let candidate = Address::parse(&link);
            if !candidate.has_crawlable_scheme() {
                continue;
            }

            let address = candidate.without_fragment();
            if address.is_relative() {
                debug!(link = %link, "dropping link without a host");
                continue;
            }

            if !self.policy.should_crawl(&address) || self.queue.has(&address) {
                continue;
            }

            let depth = state.depths.record(&address, parent_depth);
            if self.config.maximum_depth.is_some_and(|max| depth > max) {
                debug!(url = %address, depth, "too deep, not admitted");
                continue;
            }

            if self.crawl_limit_reached(state) {
                debug!(url = %address, "crawl count limit reached, not admitted");
                continue;
            }

            self.admit(state, address, Some(found_on.address.clone()));
        }
    }

    fn crawl_limit_reached(&self, state: &CrawlState) -> bool {
        self.config
            .maximum_crawl_count
            .is_some_and(|max| state.crawled_count >= max)
    }

    fn admit(&self, state: &mut CrawlState, address: Address, discovered_on: Option<Address>) -> bool {
        let entry = QueueEntry::new(self.queue.next_id(), address, discovered_on);
        let admitted = self.queue.add(entry);
        if admitted {
            state.crawled_count += 1;
        }
        admitted
    }
}

// The observer always gets the fetched body; only link extraction uses the
// rendered one. None means "use the fetched body".
async fn render_for_links(renderer: &dyn ScriptRenderer, address: &Address) -> Option<String> {
    match renderer.render(address).await {
        Ok(rendered) => Some(rendered),
        Err(error) => {
            warn!(url = %address, %error, "script rendering failed, using fetched body");
            None
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why FuturesUnordered instead of buffer_unordered()?
//    - buffer_unordered() needs the whole list of URLs up front
//    - Here the list grows while we crawl: every finished page can add more
//    - FuturesUnordered lets us push a new fetch whenever a slot is free
//
// 2. Why does start_crawling() take `self` and not `&mut self`?
//    - The observer's finished() consumes the observer
//    - Consuming the crawler makes "finished runs exactly once" a compile-time
//      guarantee instead of a runtime flag
//
// 3. Why are the fetcher and renderer Arcs but the policy a Box?
//    - Each in-flight future needs its own handle to the fetcher (and the
//      renderer) and may outlive the current borrow of `self`; Arc::clone
//      gives it one
//    - The policy is only used inline, so a Box is enough
//
// 4. What is `let Some(x) = ... else { ... };`?
//    - "let-else": bind x if the pattern matches, otherwise run the else
//      block, which must leave the function or loop (return/break/continue)
// -----------------------------------------------------------------------------
