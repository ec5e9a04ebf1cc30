// src/crawl/observer.rs
// =============================================================================
// The observer is how callers see what the crawler does.
//
// Lifecycle:
//   will_crawl        -> right before an address is fetched
//   has_been_crawled  -> once its fetch has succeeded or failed
//   finished          -> once, after the queue is empty for good
//
// Whatever finished() returns is what start_crawling() returns.
// =============================================================================

use crate::address::Address;
use crate::error::FetchError;
use crate::fetch::FetchResponse;

pub trait CrawlObserver {
    type Output;

    fn will_crawl(&mut self, _address: &Address) {}

    /// `outcome` is the fetched response, or the error. A FetchError for an
    /// error status still carries the response via `FetchError::response()`.
    fn has_been_crawled(
        &mut self,
        address: &Address,
        outcome: Result<&FetchResponse, &FetchError>,
        discovered_on: Option<&Address>,
    );

    /// Takes `self`, so it can only ever run once.
    fn finished(self) -> Self::Output;
}
