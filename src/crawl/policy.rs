// src/crawl/policy.rs
// =============================================================================
// Crawl policies decide which addresses are ever allowed into the queue.
//
// Built-in policies:
// - AcceptAll: anything with a crawlable scheme
// - SameHost: only the seed's host (stays on one website)
// - IncludeSubdomains: the seed's host and any subdomain of it
//
// Any closure `Fn(&Address) -> bool` works as a custom policy too.
// =============================================================================

use crate::address::Address;

pub trait CrawlPolicy: Send + Sync {
    fn should_crawl(&self, address: &Address) -> bool;

    /// Whether links are still extracted from pages whose host differs from
    /// the seed host. Only subdomain-aware policies say yes.
    fn includes_subdomains(&self) -> bool {
        false
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl CrawlPolicy for AcceptAll {
    fn should_crawl(&self, _address: &Address) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct SameHost {
    host: Option<String>,
}

impl SameHost {
    pub fn new(seed: &Address) -> Self {
        Self {
            host: seed.host().map(str::to_ascii_lowercase),
        }
    }
}

impl CrawlPolicy for SameHost {
    fn should_crawl(&self, address: &Address) -> bool {
        match (&self.host, address.host()) {
            (Some(seed), Some(host)) => host.eq_ignore_ascii_case(seed),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IncludeSubdomains {
    host: Option<String>,
}

impl IncludeSubdomains {
    pub fn new(seed: &Address) -> Self {
        Self {
            host: seed.host().map(str::to_ascii_lowercase),
        }
    }

    fn is_subdomain(host: &str, seed: &str) -> bool {
        host.len() > seed.len()
            && host.ends_with(seed)
            && host.as_bytes()[host.len() - seed.len() - 1] == b'.'
    }
}

impl CrawlPolicy for IncludeSubdomains {
    fn should_crawl(&self, address: &Address) -> bool {
        match (&self.host, address.host()) {
            (Some(seed), Some(host)) => {
                let host = host.to_ascii_lowercase();
                host == *seed || Self::is_subdomain(&host, seed)
            }
            _ => false,
        }
    }

    fn includes_subdomains(&self) -> bool {
        true
    }
}

impl<F> CrawlPolicy for F
where
    F: Fn(&Address) -> bool + Send + Sync,
{
    fn should_crawl(&self, address: &Address) -> bool {
        self(address)
    }
}
