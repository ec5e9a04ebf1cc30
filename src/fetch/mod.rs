// src/fetch/mod.rs
// =============================================================================
// The crawler's collaborators: everything that talks to the outside world.
//
// Submodules:
// - http: fetching pages (Fetcher trait + reqwest implementation)
// - html: pulling anchor targets out of a page
// - render: running a page's scripts in a headless browser
//
// The crawl engine only sees the traits, so tests can swap in fakes.
// =============================================================================

mod html;
mod http;
mod render;

pub use html::{extract_html_links, HtmlLinkExtractor, LinkExtractor};
pub use http::{FetchResponse, Fetcher, ReqwestFetcher};
pub use render::{ChromeRenderer, ScriptRenderer};
