// src/address.rs
// =============================================================================
// This module defines `Address`, the crawler's own representation of a URL.
//
// Why not just use url::Url everywhere?
// - Url refuses relative input like "/docs" or "//cdn.example.com/x"
// - The crawler has to look at whatever an href contains, good or bad
// - We want identity to ignore the fragment ("#section") completely
//
// So Address::parse never fails. Absolute input goes through url::Url;
// anything Url rejects is split by hand and missing parts stay None.
//
// Identity:
// - Every Address renders to a canonical string:
//     scheme://host[:port]/path[?query]
// - The port is left out when it is 80
// - Two addresses are equal exactly when their canonical strings are equal
//
// Rust concepts:
// - Immutable values: "setters" return a new Address instead of mutating
// - Trait impls (PartialEq, Hash, Display) driven by one cached string
// =============================================================================

use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// Port assumed when the input does not name one.
pub const DEFAULT_PORT: u16 = 80;

/// A parsed, comparable web address.
///
/// The canonical string is computed once when the value is built, so
/// comparing and hashing addresses never re-renders them.
#[derive(Debug, Clone)]
pub struct Address {
    scheme: Option<String>,
    host: Option<String>,
    port: u16,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
    rendered: String,
}

impl Address {
    /// Parses `input` as well as it can. Never fails.
    ///
    /// Examples:
    ///   "https://example.com/docs?page=2" -> every component present
    ///   "/docs"                           -> relative, path only
    ///   "//cdn.example.com/app.js"        -> schemeless, host + path
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        match Url::parse(input) {
            Ok(url) => Self::from_url(&url),
            Err(_) => Self::split_relative(input),
        }
    }

    fn from_url(url: &Url) -> Self {
        Self::assemble(
            Some(url.scheme().to_string()),
            url.host_str().map(str::to_string),
            url.port().unwrap_or(DEFAULT_PORT),
            url.path().to_string(),
            url.query().map(str::to_string),
            url.fragment().map(str::to_string),
        )
    }

    // Hand-rolled split for input that url::Url cannot parse on its own.
    // Order matters: the fragment is cut first, then the query, then the
    // authority of scheme-relative input ("//host:port/path").
    fn split_relative(input: &str) -> Self {
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (input, None),
        };

        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };

        let (host, port, path) = match rest.strip_prefix("//") {
            Some(authority_and_path) => {
                let (authority, path) = match authority_and_path.find('/') {
                    Some(index) => authority_and_path.split_at(index),
                    None => (authority_and_path, ""),
                };

                // Drop any "user:password@" prefix
                let authority = authority
                    .rsplit_once('@')
                    .map_or(authority, |(_, host)| host);

                let (host, port) = match authority.rsplit_once(':') {
                    Some((host, port)) => match port.parse::<u16>() {
                        Ok(port) => (host, port),
                        Err(_) => (authority, DEFAULT_PORT),
                    },
                    None => (authority, DEFAULT_PORT),
                };

                let host = (!host.is_empty()).then(|| host.to_ascii_lowercase());
                (host, port, path)
            }
            None => (None, DEFAULT_PORT, rest),
        };

        Self::assemble(None, host, port, path.to_string(), query, fragment)
    }

    fn assemble(
        scheme: Option<String>,
        host: Option<String>,
        port: u16,
        path: String,
        query: Option<String>,
        fragment: Option<String>,
    ) -> Self {
        let rendered = render_canonical(
            scheme.as_deref(),
            host.as_deref(),
            port,
            &path,
            query.as_deref(),
        );

        Self {
            scheme,
            host,
            port,
            path,
            query,
            fragment,
            rendered,
        }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// True when there is no host, e.g. "/docs" or "about.html".
    pub fn is_relative(&self) -> bool {
        self.host.is_none()
    }

    /// True when there is no scheme, e.g. "//cdn.example.com/app.js".
    pub fn is_schemeless(&self) -> bool {
        self.scheme.is_none()
    }

    /// Only http, https and scheme-less addresses can be crawled.
    /// This is what filters out "javascript:", "mailto:", "tel:" and friends.
    pub fn has_crawlable_scheme(&self) -> bool {
        matches!(self.scheme.as_deref(), None | Some("http") | Some("https"))
    }

    /// Returns a copy without the fragment.
    ///
    /// Anything after a '#' that ended up inside the path is dropped too.
    pub fn without_fragment(&self) -> Self {
        let path = self
            .path
            .split('#')
            .next()
            .unwrap_or_default()
            .to_string();

        Self::assemble(
            self.scheme.clone(),
            self.host.clone(),
            self.port,
            path,
            self.query.clone(),
            None,
        )
    }

    pub fn with_scheme(&self, scheme: impl Into<String>) -> Self {
        Self::assemble(
            Some(scheme.into()),
            self.host.clone(),
            self.port,
            self.path.clone(),
            self.query.clone(),
            self.fragment.clone(),
        )
    }

    pub fn with_host(&self, host: impl Into<String>) -> Self {
        Self::assemble(
            self.scheme.clone(),
            Some(host.into()),
            self.port,
            self.path.clone(),
            self.query.clone(),
            self.fragment.clone(),
        )
    }

    pub fn with_port(&self, port: u16) -> Self {
        Self::assemble(
            self.scheme.clone(),
            self.host.clone(),
            port,
            self.path.clone(),
            self.query.clone(),
            self.fragment.clone(),
        )
    }

    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self::assemble(
            self.scheme.clone(),
            self.host.clone(),
            self.port,
            path.into(),
            self.query.clone(),
            self.fragment.clone(),
        )
    }

    /// Non-empty path segments: "/docs/guide/" -> ["docs", "guide"]
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// One path segment, counting from 1.
    pub fn segment(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.segments().get(i).copied())
    }

    /// The canonical string used for identity.
    pub fn render(&self) -> &str {
        &self.rendered
    }
}

fn render_canonical(
    scheme: Option<&str>,
    host: Option<&str>,
    port: u16,
    path: &str,
    query: Option<&str>,
) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);

    let mut rendered = format!("{}://{}", scheme.unwrap_or(""), host.unwrap_or(""));
    if port != DEFAULT_PORT {
        rendered.push_str(&format!(":{}", port));
    }
    rendered.push('/');
    rendered.push_str(path);
    if let Some(query) = query {
        rendered.push('?');
        rendered.push_str(query);
    }

    rendered
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.rendered == other.rendered
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rendered.hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why implement PartialEq and Hash by hand?
//    - #[derive(PartialEq)] would compare every field, fragment included
//    - We want "http://x.test/a#top" and "http://x.test/a" to be the same page
//    - Comparing the rendered string gives exactly that
//    - Hash MUST agree with PartialEq, so it hashes the same string
//
// 2. Why do with_port() and friends take &self and return Self?
//    - The old value stays valid and unchanged
//    - No hidden "cache is stale" flag to forget about
//
// 3. What does .then() do on a bool?
//    - cond.then(|| value) is Some(value) if cond is true, else None
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_url() {
        let address = Address::parse("https://Example.com/docs/guide?page=2#intro");
        assert_eq!(address.scheme(), Some("https"));
        assert_eq!(address.host(), Some("example.com"));
        assert_eq!(address.port(), DEFAULT_PORT);
        assert_eq!(address.path(), "/docs/guide");
        assert_eq!(address.query(), Some("page=2"));
        assert_eq!(address.fragment(), Some("intro"));
        assert_eq!(address.render(), "https://example.com/docs/guide?page=2");
    }

    #[test]
    fn test_strip_fragment() {
        let address = Address::parse("http://x.test/a#frag").without_fragment();
        assert_eq!(address.render(), "http://x.test/a");
        assert_eq!(address.fragment(), None);
    }

    #[test]
    fn test_strip_fragment_inside_path() {
        let address = Address::parse("http://x.test/").with_path("/a#frag");
        assert_eq!(address.without_fragment().render(), "http://x.test/a");
    }

    #[test]
    fn test_default_port_is_hidden() {
        let address = Address::parse("http://x.test:80/a");
        assert_eq!(address.render(), "http://x.test/a");

        let address = Address::parse("http://x.test:8080/a");
        assert_eq!(address.port(), 8080);
        assert_eq!(address.render(), "http://x.test:8080/a");

        assert_eq!(address.with_port(80).render(), "http://x.test/a");
    }

    #[test]
    fn test_root_path() {
        assert_eq!(Address::parse("http://a.test").render(), "http://a.test/");
        assert_eq!(Address::parse("http://a.test/").render(), "http://a.test/");
    }

    #[test]
    fn test_parse_relative_path() {
        let address = Address::parse("/docs?x=1#top");
        assert!(address.is_relative());
        assert!(address.is_schemeless());
        assert!(address.has_crawlable_scheme());
        assert_eq!(address.path(), "/docs");
        assert_eq!(address.query(), Some("x=1"));
        assert_eq!(address.fragment(), Some("top"));
    }

    #[test]
    fn test_parse_scheme_relative() {
        let address = Address::parse("//user@CDN.example.com:8443/app.js");
        assert!(address.is_schemeless());
        assert!(!address.is_relative());
        assert_eq!(address.host(), Some("cdn.example.com"));
        assert_eq!(address.port(), 8443);
        assert_eq!(address.path(), "/app.js");

        let address = address.with_scheme("https");
        assert_eq!(address.render(), "https://cdn.example.com:8443/app.js");
    }

    #[test]
    fn test_parse_never_fails() {
        for input in ["", "::::", "http://", "%%%", "//", "?only=query", "#only-fragment"] {
            let address = Address::parse(input);
            // Just make sure we got *something* back
            let _ = address.render();
        }
    }

    #[test]
    fn test_non_crawlable_schemes() {
        assert!(!Address::parse("javascript:void(0)").has_crawlable_scheme());
        assert!(!Address::parse("mailto:test@example.com").has_crawlable_scheme());
        assert!(!Address::parse("tel:+123").has_crawlable_scheme());
        assert!(Address::parse("https://example.com").has_crawlable_scheme());
    }

    #[test]
    fn test_equality_ignores_fragment() {
        let a = Address::parse("http://a.test/c#x");
        let b = Address::parse("http://a.test/c");
        assert_eq!(a, b);
        assert_ne!(a, Address::parse("http://a.test/c?q=1"));
    }

    #[test]
    fn test_with_host_rerenders() {
        let address = Address::parse("/about").with_scheme("http").with_host("a.test");
        assert_eq!(address.render(), "http://a.test/about");
        assert!(!address.is_relative());
    }

    #[test]
    fn test_segments() {
        let address = Address::parse("http://a.test/docs/guide/intro/");
        assert_eq!(address.segments(), vec!["docs", "guide", "intro"]);
        assert_eq!(address.segment(1), Some("docs"));
        assert_eq!(address.segment(3), Some("intro"));
        assert_eq!(address.segment(0), None);
        assert_eq!(address.segment(4), None);
    }
}
