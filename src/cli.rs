// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version = "0.1.0",
    about = "Crawl a website concurrently and report the status of every page",
    long_about = "link-crawler starts from one URL, follows links with a bounded number of \
                  concurrent requests, and reports every page it fetched along with its status."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website starting from a URL
    ///
    /// Example: link-crawler crawl https://example.com --scope host --max-depth 2
    Crawl(CrawlArgs),
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// URL to start crawling from (e.g., https://example.com)
    pub url: String,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of requests in flight at once
    #[arg(long, default_value_t = link_crawler::crawl::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Maximum link-hop distance from the starting URL
    ///
    /// Depth 0 = just the starting page
    /// Depth 1 = starting page + all pages it links to
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Stop discovering new pages once this many have been queued
    #[arg(long)]
    pub max_count: Option<usize>,

    /// Which discovered pages may be crawled
    #[arg(long, value_enum, default_value_t = Scope::Host)]
    pub scope: Scope,

    /// Extract links from the page after running its JavaScript
    #[arg(long)]
    pub execute_scripts: bool,

    /// Headless Chrome/Chromium binary used with --execute-scripts
    #[arg(long, default_value = "chromium")]
    pub chrome: PathBuf,

    /// Submit a login form at this URL before crawling (cookies are kept)
    #[arg(long)]
    pub login_url: Option<String>,

    /// Login form field as KEY=VALUE (repeatable)
    #[arg(long = "login-field", value_parser = parse_key_value, requires = "login_url")]
    pub login_fields: Vec<(String, String)>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Follow links to any website
    All,
    /// Stay on the starting URL's host
    Host,
    /// Stay on the starting URL's host and its subdomains
    Subdomains,
}

fn parse_key_value(input: &str) -> Result<(String, String), String> {
    input
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["link-crawler", "crawl", "https://example.com"]).unwrap();
        let Commands::Crawl(args) = cli.command;
        assert_eq!(args.url, "https://example.com");
        assert_eq!(args.concurrency, 10);
        assert_eq!(args.scope, Scope::Host);
        assert_eq!(args.max_depth, None);
        assert!(!args.json);
    }

    #[test]
    fn test_login_fields() {
        let cli = Cli::try_parse_from([
            "link-crawler",
            "crawl",
            "https://example.com",
            "--login-url",
            "https://example.com/login",
            "--login-field",
            "user=me",
            "--login-field",
            "pass=a=b",
        ])
        .unwrap();
        let Commands::Crawl(args) = cli.command;
        assert_eq!(
            args.login_fields,
            vec![
                ("user".to_string(), "me".to_string()),
                ("pass".to_string(), "a=b".to_string())
            ]
        );
    }

    #[test]
    fn test_bad_login_field() {
        assert!(parse_key_value("novalue").is_err());
    }
}
