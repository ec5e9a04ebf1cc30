// src/logging.rs
// =============================================================================
// Log setup for the binary.
//
// Logs go to stderr so that `--json` output on stdout stays machine-readable.
// The level comes from RUST_LOG, e.g.
//   RUST_LOG=link_crawler=debug link-crawler crawl https://example.com
// =============================================================================

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "link_crawler=info,reqwest=warn,hyper=warn";

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
