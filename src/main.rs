// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build a Crawler from the arguments and run it
// 3. Print one line per crawled page (or JSON)
// 4. Exit with proper code (0 = all pages OK, 1 = broken pages, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use cli::{Cli, Commands, CrawlArgs, Scope};
use link_crawler::{
    logging, AcceptAll, Address, ChromeRenderer, CrawlReport, Crawler, CrawlerConfig, IncludeSubdomains,
    PageResult, PageStatus, ReqwestFetcher, SameHost,
};

#[tokio::main]
async fn main() {
    logging::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl(args) => handle_crawl(args).await,
    }
}

async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    println!("🔍 Crawling website: {}", args.url);

    let fetcher = match &args.login_url {
        Some(login_url) => ReqwestFetcher::logged_in(login_url, &args.login_fields).await?,
        None => ReqwestFetcher::new()?,
    };

    let config = CrawlerConfig {
        concurrency: args.concurrency,
        maximum_crawl_count: args.max_count,
        maximum_depth: args.max_depth,
        execute_scripts: args.execute_scripts,
        ..CrawlerConfig::default()
    };

    let seed = Address::parse(&args.url);
    let mut crawler = Crawler::new(Arc::new(fetcher), CrawlReport::new(), config)?;
    crawler = match args.scope {
        Scope::All => crawler.with_policy(AcceptAll),
        Scope::Host => crawler.with_policy(SameHost::new(&seed)),
        Scope::Subdomains => crawler.with_policy(IncludeSubdomains::new(&seed)),
    };
    if args.execute_scripts {
        crawler = crawler.with_renderer(ChromeRenderer::new(&args.chrome));
    }

    let results = crawler.start_crawling(&args.url).await?;

    println!("📄 Crawled {} page(s)\n", results.len());

    print_results(&results, args.json)?;

    let broken_count = results.iter().filter(|r| !r.is_ok()).count();

    if broken_count > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_results(results: &[PageResult], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else {
        print_table(results);
    }
    Ok(())
}

fn print_table(results: &[PageResult]) {
    println!("{:<60} {:<15} {:<30}", "URL", "STATUS", "MESSAGE");
    println!("{}", "=".repeat(105));

    for result in results {
        let status_display = format_status(&result.status);
        let message = result.message.as_deref().unwrap_or("");

        // Truncate URL if too long for display
        let url_display = if result.url.chars().count() > 57 {
            format!("{}...", result.url.chars().take(57).collect::<String>())
        } else {
            result.url.clone()
        };

        println!("{:<60} {:<15} {:<30}", url_display, status_display, message);
    }

    println!();

    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    let broken_count = results.len() - ok_count;

    println!("📊 Summary:");
    println!("   ✅ OK: {}", ok_count);
    println!("   ❌ Broken: {}", broken_count);
    println!("   📋 Total: {}", results.len());
}

fn format_status(status: &PageStatus) -> String {
    match status {
        PageStatus::Ok => "✅ OK".to_string(),
        PageStatus::Redirect(_) => "🔀 REDIRECT".to_string(),
        PageStatus::Broken => "❌ BROKEN".to_string(),
        PageStatus::Timeout => "⏱️  TIMEOUT".to_string(),
        PageStatus::SslError => "🔒 SSL ERROR".to_string(),
        PageStatus::DnsError => "🌐 DNS ERROR".to_string(),
        PageStatus::Error => "⚠️  ERROR".to_string(),
    }
}
