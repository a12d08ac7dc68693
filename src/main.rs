// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the crawl engine (HTTP transport + filesystem storage)
// 3. Seed it with the entry page, then let the workers mirror the rest
// 4. Print a summary and exit with a proper code
//    (0 = everything mirrored, 1 = some files failed, 2 = error)
// =============================================================================

mod cli;
mod error;
mod fetch;
mod links;
mod logging;
mod mirror;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use error::CrawlError;
use fetch::{FsStorage, HttpTransport};
use mirror::{CrawlEngine, CrawlSummary};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            if e.downcast_ref::<CrawlError>().is_some_and(CrawlError::is_fatal) {
                eprintln!("Configuration error: {:#}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    println!("🔍 Mirroring {} into {}", cli.base_url, cli.dest.display());

    let transport = HttpTransport::new(&cli.base_url, cli.timeout())?;
    let engine = CrawlEngine::new(cli.mirror_config(), Arc::new(transport), Arc::new(FsStorage));

    let initial = engine.seed(&cli.entry).await?;
    println!("📄 {} scraped, found {} initial file(s) to process", cli.entry, initial);

    let summary = engine.run_to_completion(cli.workers).await?;

    print_summary(&summary, cli.json)?;

    if summary.is_complete() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   📋 Discovered:       {}", summary.discovered);
    println!("   ✅ Mirrored:         {}", summary.materialized);
    println!("   ⬇️  Downloaded:       {}", summary.downloaded);
    println!("   💾 Already on disk:  {}", summary.skipped_existing);
    println!("   ❌ Failed:           {}", summary.failed);
    println!("   🙈 Ignored links:    {}", summary.ignored_links);
    if summary.anomalies > 0 {
        println!("   ⚠️  Unresolvable:     {}", summary.anomalies);
    }
    println!(
        "   ⏱️  {} worker(s), {:.2}s",
        summary.workers,
        summary.elapsed_ms as f64 / 1000.0
    );
    Ok(())
}
