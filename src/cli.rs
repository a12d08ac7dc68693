// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below IS the CLI definition, and clap
// generates the parsing code, --help and --version for us.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::mirror::MirrorConfig;

// Mirror a website to a local directory
//
// Example: site-mirror http://books.toscrape.com/ --dest ./books --workers 16
#[derive(Parser, Debug)]
#[command(
    name = "site-mirror",
    version,
    about = "Mirror a website to local disk using a pool of concurrent workers",
    long_about = "site-mirror downloads an entry page, follows every relative link to \
                  .html/.css/.js files and common image/font assets, and stores the \
                  whole site under a local directory. Files already on disk are reused."
)]
pub struct Cli {
    /// Base URL of the site (e.g., http://books.toscrape.com/)
    pub base_url: String,

    /// Directory the mirror is written to
    #[arg(long, short, default_value = "mirror")]
    pub dest: PathBuf,

    /// Path of the first page to download, relative to the base URL
    #[arg(long, default_value = "index.html")]
    pub entry: String,

    /// Number of concurrent workers (at least 1)
    #[arg(long, short, default_value_t = 16)]
    pub workers: usize,

    /// How many times an idle worker polls the empty queues before exiting
    #[arg(long, default_value_t = 3)]
    pub idle_retries: u32,

    /// Pause between polls of an idle worker, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub retry_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print the final summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log every processed file (same as RUST_LOG=site_mirror=debug)
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    pub fn mirror_config(&self) -> MirrorConfig {
        MirrorConfig {
            destination: self.dest.clone(),
            idle_retries: self.idle_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            ..MirrorConfig::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
