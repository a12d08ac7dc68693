// src/mirror/mod.rs
// =============================================================================
// This module mirrors a website with a pool of concurrent workers.
//
// Features:
// - Every resource is fetched at most once, however many pages link to it
// - Text files (.html/.css/.js) are scanned for more links, assets are copied
// - Files already on disk are not downloaded again
// - Workers stop once the queues have stayed empty for a while
//
// Submodules:
// - frontier: the two work queues and the dedup map
// - worker: the per-worker poll/backoff loop
// - engine: CrawlEngine, seed() and run_to_completion()
// - summary: the numbers reported at the end
// =============================================================================

mod engine;
mod frontier;
mod summary;
mod worker;

pub use engine::{CrawlEngine, MirrorConfig};
pub use frontier::WorkItem;
pub use summary::CrawlSummary;
