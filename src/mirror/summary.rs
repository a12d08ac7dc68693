// src/mirror/summary.rs
// =============================================================================
// The numbers we report once a crawl is done.
//
// Serializable so `--json` can print it as-is.
// =============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// Distinct resources claimed (size of the dedup map)
    pub discovered: usize,
    /// Resources that ended up on disk
    pub materialized: usize,
    /// Items that failed to download, store, or queue
    pub failed: usize,
    /// Files actually written during this run
    pub downloaded: usize,
    /// Files that were already on disk
    pub skipped_existing: usize,
    /// File-like links with an extension we do not mirror
    pub ignored_links: usize,
    /// Links that climbed above the site root
    pub anomalies: usize,
    pub workers: usize,
    pub elapsed_ms: u64,
}

impl CrawlSummary {
    /// True when every discovered resource made it to disk
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.discovered == self.materialized
    }
}
