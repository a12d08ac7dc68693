// src/fetch/mod.rs
// =============================================================================
// This module moves bytes: from the website (Transport) to the mirror
// directory (Storage).
//
// Submodules:
// - transport: the Transport trait and its reqwest implementation
// - storage: the Storage trait and its tokio::fs implementation
// - fetcher: downloads a work item and stores it, once
//
// The crawl engine is handed both capabilities as trait objects, which keeps
// it testable without a network or a disk.
// =============================================================================

mod fetcher;
mod storage;
mod transport;

#[cfg(test)]
pub mod testing;

pub use fetcher::{Fetched, Fetcher};
pub use storage::{FsStorage, Storage};
pub use transport::{HttpTransport, Transport};
