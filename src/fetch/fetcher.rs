// src/fetch/fetcher.rs
// =============================================================================
// Downloads one work item and stores it at its local path.
//
// If the local file already exists we skip the download entirely. Text files
// are still read back so the engine can follow their links: a second run over
// the same mirror directory walks the site again without re-downloading it.
//
// Errors go straight back to the worker. Retrying a failed download is not
// this module's job (nor the worker's - see mirror/worker.rs).
// =============================================================================

use std::sync::Arc;

use crate::error::CrawlError;
use crate::links::ResourceKind;
use crate::mirror::WorkItem;

use super::{Storage, Transport};

// Result of fetching one item
#[derive(Debug, PartialEq, Eq)]
pub enum Fetched {
    /// Text content to scan for links; `written` is false if it was on disk already
    Text { content: String, written: bool },
    Asset { written: bool },
}

impl Fetched {
    pub fn was_written(&self) -> bool {
        match self {
            Fetched::Text { written, .. } | Fetched::Asset { written } => *written,
        }
    }
}

#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn Storage>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn Storage>) -> Self {
        Self { transport, storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub async fn fetch(&self, item: &WorkItem) -> Result<Fetched, CrawlError> {
        let local = item.local.as_path();
        let exists = self
            .storage
            .exists(local)
            .await
            .map_err(CrawlError::storage(local))?;

        match (item.kind, exists) {
            (ResourceKind::Text, true) => {
                let content = self
                    .storage
                    .read_text(local)
                    .await
                    .map_err(CrawlError::storage(local))?;
                Ok(Fetched::Text {
                    content,
                    written: false,
                })
            }
            (ResourceKind::Text, false) => {
                let content = self
                    .transport
                    .get_text(&item.path)
                    .await
                    .map_err(|source| CrawlError::Transport {
                        path: item.path.clone(),
                        source,
                    })?;
                self.storage
                    .write_text(local, &content)
                    .await
                    .map_err(CrawlError::storage(local))?;
                Ok(Fetched::Text {
                    content,
                    written: true,
                })
            }
            (ResourceKind::Asset, true) => Ok(Fetched::Asset { written: false }),
            (ResourceKind::Asset, false) => {
                let bytes = self
                    .transport
                    .get_bytes(&item.path)
                    .await
                    .map_err(|source| CrawlError::Transport {
                        path: item.path.clone(),
                        source,
                    })?;
                self.storage
                    .write_bytes(local, &bytes)
                    .await
                    .map_err(CrawlError::storage(local))?;
                Ok(Fetched::Asset { written: true })
            }
        }
    }
}
