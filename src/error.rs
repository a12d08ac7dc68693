// src/error.rs
// =============================================================================
// Error types for the mirror engine.
//
// The binary itself uses anyhow (see main.rs), but the engine needs errors it
// can match on: a worker has to tell a failed download apart from a bad
// configuration, because only the latter stops the whole run.
//
// Taxonomy:
// - TransportError: the HTTP side failed (status code, timeout, connection)
// - CrawlError::Storage: reading/writing the local mirror failed
// - CrawlError::Resolution: a link climbed above the site root
// - CrawlError::Configuration: fatal, raised before any worker starts
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::links::{RemotePath, ResolveError};

// Why fetching a single resource over HTTP failed
//
// Each variant says what went wrong on the wire: the server refused (status),
// the server never answered in time, or we never reached it at all.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server answered, but not with 2xx
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Could not connect (DNS, refused, unreachable)
    #[error("connection failed: {0}")]
    Connect(String),

    /// Anything else reqwest reported (bad body encoding, invalid URL, ...)
    #[error("request failed: {0}")]
    Request(String),
}

// Everything that can go wrong while mirroring
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to fetch {path}: {source}")]
    Transport {
        path: RemotePath,
        #[source]
        source: TransportError,
    },

    #[error("storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl CrawlError {
    // Small helper so storage call sites read as `.map_err(CrawlError::storage(&path))`
    pub fn storage(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> CrawlError + '_ {
        move |source| CrawlError::Storage {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Only configuration errors abort a crawl; everything else is per-item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CrawlError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(CrawlError::Configuration("workers must be at least 1".into()).is_fatal());

        let transport = CrawlError::Transport {
            path: RemotePath::new("/index.html"),
            source: TransportError::Status { status: 404 },
        };
        assert!(!transport.is_fatal());
        assert_eq!(transport.to_string(), "failed to fetch /index.html: HTTP 404");
    }

    #[test]
    fn test_storage_helper_keeps_path() {
        let path = std::path::Path::new("/tmp/mirror/index.html");
        let err = CrawlError::storage(path)(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        match err {
            CrawlError::Storage { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
