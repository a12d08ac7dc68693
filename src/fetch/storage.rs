// src/fetch/storage.rs
// =============================================================================
// This module writes the mirror to disk.
//
// Like Transport, Storage is a trait so the engine never touches the
// filesystem directly. FsStorage uses tokio::fs so a slow disk only blocks
// the worker that is writing.
//
// Directory creation must be safe to run from many workers at once:
// create_dir_all() succeeds when the directory already exists, which is
// exactly what we need.
// =============================================================================

use std::io;
use std::path::Path;

use async_trait::async_trait;

// Where mirrored files go, keyed by their local path
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists(&self, path: &Path) -> io::Result<bool>;
    async fn ensure_directory(&self, dir: &Path) -> io::Result<()>;
    async fn write_text(&self, path: &Path, content: &str) -> io::Result<()>;
    async fn write_bytes(&self, path: &Path, content: &[u8]) -> io::Result<()>;
    async fn read_text(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

#[async_trait]
impl Storage for FsStorage {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn ensure_directory(&self, dir: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(dir).await
    }

    async fn write_text(&self, path: &Path, content: &str) -> io::Result<()> {
        tokio::fs::write(path, content).await
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, content).await
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}
