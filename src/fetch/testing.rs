// src/fetch/testing.rs
// =============================================================================
// In-memory Transport and Storage used by the tests.
//
// MemorySite is a fake website: a map from path to body that counts every
// request per path, so tests can assert that nothing was downloaded twice.
// MemoryStorage is a fake disk that refuses to write into directories that
// were never created, just like the real filesystem.
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::TransportError;
use crate::links::RemotePath;

use super::{Storage, Transport};

#[derive(Default)]
pub struct MemorySite {
    bodies: HashMap<String, Vec<u8>>,
    hits: DashMap<String, usize>,
}

impl MemorySite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: &str) -> Self {
        self.bodies.insert(path.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn asset(mut self, path: &str, body: &[u8]) -> Self {
        self.bodies.insert(path.to_string(), body.to_vec());
        self
    }

    /// Total number of requests served (including 404s)
    pub fn requests(&self) -> usize {
        self.hits.iter().map(|entry| *entry.value()).sum()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.get(path).map(|count| *count).unwrap_or(0)
    }

    fn serve(&self, path: &RemotePath) -> Result<Vec<u8>, TransportError> {
        *self.hits.entry(path.to_string()).or_insert(0) += 1;
        self.bodies
            .get(path.as_str())
            .cloned()
            .ok_or(TransportError::Status { status: 404 })
    }
}

#[async_trait]
impl Transport for MemorySite {
    async fn get_text(&self, path: &RemotePath) -> Result<String, TransportError> {
        let body = self.serve(path)?;
        String::from_utf8(body).map_err(|e| TransportError::Request(e.to_string()))
    }

    async fn get_bytes(&self, path: &RemotePath) -> Result<Vec<u8>, TransportError> {
        self.serve(path)
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<HashSet<PathBuf>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn with_dirs(dirs: &[&str]) -> Self {
        let storage = Self::default();
        storage
            .dirs
            .lock()
            .unwrap()
            .extend(dirs.iter().map(PathBuf::from));
        storage
    }

    /// Puts a file in place without counting it as a write
    pub fn insert(&self, path: &Path, content: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_vec());
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn store(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or(Path::new(""));
        if !self.dirs.lock().unwrap().contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", parent.display()),
            ));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(path, content);
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn ensure_directory(&self, dir: &Path) -> io::Result<()> {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in dir.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn write_text(&self, path: &Path, content: &str) -> io::Result<()> {
        self.store(path, content.as_bytes())
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        self.store(path, content)
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        let bytes = self
            .read(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
