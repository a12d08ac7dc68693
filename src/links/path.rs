// src/links/path.rs
// =============================================================================
// Remote paths, link resolution and the remote -> local mapping.
//
// Every resource on the mirrored site is identified by a RemotePath: an
// absolute path like "/catalogue/page-2.html". Links found inside a page are
// usually relative to that page, so before we can deduplicate them we turn
// them into RemotePaths with resolve().
//
// Examples (page = "/a/b/c.html"):
//   "d.css"      -> "/a/b/d.css"
//   "../d.css"   -> "/a/d.css"
//   "/img/x.jpg" -> "/img/x.jpg"   (already absolute)
//
// We deliberately do NOT use url::Url::join here: the mirror needs to notice
// when a link climbs above the site root, and Url silently clamps that.
// =============================================================================

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions of resources we download and then scan for more links
pub const TEXT_EXTENSIONS: &[&str] = &["html", "css", "js"];

/// Extensions of resources we download as opaque bytes
pub const ASSET_EXTENSIONS: &[&str] = &["jpg", "ico", "eot", "woff", "ttf", "svg"];

// Canonical absolute path of a resource on the source site
//
// Always starts with exactly one '/'. Two links that resolve to the same
// RemotePath are the same resource, so this is the key of the dedup map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemotePath(String);

impl RemotePath {
    /// Normalizes any leading separators to a single '/'
    pub fn new(path: &str) -> Self {
        RemotePath(format!("/{}", path.trim_start_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // The path without anything from the first query marker onward.
    //
    // Query strings show up either raw ("style.css?v=1") or percent-encoded
    // ("style.css%3Fv=1"); both are cut, nothing is decoded.
    fn without_query(&self) -> &str {
        match self.0.find(['%', '?']) {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Identity used for deduplication: "/a.css?v=1" and "/a.css" are one file
    pub fn key(&self) -> RemotePath {
        RemotePath(self.without_query().to_string())
    }

    /// Where this resource lives inside the mirror directory
    pub fn to_local(&self, root: &Path) -> PathBuf {
        self.without_query()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }

    /// What kind of work this path is, judged by its local file extension
    pub fn kind(&self) -> Option<ResourceKind> {
        let file_name = self.without_query().rsplit('/').next()?;
        let (_, extension) = file_name.rsplit_once('.')?;
        ResourceKind::from_extension(extension)
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Whether a fetched resource gets scanned for more links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// .html / .css / .js - fetched as text and scanned
    Text,
    /// Images and fonts - copied byte for byte
    Asset,
}

impl ResourceKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        if TEXT_EXTENSIONS.contains(&extension) {
            Some(ResourceKind::Text)
        } else if ASSET_EXTENSIONS.contains(&extension) {
            Some(ResourceKind::Asset)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The link has more "../" segments than the page has parent directories
    #[error("link '{link}' on {containing} climbs above the site root")]
    ParentUnderflow { containing: RemotePath, link: String },
}

// Resolves a link found on `containing` to an absolute RemotePath
//
// Algorithm:
// 1. Absolute links ("/...") are returned as they are
// 2. Take the directory of the containing page (drop its file name)
// 3. Count the leading ".." segments of the link
// 4. Pop that many directories, then append the rest of the link
pub fn resolve(containing: &RemotePath, link: &str) -> Result<RemotePath, ResolveError> {
    if link.starts_with('/') {
        return Ok(RemotePath::new(link));
    }

    let mut base: Vec<&str> = containing
        .as_str()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    // Drop the file name; what is left is the base directory (maybe root)
    base.pop();

    let segments: Vec<&str> = link
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    let parents = segments.iter().take_while(|s| **s == "..").count();

    if parents > base.len() {
        return Err(ResolveError::ParentUnderflow {
            containing: containing.clone(),
            link: link.to_string(),
        });
    }

    base.truncate(base.len() - parents);
    base.extend(&segments[parents..]);

    Ok(RemotePath::new(&base.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> RemotePath {
        RemotePath::new(path)
    }

    #[test]
    fn test_resolve_sibling() {
        let resolved = resolve(&page("/a/b/c.html"), "d.css").unwrap();
        assert_eq!(resolved.as_str(), "/a/b/d.css");
    }

    #[test]
    fn test_resolve_parent() {
        let resolved = resolve(&page("/a/b/c.html"), "../d.css").unwrap();
        assert_eq!(resolved.as_str(), "/a/d.css");
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let resolved = resolve(&page("/index.html"), "/img/x.jpg").unwrap();
        assert_eq!(resolved.as_str(), "/img/x.jpg");
    }

    #[test]
    fn test_resolve_from_root_page() {
        let resolved = resolve(&page("/index.html"), "css/a.css").unwrap();
        assert_eq!(resolved.as_str(), "/css/a.css");
    }

    #[test]
    fn test_resolve_multiple_parents() {
        let resolved = resolve(&page("/a/b/c/page.html"), "../../static/app.js").unwrap();
        assert_eq!(resolved.as_str(), "/a/static/app.js");
    }

    #[test]
    fn test_resolve_skips_current_dir_segments() {
        let resolved = resolve(&page("/a/page.html"), "./img/./x.jpg").unwrap();
        assert_eq!(resolved.as_str(), "/a/img/x.jpg");
    }

    #[test]
    fn test_resolve_underflow_is_an_error() {
        let err = resolve(&page("/a/page.html"), "../../x.css").unwrap_err();
        assert_eq!(
            err,
            ResolveError::ParentUnderflow {
                containing: page("/a/page.html"),
                link: "../../x.css".to_string(),
            }
        );
    }

    #[test]
    fn test_remote_path_normalizes_leading_separators() {
        assert_eq!(RemotePath::new("index.html").as_str(), "/index.html");
        assert_eq!(RemotePath::new("//index.html").as_str(), "/index.html");
    }

    #[test]
    fn test_to_local_strips_query() {
        let root = Path::new("/tmp/mirror");
        assert_eq!(
            page("/static/style.css?v=1").to_local(root),
            root.join("static").join("style.css")
        );
        assert_eq!(
            page("/fonts/icons.eot%3F%23iefix").to_local(root),
            root.join("fonts").join("icons.eot")
        );
    }

    #[test]
    fn test_key_drops_query_suffix() {
        assert_eq!(page("/a.css?v=1").key(), page("/a.css"));
        assert_eq!(page("/a.css?v=1").key(), page("/a.css?v=2").key());
        assert_eq!(page("/icons.eot%3F%23iefix").key(), page("/icons.eot"));
        assert_eq!(page("/index.html").key(), page("/index.html"));
    }

    #[test]
    fn test_to_local_is_stable() {
        let root = Path::new("/tmp/mirror");
        let path = page("/a/b.html");
        assert_eq!(path.to_local(root), path.to_local(root));
    }

    #[test]
    fn test_kind_uses_local_extension() {
        assert_eq!(page("/style.css?v=1").kind(), Some(ResourceKind::Text));
        assert_eq!(page("/logo.jpg").kind(), Some(ResourceKind::Asset));
        assert_eq!(page("/font.woff%3Fv=4").kind(), Some(ResourceKind::Asset));
        assert_eq!(page("/readme").kind(), None);
        assert_eq!(page("/archive.zip").kind(), None);
        // Only the last extension counts
        assert_eq!(page("/jquery.min.js").kind(), Some(ResourceKind::Text));
    }
}
