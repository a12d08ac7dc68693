// src/links/mod.rs
// =============================================================================
// This module contains everything about links, and none of it does I/O.
//
// Submodules:
// - extract: finds quoted strings in text and filters them to file paths
// - path: resolves relative links and maps remote paths to local files
//
// discover_links() glues the two together: given a fetched page and its
// content, it returns the RemotePaths worth downloading.
// =============================================================================

mod extract;
mod path;

pub use extract::{extract_links, is_link_like};
pub use path::{resolve, RemotePath, ResolveError, ResourceKind};

// What scanning one page produced
#[derive(Debug, Default)]
pub struct PageLinks {
    /// Links that resolved to a text or asset resource
    pub resources: Vec<(RemotePath, ResourceKind)>,
    /// File-like links whose extension we do not mirror
    pub ignored: usize,
    /// Links that could not be resolved (e.g. too many "../")
    pub anomalies: Vec<ResolveError>,
}

// Scans `content` (fetched from `page`) and resolves every file-like link
//
// Duplicates within a page are kept; the frontier deduplicates anyway.
pub fn discover_links(page: &RemotePath, content: &str) -> PageLinks {
    let mut found = PageLinks::default();

    for candidate in extract_links(content).filter(|s| is_link_like(s)) {
        match resolve(page, &candidate) {
            Ok(path) => match path.kind() {
                Some(kind) => found.resources.push((path, kind)),
                None => found.ignored += 1,
            },
            Err(anomaly) => found.anomalies.push(anomaly),
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_links_classifies() {
        let page = RemotePath::new("/index.html");
        let html = r#"
            <link href="css/a.css">
            <img src="img/b.jpg">
            <a href="readme">x</a>
            <a href="http://external/x.css">y</a>
            <a href="docs/guide.pdf">z</a>
        "#;
        let found = discover_links(&page, html);

        assert_eq!(
            found.resources,
            vec![
                (RemotePath::new("/css/a.css"), ResourceKind::Text),
                (RemotePath::new("/img/b.jpg"), ResourceKind::Asset),
            ]
        );
        // guide.pdf is file-like but not mirrored; readme and the
        // external URL never pass the pattern at all
        assert_eq!(found.ignored, 1);
        assert!(found.anomalies.is_empty());
    }

    #[test]
    fn test_discover_links_reports_underflow() {
        let page = RemotePath::new("/index.html");
        let found = discover_links(&page, r#"<img src="../up.jpg">"#);
        assert!(found.resources.is_empty());
        assert_eq!(found.anomalies.len(), 1);
    }
}
