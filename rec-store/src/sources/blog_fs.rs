//! Filesystem blog source.
//!
//! Reads every file in a configured posts directory. Each document starts
//! with a front-matter header of line-prefixed fields (`title:`,
//! `description:`) followed by the body. The identifier and canonical URL
//! are derived from the filename: strip the extension, then
//! `<base>/blog/<slug>`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::errors::RecError;
use crate::record::SourceItem;
use crate::sources::ContentSource;

/// Blog post directory adapter.
#[derive(Clone, Debug)]
pub struct BlogDirSource {
    dir: PathBuf,
    base_url: String,
}

impl BlogDirSource {
    /// `base_url` is the site root, e.g. `https://example.com` (no
    /// trailing slash required).
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    fn list_posts(&self) -> Result<Vec<SourceItem>, RecError> {
        trace!("blog_fs::list_posts dir={:?}", self.dir);
        let mut out = Vec::new();

        let mut entries: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        // Directory order is not stable across filesystems.
        entries.sort();

        for path in entries {
            let Some(slug) = slug_of(&path) else {
                warn!("skipping file without a usable name: {:?}", path);
                continue;
            };
            let body = fs::read_to_string(&path)?;

            let title = parse_front_matter_field(&body, "title:");
            let description = parse_front_matter_field(&body, "description:");
            if title.is_none() {
                // Data-quality issue, not fatal: the item still flows on.
                warn!("post {:?} has no `title:` front-matter line", path);
            }

            let url = format!("{}/blog/{}", self.base_url.trim_end_matches('/'), slug);
            out.push(SourceItem {
                id: url.clone(),
                title,
                description,
                thumbnail: None,
                url,
                source_text: body,
            });
        }

        debug!("blog_fs::list_posts -> {} posts", out.len());
        Ok(out)
    }
}

impl ContentSource for BlogDirSource {
    fn name(&self) -> &str {
        "blog"
    }

    fn fetch<'a>(
        &'a self,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<SourceItem>, RecError>> + Send + 'a>,
    > {
        Box::pin(async move { self.list_posts() })
    }
}

/// Filename minus extension, e.g. `posts/intro-to-rust.md` → `intro-to-rust`.
fn slug_of(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Scans document lines for a `prefix` field and returns its value.
///
/// Only the first match counts. The value keeps everything after the
/// first `:`, trimmed.
fn parse_front_matter_field(body: &str, prefix: &str) -> Option<String> {
    body.lines().find_map(|line| {
        line.strip_prefix(prefix)
            .map(|rest| rest.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}
