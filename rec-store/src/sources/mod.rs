//! Content source adapters.
//!
//! A source lists candidate items with display metadata and the text to
//! embed; the sync engine decides what is actually new.

use crate::errors::RecError;
use crate::record::SourceItem;
use std::{future::Future, pin::Pin};

/// A listing of content items from one external source.
///
/// A failed fetch discards the whole run for that source — partially
/// collected pages are never committed.
pub trait ContentSource: Send + Sync {
    /// Short name used in logs and sync summaries.
    fn name(&self) -> &str;

    /// Lists every item the source currently exposes.
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SourceItem>, RecError>> + Send + 'a>>;
}

pub mod blog_fs;
pub mod youtube;

pub use blog_fs::BlogDirSource;
pub use youtube::YoutubePlaylistSource;
