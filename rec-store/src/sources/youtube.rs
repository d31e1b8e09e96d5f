//! Paginated playlist source (YouTube Data API shape).
//!
//! Walks `{items, nextPageToken?}` pages until the provider stops
//! returning a token. The pagination loop is factored over a fetch
//! closure so termination behavior is testable without HTTP.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::errors::RecError;
use crate::record::SourceItem;
use crate::sources::ContentSource;

/// Hard cap on pages per run, in case a provider misbehaves.
const MAX_PAGES: usize = 100;

/// YouTube playlist adapter.
pub struct YoutubePlaylistSource {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    playlist_id: String,
}

impl YoutubePlaylistSource {
    /// `api_base` is normally `https://www.googleapis.com/youtube/v3`;
    /// injectable for tests and proxies.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        playlist_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RecError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecError::SourceFetch(format!("http client: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            playlist_id: playlist_id.into(),
        })
    }

    async fn fetch_page(&self, page_token: Option<String>) -> Result<PlaylistPage, RecError> {
        let mut url = format!(
            "{}/playlistItems?part=snippet&playlistId={}&key={}",
            self.api_base.trim_end_matches('/'),
            self.playlist_id,
            self.api_key
        );
        if let Some(token) = &page_token {
            url.push_str(&format!("&pageToken={token}"));
        }
        trace!(has_token = page_token.is_some(), "youtube::fetch_page");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RecError::SourceFetch(format!("playlist request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(RecError::SourceFetch(format!(
                "playlist page returned HTTP {}",
                resp.status()
            )));
        }

        resp.json::<PlaylistPage>()
            .await
            .map_err(|e| RecError::SourceFetch(format!("malformed playlist page: {e}")))
    }
}

impl ContentSource for YoutubePlaylistSource {
    fn name(&self) -> &str {
        "youtube"
    }

    fn fetch<'a>(
        &'a self,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<SourceItem>, RecError>> + Send + 'a>,
    > {
        Box::pin(async move { walk_pages(|token| self.fetch_page(token), MAX_PAGES).await })
    }
}

/// Collects items across pages until no continuation token is returned.
///
/// Guards: a page echoing the token that requested it terminates the walk
/// (with a warning), and `page_cap` bounds the total page count. An empty
/// first page simply yields no items.
pub(crate) async fn walk_pages<F, Fut>(
    mut fetch: F,
    page_cap: usize,
) -> Result<Vec<SourceItem>, RecError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PlaylistPage, RecError>>,
{
    let mut out = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(token.clone()).await?;
        pages += 1;

        for item in page.items {
            out.push(item.into_source_item());
        }

        match page.next_page_token {
            None => break,
            Some(next) if Some(&next) == token.as_ref() => {
                warn!("provider echoed page token {next:?}; stopping pagination");
                break;
            }
            Some(next) => token = Some(next),
        }

        if pages >= page_cap {
            warn!("page cap {page_cap} reached; stopping pagination");
            break;
        }
    }

    debug!("youtube::walk_pages -> {} items over {} pages", out.len(), pages);
    Ok(out)
}

/* ===========================================================================
Page payloads
======================================================================== */

/// One page of `{items, nextPageToken?}`.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "resourceId")]
    pub resource_id: ResourceId,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnails {
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

impl PlaylistItem {
    fn into_source_item(self) -> SourceItem {
        let s = self.snippet;
        let video_id = s.resource_id.video_id;
        SourceItem {
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            source_text: format!("Title: {} \n Description: {}", s.title, s.description),
            id: video_id,
            title: Some(s.title),
            description: Some(s.description),
            thumbnail: s.thumbnails.high.map(|t| t.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[&str], next: Option<&str>) -> PlaylistPage {
        PlaylistPage {
            items: ids
                .iter()
                .map(|id| PlaylistItem {
                    snippet: Snippet {
                        title: format!("video {id}"),
                        description: "d".into(),
                        resource_id: ResourceId {
                            video_id: id.to_string(),
                        },
                        thumbnails: Thumbnails::default(),
                    },
                })
                .collect(),
            next_page_token: next.map(String::from),
        }
    }

    #[tokio::test]
    async fn walks_all_pages_until_token_runs_out() {
        let items = walk_pages(
            |token| async move {
                Ok(match token.as_deref() {
                    None => page(&["v1"], Some("A")),
                    Some("A") => page(&["v2", "v3"], Some("B")),
                    Some("B") => page(&["v4"], None),
                    other => panic!("unexpected token {other:?}"),
                })
            },
            100,
        )
        .await
        .unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3", "v4"]);
    }

    #[tokio::test]
    async fn empty_first_page_terminates_immediately() {
        let items = walk_pages(|_| async { Ok(page(&[], None)) }, 100)
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn echoed_token_does_not_loop_forever() {
        let items = walk_pages(
            |token| async move {
                Ok(match token.as_deref() {
                    None => page(&["v1"], Some("A")),
                    // Provider keeps echoing "A".
                    Some("A") => page(&["v2"], Some("A")),
                    other => panic!("unexpected token {other:?}"),
                })
            },
            100,
        )
        .await
        .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn page_failure_discards_the_run() {
        let res = walk_pages(
            |token| async move {
                match token.as_deref() {
                    None => Ok(page(&["v1"], Some("A"))),
                    _ => Err(RecError::SourceFetch("boom".into())),
                }
            },
            100,
        )
        .await;
        assert!(matches!(res, Err(RecError::SourceFetch(_))));
    }

    #[test]
    fn snippet_maps_to_source_item() {
        let raw = r#"{
            "snippet": {
                "title": "T",
                "description": "D",
                "resourceId": {"videoId": "abc"},
                "thumbnails": {"high": {"url": "https://img/abc.jpg"}}
            }
        }"#;
        let item: PlaylistItem = serde_json::from_str(raw).unwrap();
        let s = item.into_source_item();
        assert_eq!(s.id, "abc");
        assert_eq!(s.url, "https://www.youtube.com/watch?v=abc");
        assert_eq!(s.thumbnail.as_deref(), Some("https://img/abc.jpg"));
        assert_eq!(s.source_text, "Title: T \n Description: D");
    }
}
