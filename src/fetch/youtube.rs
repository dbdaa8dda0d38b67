//! YouTube Data API v3 wire types.
//!
//! Only the fields the fetcher reads are modelled; everything else in the
//! responses is ignored. All YouTube specifics live here so endpoint changes
//! are easy to fix.

use serde::Deserialize;

/// Default API base URL.
pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum page size accepted by the `playlistItems` endpoint.
pub const MAX_RESULTS: u32 = 50;

/// Error object returned in place of (or alongside) a result.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Message if upstream sent a non-empty one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

// ── playlistItems ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemsResponse {
    pub error: Option<ApiErrorBody>,

    #[serde(default)]
    pub items: Vec<PlaylistItemEntry>,

    /// Present when more entries exist beyond this page
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemEntry {
    pub content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: Option<String>,
}

impl PlaylistItemEntry {
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|d| d.video_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

// ── videos ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct VideosResponse {
    pub error: Option<ApiErrorBody>,

    #[serde(default)]
    pub items: Vec<VideoEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub id: Option<String>,
    pub snippet: Option<VideoSnippet>,
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSnippet {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
    /// Broadcast duration token, e.g. `PT4M13S`
    pub duration: Option<String>,
}

impl VideoEntry {
    pub fn title(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .unwrap_or("")
    }

    pub fn duration_token(&self) -> &str {
        self.content_details
            .as_ref()
            .and_then(|d| d.duration.as_deref())
            .unwrap_or("")
    }
}
