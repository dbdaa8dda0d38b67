//! Playlist fetching from the YouTube Data API.
//!
//! Resolves a playlist URL to per-video titles and durations with two
//! sequential requests: one listing the playlist entries, one batched lookup
//! of video metadata. Nothing is cached and nothing is retried.

pub mod youtube;

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::duration::parse_broadcast_duration;
use crate::models::{Playlist, PlaylistId, PlaylistItemRecord};
use youtube::{PlaylistItemsResponse, VideosResponse, MAX_RESULTS, YOUTUBE_API_BASE};

/// Errors that can occur while fetching a playlist.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("YouTube API key is not configured. Set YOUTUBE_API_KEY or youtube.api_key in the config file.")]
    Config,

    #[error("Invalid playlist URL: {0}. Please ensure you're using a valid YouTube playlist link.")]
    InvalidInput(String),

    #[error("Invalid API key. Please check your YouTube API key configuration.")]
    Auth,

    #[error("Playlist not found. Please check if the playlist exists and is public.")]
    NotFound,

    #[error("No videos found in this playlist. The playlist might be empty or private.")]
    EmptyResult,

    #[error("{0}")]
    Upstream(String),

    #[error("An unexpected error occurred while fetching the playlist data: {0}")]
    Unexpected(String),
}

/// Tag for branching on a [`PlaylistError`] without matching its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    InvalidInput,
    Auth,
    NotFound,
    EmptyResult,
    Upstream,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Auth => "AUTH_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::EmptyResult => "EMPTY_RESULT",
            ErrorKind::Upstream => "UPSTREAM_ERROR",
            ErrorKind::Unexpected => "UNEXPECTED_ERROR",
        }
    }
}

impl PlaylistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlaylistError::Config => ErrorKind::Config,
            PlaylistError::InvalidInput(_) => ErrorKind::InvalidInput,
            PlaylistError::Auth => ErrorKind::Auth,
            PlaylistError::NotFound => ErrorKind::NotFound,
            PlaylistError::EmptyResult => ErrorKind::EmptyResult,
            PlaylistError::Upstream(_) => ErrorKind::Upstream,
            PlaylistError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<reqwest::Error> for PlaylistError {
    fn from(err: reqwest::Error) -> Self {
        PlaylistError::Unexpected(err.to_string())
    }
}

static PLAYLIST_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // Any URL carrying a list parameter
        Regex::new(r"[?&]list=([^&]+)").expect("list parameter regex"),
        // youtu.be short links
        Regex::new(r"youtu\.be/.*[?&]list=([^&]+)").expect("short link regex"),
        // Canonical playlist page
        Regex::new(r"youtube\.com/playlist\?list=([^&]+)").expect("playlist page regex"),
    ]
});

/// Pull the playlist identifier out of a URL.
///
/// Patterns are tried in order and the first match wins.
pub fn extract_playlist_id(url: &str) -> Option<PlaylistId> {
    PLAYLIST_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| PlaylistId::from(m.as_str()))
}

/// Configuration for the playlist fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// YouTube Data API key, sent as the `key` query parameter
    pub api_key: Option<String>,

    /// API base URL, without trailing slash
    pub api_base: String,

    /// Per-request deadline; `None` leaves requests unbounded
    pub timeout: Option<Duration>,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: YOUTUBE_API_BASE.to_string(),
            timeout: None,
            user_agent: format!("playlist-time/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetcherConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// The API key, if present and non-empty.
    fn api_key(&self) -> Result<&str, PlaylistError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(PlaylistError::Config)
    }
}

/// Anything that can resolve a playlist URL to its videos.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn fetch_playlist(&self, url: &str) -> Result<Playlist, PlaylistError>;
}

/// YouTube playlist fetcher.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, PlaylistError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("playlist-time")),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch the first page of a playlist and resolve every video's duration.
    pub async fn fetch_playlist(&self, url: &str) -> Result<Playlist, PlaylistError> {
        let api_key = self.config.api_key()?;

        let playlist_id = extract_playlist_id(url)
            .ok_or_else(|| PlaylistError::InvalidInput(url.to_string()))?;

        let listing = self.list_items(&playlist_id, api_key).await?;
        let truncated = listing.next_page_token.is_some();

        let video_ids: Vec<&str> = listing
            .items
            .iter()
            .filter_map(|entry| entry.video_id())
            .collect();

        let items = self.video_details(&video_ids, api_key).await?;

        debug!(
            "Resolved {} videos for playlist {} (truncated: {})",
            items.len(),
            playlist_id,
            truncated
        );

        Ok(Playlist::new(playlist_id, items, truncated))
    }

    /// Stage one: list up to one page of playlist entries.
    async fn list_items(
        &self,
        playlist_id: &PlaylistId,
        api_key: &str,
    ) -> Result<PlaylistItemsResponse, PlaylistError> {
        debug!("Listing items for playlist {}", playlist_id);

        let max_results = MAX_RESULTS.to_string();
        let response: PlaylistItemsResponse = self
            .client
            .get(format!("{}/playlistItems", self.config.api_base))
            .query(&[
                ("part", "contentDetails"),
                ("maxResults", max_results.as_str()),
                ("playlistId", playlist_id.as_str()),
                ("key", api_key),
            ])
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = &response.error {
            return Err(match error.code {
                Some(403) => PlaylistError::Auth,
                Some(404) => PlaylistError::NotFound,
                _ => PlaylistError::Upstream(
                    error.message().unwrap_or("Failed to fetch playlist").to_string(),
                ),
            });
        }

        if response.items.is_empty() {
            return Err(PlaylistError::EmptyResult);
        }

        debug!("Playlist {} listed {} entries", playlist_id, response.items.len());
        Ok(response)
    }

    /// Stage two: one batched metadata lookup for the listed videos.
    async fn video_details(
        &self,
        video_ids: &[&str],
        api_key: &str,
    ) -> Result<Vec<PlaylistItemRecord>, PlaylistError> {
        let ids = video_ids.join(",");
        debug!("Fetching details for {} videos", video_ids.len());

        let response: VideosResponse = self
            .client
            .get(format!("{}/videos", self.config.api_base))
            .query(&[
                ("part", "contentDetails,snippet"),
                ("id", ids.as_str()),
                ("key", api_key),
            ])
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = &response.error {
            return Err(PlaylistError::Upstream(
                error
                    .message()
                    .unwrap_or("Failed to fetch video details")
                    .to_string(),
            ));
        }

        Ok(response
            .items
            .iter()
            .map(|video| {
                PlaylistItemRecord::new(
                    video.title(),
                    parse_broadcast_duration(video.duration_token()),
                )
            })
            .collect())
    }
}

#[async_trait]
impl PlaylistSource for Fetcher {
    async fn fetch_playlist(&self, url: &str) -> Result<Playlist, PlaylistError> {
        Fetcher::fetch_playlist(self, url).await
    }
}

/// Build a fetcher for a single call and fetch the playlist.
pub async fn fetch_playlist(url: &str, config: FetcherConfig) -> Result<Playlist, PlaylistError> {
    Fetcher::new(config)?.fetch_playlist(url).await
}

/// Mock source for testing.
#[cfg(test)]
pub struct MockSource {
    playlist: Option<Playlist>,
    error: fn() -> PlaylistError,
}

#[cfg(test)]
impl MockSource {
    pub fn returning(playlist: Playlist) -> Self {
        Self {
            playlist: Some(playlist),
            error: || PlaylistError::Unexpected("unused".to_string()),
        }
    }

    pub fn failing(error: fn() -> PlaylistError) -> Self {
        Self {
            playlist: None,
            error,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl PlaylistSource for MockSource {
    async fn fetch_playlist(&self, url: &str) -> Result<Playlist, PlaylistError> {
        if extract_playlist_id(url).is_none() {
            return Err(PlaylistError::InvalidInput(url.to_string()));
        }
        match &self.playlist {
            Some(playlist) => Ok(playlist.clone()),
            None => Err((self.error)()),
        }
    }
}
