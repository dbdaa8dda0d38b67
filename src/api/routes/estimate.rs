use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate;
use crate::format::{format_duration, DisplayFormat};
use crate::models::{BreakSchedule, PlaylistId, PlaylistItemRecord, SpeedMultiplier};

/// Break interval used when the caller does not pick one, in minutes.
const DEFAULT_BREAK_INTERVAL: f64 = 30.0;

#[derive(Debug, Deserialize)]
pub struct EstimateParams {
    pub url: Option<String>,
    pub speed: Option<f64>,
    pub break_interval: Option<f64>,
    pub break_duration: Option<f64>,
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub playlist_id: PlaylistId,
    pub video_count: usize,
    pub truncated: bool,
    pub speed: f64,
    pub break_interval_minutes: f64,
    pub break_duration_minutes: f64,
    pub base_seconds: f64,
    pub adjusted_seconds: f64,
    pub break_count: u64,
    pub break_seconds: f64,
    pub total_seconds: f64,
    pub format: DisplayFormat,
    pub base_display: String,
    pub total_display: String,
    pub items: Vec<PlaylistItemRecord>,
}

pub async fn estimate(
    State(state): State<AppState>,
    query: Result<Query<EstimateParams>, QueryRejection>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let url = params
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Please enter a YouTube playlist URL".to_string()))?;

    let speed = SpeedMultiplier::new(params.speed.unwrap_or(1.0))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let format = match params.format.as_deref() {
        Some(f) => f.parse::<DisplayFormat>().map_err(ApiError::BadRequest)?,
        None => DisplayFormat::default(),
    };

    let breaks = BreakSchedule::new(
        params.break_interval.unwrap_or(DEFAULT_BREAK_INTERVAL),
        params.break_duration.unwrap_or(0.0),
    );

    let playlist = state.source.fetch_playlist(url).await?;
    let est = calculate::estimate(&playlist, speed, breaks);

    tracing::info!(
        "Estimated playlist {}: {} videos, {:.0}s base, {:.0}s total",
        playlist.playlist_id,
        est.video_count,
        est.base_seconds,
        est.total_seconds
    );

    Ok(Json(EstimateResponse {
        playlist_id: playlist.playlist_id,
        video_count: est.video_count,
        truncated: est.truncated,
        speed: speed.value(),
        break_interval_minutes: breaks.interval_minutes,
        break_duration_minutes: breaks.duration_minutes,
        base_seconds: est.base_seconds,
        adjusted_seconds: est.adjusted_seconds,
        break_count: est.break_count,
        break_seconds: est.break_seconds,
        total_seconds: est.total_seconds,
        format,
        base_display: format_duration(est.base_seconds, format),
        total_display: format_duration(est.total_seconds, format),
        items: playlist.items,
    }))
}
