//! # Playlist Time
//!
//! Estimates how long a YouTube playlist takes to watch, adjusted for
//! playback speed and scheduled breaks.
//!
//! ## Architecture
//!
//! - **models**: Playlist records, speed and break parameters
//! - **duration**: Broadcast duration token parsing (`PT1H2M3S`)
//! - **fetch**: YouTube Data API client and playlist resolution
//! - **calculate**: Watch-time projection
//! - **format**: Human-readable duration rendering
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod duration;
pub mod fetch;
pub mod format;
pub mod models;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "1h", "2m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    let secs = num.checked_mul(multiplier)?;
    Some(Duration::from_secs(secs))
}
