//! Playlist records and viewing parameters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PlaylistId;

/// One video of a fetched playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItemRecord {
    /// Video title (empty when upstream omits it)
    pub title: String,

    /// Length of the video in whole seconds
    pub duration_seconds: u64,
}

impl PlaylistItemRecord {
    pub fn new(title: impl Into<String>, duration_seconds: u64) -> Self {
        Self {
            title: title.into(),
            duration_seconds,
        }
    }
}

/// Result of a single playlist fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub playlist_id: PlaylistId,

    pub items: Vec<PlaylistItemRecord>,

    /// Upstream reported more entries than the single page that was fetched.
    pub truncated: bool,

    pub fetched_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(playlist_id: PlaylistId, items: Vec<PlaylistItemRecord>, truncated: bool) -> Self {
        Self {
            playlist_id,
            items,
            truncated,
            fetched_at: Utc::now(),
        }
    }

    /// Sum of all item durations, in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.duration_seconds))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pauses inserted after every full interval of speed-adjusted watch time.
///
/// A zero (or negative) value in either field disables breaks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakSchedule {
    pub interval_minutes: f64,
    pub duration_minutes: f64,
}

impl BreakSchedule {
    pub fn new(interval_minutes: f64, duration_minutes: f64) -> Self {
        Self {
            interval_minutes,
            duration_minutes,
        }
    }

    /// No breaks at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.interval_minutes > 0.0 && self.duration_minutes > 0.0
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Playback speed must be a positive number, got {0}")]
pub struct InvalidSpeed(pub f64);

/// Playback speed, applied as a divisor to raw duration.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SpeedMultiplier(f64);

impl SpeedMultiplier {
    /// Speeds offered as one-click choices.
    pub const PRESETS: [f64; 5] = [0.5, 1.0, 1.25, 1.5, 2.0];

    pub const NORMAL: SpeedMultiplier = SpeedMultiplier(1.0);

    pub fn new(value: f64) -> Result<Self, InvalidSpeed> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(InvalidSpeed(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

impl FromStr for SpeedMultiplier {
    type Err = String;

    /// Accepts `1.5` as well as `1.5x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let num = s.strip_suffix(['x', 'X']).unwrap_or(s);
        let value: f64 = num
            .parse()
            .map_err(|_| format!("Invalid playback speed: {}", s))?;
        Self::new(value).map_err(|e| e.to_string())
    }
}

impl<'de> Deserialize<'de> for SpeedMultiplier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        SpeedMultiplier::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_playlist() -> Playlist {
        Playlist::new(
            PlaylistId::from("PLtest"),
            vec![
                PlaylistItemRecord::new("Intro", 600),
                PlaylistItemRecord::new("Part 1", 1800),
                PlaylistItemRecord::new("", 0),
            ],
            false,
        )
    }

    #[test]
    fn test_playlist_total_seconds() {
        let playlist = sample_playlist();
        assert_eq!(playlist.total_seconds(), 2400);
        assert_eq!(playlist.len(), 3);
        assert!(!playlist.is_empty());
    }

    #[test]
    fn test_playlist_total_saturates() {
        let playlist = Playlist::new(
            PlaylistId::from("PLhuge"),
            vec![
                PlaylistItemRecord::new("a", u64::MAX),
                PlaylistItemRecord::new("b", 10),
            ],
            false,
        );
        assert_eq!(playlist.total_seconds(), u64::MAX);
    }

    #[test]
    fn test_break_schedule_enabled() {
        assert!(BreakSchedule::new(30.0, 5.0).is_enabled());
        assert!(!BreakSchedule::new(0.0, 5.0).is_enabled());
        assert!(!BreakSchedule::new(30.0, 0.0).is_enabled());
        assert!(!BreakSchedule::new(-10.0, 5.0).is_enabled());
        assert!(!BreakSchedule::none().is_enabled());
    }

    #[test]
    fn test_speed_multiplier_rejects_non_positive() {
        assert_eq!(SpeedMultiplier::new(0.0), Err(InvalidSpeed(0.0)));
        assert!(SpeedMultiplier::new(-1.0).is_err());
        assert!(SpeedMultiplier::new(f64::NAN).is_err());
        assert!(SpeedMultiplier::new(f64::INFINITY).is_err());
        assert_eq!(SpeedMultiplier::new(1.25).unwrap().value(), 1.25);
    }

    #[test]
    fn test_speed_multiplier_presets_are_valid() {
        for preset in SpeedMultiplier::PRESETS {
            assert!(SpeedMultiplier::new(preset).is_ok());
        }
    }

    #[test]
    fn test_speed_multiplier_from_str() {
        assert_eq!("2".parse::<SpeedMultiplier>().unwrap().value(), 2.0);
        assert_eq!("1.5x".parse::<SpeedMultiplier>().unwrap().value(), 1.5);
        assert!("fast".parse::<SpeedMultiplier>().is_err());
        assert!("0".parse::<SpeedMultiplier>().is_err());
    }

    #[test]
    fn test_speed_multiplier_deserialize_validates() {
        let ok: SpeedMultiplier = serde_json::from_str("1.75").unwrap();
        assert_eq!(ok.value(), 1.75);
        assert!(serde_json::from_str::<SpeedMultiplier>("-2").is_err());
    }

    #[test]
    fn test_speed_multiplier_display() {
        assert_eq!(SpeedMultiplier::new(1.5).unwrap().to_string(), "1.5x");
        assert_eq!(SpeedMultiplier::default().to_string(), "1x");
    }

    #[test]
    fn test_playlist_serialization() {
        let playlist = sample_playlist();
        let json = serde_json::to_value(&playlist).unwrap();

        assert_eq!(json["playlist_id"], "PLtest");
        assert_eq!(json["items"][1]["title"], "Part 1");
        assert_eq!(json["items"][1]["duration_seconds"], 1800);
        assert_eq!(json["truncated"], false);
    }
}
