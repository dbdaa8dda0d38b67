//! Watch-time projection.
//!
//! Computes adjusted watch time from a base duration:
//! - Playback speed is applied first
//! - Breaks are then inserted after every full interval of adjusted time

use serde::Serialize;

use crate::models::{BreakSchedule, Playlist, SpeedMultiplier};

/// Project total watch time in seconds.
pub fn project_watch_time(base_seconds: f64, speed: SpeedMultiplier, breaks: BreakSchedule) -> f64 {
    let adjusted = adjust_for_speed(base_seconds, speed);
    adjusted + break_seconds(adjusted, breaks)
}

/// Raw duration divided by playback speed.
pub fn adjust_for_speed(base_seconds: f64, speed: SpeedMultiplier) -> f64 {
    base_seconds / speed.value()
}

/// Number of full break intervals contained in the adjusted watch time.
pub fn break_count(adjusted_seconds: f64, breaks: BreakSchedule) -> u64 {
    if !breaks.is_enabled() {
        return 0;
    }
    (adjusted_seconds / (breaks.interval_minutes * 60.0)).floor() as u64
}

/// Total time spent on breaks, in seconds.
pub fn break_seconds(adjusted_seconds: f64, breaks: BreakSchedule) -> f64 {
    if !breaks.is_enabled() {
        return 0.0;
    }
    break_count(adjusted_seconds, breaks) as f64 * breaks.duration_minutes * 60.0
}

/// Breakdown of a projected watch time for one playlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchTimeEstimate {
    pub video_count: usize,
    pub truncated: bool,
    pub speed: SpeedMultiplier,
    pub breaks: BreakSchedule,
    pub base_seconds: f64,
    pub adjusted_seconds: f64,
    pub break_count: u64,
    pub break_seconds: f64,
    pub total_seconds: f64,
}

/// Build the full estimate for a fetched playlist.
pub fn estimate(
    playlist: &Playlist,
    speed: SpeedMultiplier,
    breaks: BreakSchedule,
) -> WatchTimeEstimate {
    estimate_seconds(playlist.total_seconds() as f64, speed, breaks)
        .with_playlist(playlist.len(), playlist.truncated)
}

/// Build an estimate from a bare duration, with no playlist attached.
pub fn estimate_seconds(
    base_seconds: f64,
    speed: SpeedMultiplier,
    breaks: BreakSchedule,
) -> WatchTimeEstimate {
    let adjusted = adjust_for_speed(base_seconds, speed);
    let count = break_count(adjusted, breaks);
    let pauses = break_seconds(adjusted, breaks);

    WatchTimeEstimate {
        video_count: 0,
        truncated: false,
        speed,
        breaks,
        base_seconds,
        adjusted_seconds: adjusted,
        break_count: count,
        break_seconds: pauses,
        total_seconds: adjusted + pauses,
    }
}

impl WatchTimeEstimate {
    fn with_playlist(mut self, video_count: usize, truncated: bool) -> Self {
        self.video_count = video_count;
        self.truncated = truncated;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlaylistId, PlaylistItemRecord};

    fn speed(value: f64) -> SpeedMultiplier {
        SpeedMultiplier::new(value).unwrap()
    }

    #[test]
    fn test_project_speed_only() {
        let total = project_watch_time(7200.0, speed(2.0), BreakSchedule::new(0.0, 0.0));
        assert_eq!(total, 3600.0);
    }

    #[test]
    fn test_project_with_breaks() {
        // 120 minutes, a 5 minute break after every 30 = 4 breaks
        let total = project_watch_time(7200.0, speed(1.0), BreakSchedule::new(30.0, 5.0));
        assert_eq!(total, 8400.0);
    }

    #[test]
    fn test_breaks_use_adjusted_time() {
        // 7200s at 2x = 3600s adjusted, so only 2 intervals of 30 minutes
        let breaks = BreakSchedule::new(30.0, 5.0);
        let total = project_watch_time(7200.0, speed(2.0), breaks);
        assert_eq!(total, 3600.0 + 2.0 * 300.0);
    }

    #[test]
    fn test_zero_interval_disables_breaks() {
        let total = project_watch_time(7200.0, speed(1.0), BreakSchedule::new(0.0, 5.0));
        assert_eq!(total, 7200.0);
    }

    #[test]
    fn test_zero_duration_disables_breaks() {
        let total = project_watch_time(7200.0, speed(1.0), BreakSchedule::new(30.0, 0.0));
        assert_eq!(total, 7200.0);
    }

    #[test]
    fn test_partial_interval_earns_no_break() {
        let breaks = BreakSchedule::new(30.0, 5.0);
        assert_eq!(break_count(1799.0, breaks), 0);
        assert_eq!(break_count(1800.0, breaks), 1);
        assert_eq!(project_watch_time(1799.0, speed(1.0), breaks), 1799.0);
    }

    #[test]
    fn test_slow_speed_lengthens() {
        let total = project_watch_time(600.0, speed(0.5), BreakSchedule::none());
        assert_eq!(total, 1200.0);
    }

    #[test]
    fn test_no_rounding() {
        let total = project_watch_time(100.0, speed(3.0), BreakSchedule::none());
        assert!((total - 33.333_333).abs() < 1e-5);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let breaks = BreakSchedule::new(25.0, 5.0);
        let first = project_watch_time(12_345.0, speed(1.25), breaks);
        let second = project_watch_time(12_345.0, speed(1.25), breaks);
        assert_eq!(first, second);
    }

    #[test]
    fn test_estimate_breakdown() {
        let playlist = Playlist::new(
            PlaylistId::from("PLx"),
            vec![
                PlaylistItemRecord::new("a", 3600),
                PlaylistItemRecord::new("b", 3600),
            ],
            true,
        );

        let est = estimate(&playlist, speed(1.0), BreakSchedule::new(30.0, 5.0));

        assert_eq!(est.video_count, 2);
        assert!(est.truncated);
        assert_eq!(est.base_seconds, 7200.0);
        assert_eq!(est.adjusted_seconds, 7200.0);
        assert_eq!(est.break_count, 4);
        assert_eq!(est.break_seconds, 1200.0);
        assert_eq!(est.total_seconds, 8400.0);
    }

    #[test]
    fn test_estimate_matches_projection() {
        let breaks = BreakSchedule::new(45.0, 10.0);
        let est = estimate_seconds(20_000.0, speed(1.5), breaks);
        assert_eq!(
            est.total_seconds,
            project_watch_time(20_000.0, speed(1.5), breaks)
        );
        assert_eq!(est.video_count, 0);
    }
}
