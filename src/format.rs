//! Human-readable rendering of durations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// How a duration is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    /// `1d 2h 3m 4s`
    #[default]
    Detailed,
    Days,
    Hours,
    Minutes,
}

impl DisplayFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayFormat::Detailed => "detailed",
            DisplayFormat::Days => "days",
            DisplayFormat::Hours => "hours",
            DisplayFormat::Minutes => "minutes",
        }
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detailed" => Ok(DisplayFormat::Detailed),
            "days" => Ok(DisplayFormat::Days),
            "hours" => Ok(DisplayFormat::Hours),
            "minutes" => Ok(DisplayFormat::Minutes),
            other => Err(format!(
                "Unknown format: {}. Use 'detailed', 'days', 'hours' or 'minutes'.",
                other
            )),
        }
    }
}

/// Render a duration in seconds.
pub fn format_duration(seconds: f64, format: DisplayFormat) -> String {
    let seconds = seconds.max(0.0);

    match format {
        DisplayFormat::Days => format!("{:.1} days", round_to(seconds / SECONDS_PER_DAY, 1)),
        DisplayFormat::Hours => format!("{:.1} hours", round_to(seconds / SECONDS_PER_HOUR, 1)),
        DisplayFormat::Minutes => {
            format!("{:.0} minutes", round_to(seconds / SECONDS_PER_MINUTE, 0))
        }
        DisplayFormat::Detailed => format_detailed(seconds),
    }
}

/// Round halves up before formatting; `{:.N}` alone rounds them to even.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn format_detailed(seconds: f64) -> String {
    let whole = seconds.floor() as u64;
    let days = whole / 86_400;
    let hours = (whole % 86_400) / 3_600;
    let minutes = (whole % 3_600) / 60;
    let secs = whole % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}
