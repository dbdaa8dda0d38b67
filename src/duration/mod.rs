//! Broadcast duration parsing.
//!
//! YouTube reports video length as an ISO-8601-style token such as
//! `PT1H2M3S`. Only the hour, minute and second components are understood;
//! anything else degrades to a partial or zero match rather than an error.

use std::sync::LazyLock;

use regex::Regex;

static BROADCAST_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("broadcast duration regex")
});

/// Convert a broadcast duration token into whole seconds.
///
/// Returns 0 when the token has no `PT` prefix at all. Component magnitudes
/// are unbounded; the sum saturates at `u64::MAX`.
pub fn parse_broadcast_duration(token: &str) -> u64 {
    let Some(caps) = BROADCAST_DURATION.captures(token) else {
        return 0;
    };

    // Groups only ever hold ASCII digits, so a failed parse means overflow
    let component = |idx: usize| -> u64 {
        caps.get(idx)
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3))
}
