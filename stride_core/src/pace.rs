//! Pace arithmetic.
//!
//! Paces are written as `M:SS` per kilometer; the platform's `pace.zone`
//! target wants a speed window in meters/second. A slower pace is a lower
//! speed, so the slow edge of the window is the minimum.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A speed window in m/s bracketing a pace
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaceWindow {
    pub min_speed: f64,
    pub max_speed: f64,
}

/// Parse `M:SS` into seconds per kilometer
pub fn parse_pace_secs(pace: &str) -> Result<u32> {
    let (mins, secs) = pace
        .trim()
        .split_once(':')
        .ok_or_else(|| Error::PaceParse(pace.to_string()))?;

    let mins: u32 = mins
        .trim()
        .parse()
        .map_err(|_| Error::PaceParse(pace.to_string()))?;
    let secs: u32 = secs
        .trim()
        .parse()
        .map_err(|_| Error::PaceParse(pace.to_string()))?;

    mins.checked_mul(60)
        .and_then(|m| m.checked_add(secs))
        .ok_or_else(|| Error::PaceParse(pace.to_string()))
}

/// Convert a pace plus a margin (seconds per km, both ways) into a speed window
///
/// Speeds are rounded to 4 decimal places. A margin that is not smaller than
/// the pace itself would put the fast edge at or beyond zero seconds per km and
/// is rejected with [`Error::DegenerateMargin`].
pub fn pace_window(pace: &str, margin_sec: u32) -> Result<PaceWindow> {
    let total_sec = parse_pace_secs(pace)?;

    if margin_sec >= total_sec {
        return Err(Error::DegenerateMargin {
            pace_sec: total_sec,
            margin_sec,
        });
    }

    let slowest_sec = f64::from(total_sec) + f64::from(margin_sec);
    let fastest_sec = f64::from(total_sec - margin_sec);

    let window = PaceWindow {
        min_speed: round4(1000.0 / slowest_sec),
        max_speed: round4(1000.0 / fastest_sec),
    };

    tracing::debug!(
        "Pace {} ±{}s -> {:.4}..{:.4} m/s",
        pace,
        margin_sec,
        window.min_speed,
        window.max_speed
    );
    Ok(window)
}

/// Round to 4 places, sending exact ties to the even neighbour (4:16 is 3.90625 m/s)
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}

/// Format seconds per km as `M:SS/km`
pub fn seconds_to_pace(seconds_per_km: f64) -> String {
    let mins = (seconds_per_km / 60.0).floor() as u64;
    let secs = (seconds_per_km % 60.0).floor() as u64;
    format!("{}:{:02}/km", mins, secs)
}

/// Format a speed in m/s as `M:SS/km`, or `N/A` for non-positive speeds
pub fn speed_to_pace(speed_ms: f64) -> String {
    if speed_ms <= 0.0 {
        return "N/A".into();
    }
    seconds_to_pace(1000.0 / speed_ms)
}
