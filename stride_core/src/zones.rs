//! Training zones.
//!
//! Named paces come from config (seeded with a 3:14 marathon block), and
//! suggested speeds can be derived from the athlete's recent runs.

use crate::pace::{pace_window, speed_to_pace, PaceWindow};
use crate::platform::RunSummary;
use crate::{Config, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in zone paces, used when the config does not override them
pub static DEFAULT_ZONE_PACES: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    [("MP", "4:36"), ("INT", "4:15"), ("TEMPO", "4:25"), ("EASY", "5:15")]
        .into_iter()
        .map(|(name, pace)| (name.to_string(), pace.to_string()))
        .collect()
});

/// Resolve a zone name (case-insensitive) or a literal `M:SS` pace to a window
pub fn zone_window(config: &Config, zone_or_pace: &str, margin_sec: Option<u32>) -> Result<PaceWindow> {
    let margin = margin_sec.unwrap_or(config.paces.default_margin_sec);
    let pace = config
        .paces
        .zones
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone_or_pace))
        .map(|(_, pace)| pace.as_str())
        .unwrap_or(zone_or_pace);
    pace_window(pace, margin)
}

/// Windows for every configured zone, in name order
pub fn configured_windows(config: &Config) -> Result<Vec<(String, String, PaceWindow)>> {
    config
        .paces
        .zones
        .iter()
        .map(|(name, pace)| {
            let window = pace_window(pace, config.paces.default_margin_sec)?;
            Ok((name.clone(), pace.clone(), window))
        })
        .collect()
}

/// Speeds suggested from recent runs (m/s, 2 decimal places)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SuggestedZones {
    pub easy_speed_ms: f64,
    pub easy_pace: String,
    pub tempo_speed_ms: f64,
    pub tempo_pace: String,
    pub interval_speed_ms: f64,
    pub interval_pace: String,
}

/// Derive easy/tempo/interval speeds from the average and fastest recent runs
///
/// Returns `None` when no run carries an average speed.
pub fn suggest_zones(runs: &[RunSummary]) -> Option<SuggestedZones> {
    let speeds: Vec<f64> = runs
        .iter()
        .filter_map(|r| r.avg_speed_ms)
        .filter(|s| *s > 0.0)
        .collect();
    if speeds.is_empty() {
        return None;
    }

    let avg = speeds.iter().sum::<f64>() / speeds.len() as f64;
    let fastest = speeds.iter().copied().fold(f64::MIN, f64::max);

    let easy = avg * 0.85;
    let tempo = avg * 1.05;
    let interval = fastest * 1.05;

    Some(SuggestedZones {
        easy_speed_ms: round2(easy),
        easy_pace: speed_to_pace(easy),
        tempo_speed_ms: round2(tempo),
        tempo_pace: speed_to_pace(tempo),
        interval_speed_ms: round2(interval),
        interval_pace: speed_to_pace(interval),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn run(speed: Option<f64>) -> RunSummary {
        RunSummary {
            date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            name: "Run".into(),
            distance_m: 10000.0,
            duration_sec: 3000.0,
            avg_speed_ms: speed,
            max_speed_ms: None,
            avg_hr: Some(150),
        }
    }

    #[test]
    fn test_zone_name_resolves_case_insensitively() {
        let config = Config::default();
        let by_name = zone_window(&config, "mp", Some(10)).unwrap();
        let literal = pace_window("4:36", 10).unwrap();
        assert_eq!(by_name, literal);
    }

    #[test]
    fn test_literal_pace_uses_default_margin() {
        let config = Config::default();
        let window = zone_window(&config, "5:00", None).unwrap();
        assert_eq!(window, pace_window("5:00", 5).unwrap());
    }

    #[test]
    fn test_unknown_zone_is_parse_error() {
        let config = Config::default();
        assert!(zone_window(&config, "RECOVERY", None).is_err());
    }

    #[test]
    fn test_configured_windows_sorted() {
        let windows = configured_windows(&Config::default()).unwrap();
        let names: Vec<&str> = windows.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, vec!["EASY", "INT", "MP", "TEMPO"]);
    }

    #[test]
    fn test_suggest_zones() {
        let runs = vec![run(Some(3.2)), run(Some(4.8)), run(None)];
        let zones = suggest_zones(&runs).unwrap();
        assert_eq!(zones.easy_speed_ms, 3.4);
        assert_eq!(zones.tempo_speed_ms, 4.2);
        assert_eq!(zones.interval_speed_ms, 5.04);
        assert_eq!(zones.tempo_pace, "3:58/km");
    }

    #[test]
    fn test_suggest_zones_without_speeds() {
        assert!(suggest_zones(&[run(None)]).is_none());
        assert!(suggest_zones(&[]).is_none());
    }
}
