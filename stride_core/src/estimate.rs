//! Aggregate distance/time totals and the duration estimate.

use crate::{AbstractStep, DurationKind};

/// Fallback speed used to fold timed steps into a distance figure (m/s)
const FALLBACK_SPEED_MS: f64 = 3.33;

/// Baseline pace for the distance estimate, 5:00/km
const BASELINE_SECS_PER_KM: f64 = 300.0;

/// No workout is ever reported shorter than 30 minutes
pub const MIN_ESTIMATED_DURATION_SECS: u32 = 1800;

/// Summed meters of distance steps and seconds of timed steps
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub distance_m: f64,
    pub time_s: f64,
}

/// Sum distance and time over a step tree, multiplying through repeat counts
///
/// Steps with an unrecognized duration kind count towards neither total.
pub fn total_distance_and_time(steps: &[AbstractStep]) -> Totals {
    let mut totals = Totals::default();

    for step in steps {
        match step {
            AbstractStep::Repeat(repeat) => {
                let inner = total_distance_and_time(&repeat.steps);
                let count = f64::from(repeat.repeat_value);
                totals.distance_m += inner.distance_m * count;
                totals.time_s += inner.time_s * count;
            }
            AbstractStep::Leaf(leaf) => match leaf.duration_type {
                DurationKind::Distance => totals.distance_m += leaf.duration_value,
                DurationKind::Time => totals.time_s += leaf.duration_value,
                DurationKind::Unrecognized => {}
            },
        }
    }

    totals
}

/// Estimated workout duration in seconds, never below 30 minutes
///
/// Timed seconds are folded into distance at 3.33 m/s, the whole distance is
/// priced at 5:00/km, and the timed seconds are then added on top.
pub fn estimated_duration_secs(totals: &Totals) -> u32 {
    let estimated_distance = totals.distance_m + totals.time_s * FALLBACK_SPEED_MS;
    let distance_secs = (estimated_distance / 1000.0 * BASELINE_SECS_PER_KM).trunc();
    let estimate = (distance_secs + totals.time_s).trunc();

    if estimate < f64::from(MIN_ESTIMATED_DURATION_SECS) {
        MIN_ESTIMATED_DURATION_SECS
    } else if estimate >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        estimate as u32
    }
}
