//! Abstract workout types as authored by the coaching agent.
//!
//! This is the simplified vocabulary the agent writes plans in:
//! - Leaf steps (warmup, interval, recovery, ...) with a duration and optional pace target
//! - Repeat blocks wrapping an ordered list of child steps, nested arbitrarily
//! - Whole workouts, and planned workouts carrying a schedule date
//!
//! Enum values the compiler does not know deserialize to an explicit
//! `Unrecognized` variant instead of failing, so a plan with a typo still
//! compiles with the documented fallback mapping.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

// ============================================================================
// Step Vocabulary
// ============================================================================

/// What the athlete is doing during a step
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intensity {
    Warmup,
    Cooldown,
    Interval,
    Recovery,
    Rest,
    #[default]
    Active,
    #[serde(other)]
    Unrecognized,
}

/// How a step ends
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationKind {
    /// `duration_value` is meters
    #[default]
    Distance,
    /// `duration_value` is seconds
    Time,
    #[serde(other)]
    Unrecognized,
}

/// What the watch guides the athlete towards during a step
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    #[default]
    None,
    /// Speed window in m/s, carried in the target values
    Speed,
    #[serde(other)]
    Unrecognized,
}

// ============================================================================
// Steps
// ============================================================================

/// A single executable step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeafStep {
    #[serde(default)]
    pub intensity: Intensity,

    #[serde(default)]
    pub duration_type: DurationKind,

    #[serde(default)]
    pub duration_value: f64,

    #[serde(default)]
    pub target_type: TargetKind,

    /// Slowest speed of the target window (m/s), kept exactly as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_one: Option<Number>,

    /// Fastest speed of the target window (m/s), kept exactly as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_two: Option<Number>,
}

impl LeafStep {
    /// Distance-based step without a target
    pub fn distance(intensity: Intensity, meters: f64) -> Self {
        Self {
            intensity,
            duration_type: DurationKind::Distance,
            duration_value: meters,
            ..Default::default()
        }
    }

    /// Time-based step without a target
    pub fn time(intensity: Intensity, seconds: f64) -> Self {
        Self {
            intensity,
            duration_type: DurationKind::Time,
            duration_value: seconds,
            ..Default::default()
        }
    }

    /// Attach a speed window (min, max in m/s)
    pub fn with_speed(mut self, min_speed: f64, max_speed: f64) -> Self {
        self.target_type = TargetKind::Speed;
        self.target_value_one = Number::from_f64(min_speed);
        self.target_value_two = Number::from_f64(max_speed);
        self
    }

    /// Both target values as written, if this step targets speed and carries them
    pub fn speed_targets(&self) -> Option<(&Number, &Number)> {
        match (self.target_type, &self.target_value_one, &self.target_value_two) {
            (TargetKind::Speed, Some(one), Some(two)) => Some((one, two)),
            _ => None,
        }
    }

    /// Both speed bounds in m/s, if this step targets speed and carries them
    pub fn speed_bounds(&self) -> Option<(f64, f64)> {
        let (one, two) = self.speed_targets()?;
        Some((one.as_f64()?, two.as_f64()?))
    }
}

/// A block repeating its children `repeat_value` times
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatStep {
    #[serde(default = "default_repeat_value")]
    pub repeat_value: u32,

    #[serde(default)]
    pub steps: Vec<AbstractStep>,
}

fn default_repeat_value() -> u32 {
    1
}

const REPEAT_TAG: &str = "WorkoutRepeatStep";

/// A step in an abstract workout, tagged by `type` on the wire
///
/// Only `"WorkoutRepeatStep"` selects a repeat block. Any other tag, or none
/// at all, reads the step as a leaf.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum AbstractStep {
    #[serde(rename = "WorkoutStep")]
    Leaf(LeafStep),
    #[serde(rename = "WorkoutRepeatStep")]
    Repeat(RepeatStep),
}

impl<'de> Deserialize<'de> for AbstractStep {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let is_repeat = value.get("type").and_then(Value::as_str) == Some(REPEAT_TAG);

        if is_repeat {
            serde_json::from_value(value)
                .map(AbstractStep::Repeat)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(AbstractStep::Leaf)
                .map_err(D::Error::custom)
        }
    }
}

impl AbstractStep {
    /// Build a repeat block
    pub fn repeat(count: u32, steps: Vec<AbstractStep>) -> Self {
        AbstractStep::Repeat(RepeatStep {
            repeat_value: count,
            steps,
        })
    }
}

impl From<LeafStep> for AbstractStep {
    fn from(step: LeafStep) -> Self {
        AbstractStep::Leaf(step)
    }
}

// ============================================================================
// Workouts and Plans
// ============================================================================

/// A complete workout in the simplified format
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbstractWorkout {
    #[serde(default = "default_workout_name")]
    pub workout_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub steps: Vec<AbstractStep>,
}

fn default_workout_name() -> String {
    "Untitled Workout".into()
}

/// A workout as it appears in a plan, with the day it should land on
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedWorkout {
    #[serde(flatten)]
    pub workout: AbstractWorkout,

    /// `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`
    #[serde(
        rename = "scheduleDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub schedule_date: Option<String>,
}
