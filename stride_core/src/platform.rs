//! The fitness platform as seen from the compiler side.
//!
//! The real client (login, tokens, HTTP) lives outside this crate. Callers
//! pass an implementation in explicitly; nothing here holds a global session.

use crate::{CompiledWorkout, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier the platform assigns to an uploaded workout
pub type WorkoutId = u64;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub workout_id: WorkoutId,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReceipt {
    pub workout_schedule_id: u64,
}

/// An upcoming race or event from the athlete's calendar
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RaceGoal {
    pub name: String,
    pub race_date: NaiveDate,
}

/// One recent run, summarized for the coaching agent
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub name: String,
    pub distance_m: f64,
    pub duration_sec: f64,
    pub avg_speed_ms: Option<f64>,
    pub max_speed_ms: Option<f64>,
    pub avg_hr: Option<u32>,
}

/// Profile, goals and recent activity handed to the agent
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct AthleteContext {
    pub full_name: Option<String>,
    pub upcoming_races: Vec<RaceGoal>,
    pub recent_runs: Vec<RunSummary>,
}

/// Operations the batch uploader needs from the platform
pub trait WorkoutPlatform {
    /// Upload a compiled workout to the athlete's library
    fn upload_workout(&mut self, workout: &CompiledWorkout) -> Result<UploadReceipt>;

    /// Put an uploaded workout on the calendar
    ///
    /// `Ok(None)` means the scheduling endpoint refused in a known way; the
    /// workout stays uploaded and the batch carries on.
    fn schedule_workout(
        &mut self,
        workout_id: WorkoutId,
        date: NaiveDate,
    ) -> Result<Option<ScheduleReceipt>>;

    /// Profile and activity data for the agent; not used by the compiler
    fn fetch_user_context(&mut self) -> Result<AthleteContext>;
}
