//! Plan parsing, preview and batch upload.
//!
//! A plan is a JSON array of workouts, each optionally carrying a
//! `scheduleDate`. Every workout is compiled and sent on its own: a failure on
//! one item is recorded in the report and the batch moves on, because the
//! platform has no cross-workout transaction to roll back.

use crate::compiler::compile_workout;
use crate::platform::{WorkoutId, WorkoutPlatform};
use crate::validate::validate_workout;
use crate::{Error, PlannedWorkout, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parse a plan document, rejecting anything but a non-empty array
pub fn parse_plan(json: &str) -> Result<Vec<PlannedWorkout>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(Error::InvalidPlan(
            "Plan must be a JSON array of workouts".into(),
        ));
    }

    let plan: Vec<PlannedWorkout> = serde_json::from_value(value)?;
    if plan.is_empty() {
        return Err(Error::InvalidPlan("Plan is empty".into()));
    }

    tracing::debug!("Parsed plan with {} workouts", plan.len());
    Ok(plan)
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` into a calendar day
pub fn parse_schedule_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| Error::ScheduleDate(raw.to_string()))
}

/// Short markdown listing of a plan for confirmation before upload
pub fn preview(plan: &[PlannedWorkout]) -> String {
    let mut summary = format!("**Plan with {} workouts:**\n\n", plan.len());
    for planned in plan {
        let date = planned.schedule_date.as_deref().unwrap_or("TBD");
        summary.push_str(&format!(
            "• {}: **{}** - {}\n",
            date, planned.workout.workout_name, planned.workout.description
        ));
    }
    summary.push_str("\n*Reply 'yes' to upload these workouts.*");
    summary
}

/// How a batch upload behaves
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    /// Attempts per upload and per schedule call
    pub max_attempts: u32,
    /// Refuse workouts that fail validation instead of compiling with fallbacks
    pub strict: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            strict: false,
        }
    }
}

/// What happened to one workout of a batch
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkoutOutcome {
    /// Uploaded and placed on the calendar
    Scheduled {
        workout_id: WorkoutId,
        schedule_id: u64,
    },
    /// Uploaded; either no date was requested or scheduling failed
    Uploaded {
        workout_id: WorkoutId,
        schedule_error: Option<String>,
    },
    /// Nothing reached the calendar
    Failed { reason: String },
}

impl WorkoutOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            WorkoutOutcome::Scheduled { .. } => true,
            WorkoutOutcome::Uploaded { schedule_error, .. } => schedule_error.is_none(),
            WorkoutOutcome::Failed { .. } => false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchEntry {
    pub workout_name: String,
    pub schedule_date: Option<NaiveDate>,
    pub outcome: WorkoutOutcome,
}

/// Result of uploading a whole plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    /// One line per workout, headed by the success ratio
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "**Uploaded {}/{} workouts:**",
            self.success_count(),
            self.entries.len()
        )];

        for entry in &self.entries {
            let line = match (&entry.outcome, entry.schedule_date) {
                (WorkoutOutcome::Scheduled { .. }, Some(date)) => {
                    format!("✓ {} scheduled for {}", entry.workout_name, date)
                }
                (WorkoutOutcome::Scheduled { .. }, None) => {
                    format!("✓ {} scheduled", entry.workout_name)
                }
                (WorkoutOutcome::Uploaded { schedule_error: None, workout_id }, _) => {
                    format!("✓ {} uploaded (ID: {})", entry.workout_name, workout_id)
                }
                (WorkoutOutcome::Uploaded { schedule_error: Some(err), workout_id }, _) => {
                    format!(
                        "⚠ {} uploaded (ID: {}) but not scheduled: {}",
                        entry.workout_name, workout_id, err
                    )
                }
                (WorkoutOutcome::Failed { reason }, _) => {
                    format!("✗ {}: {}", entry.workout_name, reason)
                }
            };
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// Compile, upload and schedule every workout of a plan
pub fn upload_plan<P>(platform: &mut P, plan: &[PlannedWorkout], policy: &UploadPolicy) -> BatchReport
where
    P: WorkoutPlatform + ?Sized,
{
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    tracing::info!("Starting upload run {} with {} workouts", run_id, plan.len());

    let entries = plan
        .iter()
        .enumerate()
        .map(|(idx, planned)| {
            tracing::info!(
                "Processing {}/{}: {}",
                idx + 1,
                plan.len(),
                planned.workout.workout_name
            );
            let (schedule_date, outcome) = upload_one(platform, planned, policy);
            if let WorkoutOutcome::Failed { reason } = &outcome {
                tracing::warn!("{} failed: {}", planned.workout.workout_name, reason);
            }
            BatchEntry {
                workout_name: planned.workout.workout_name.clone(),
                schedule_date,
                outcome,
            }
        })
        .collect();

    let report = BatchReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        entries,
    };
    tracing::info!(
        "Upload run {} finished: {}/{} succeeded",
        run_id,
        report.success_count(),
        report.entries.len()
    );
    report
}

fn upload_one<P>(
    platform: &mut P,
    planned: &PlannedWorkout,
    policy: &UploadPolicy,
) -> (Option<NaiveDate>, WorkoutOutcome)
where
    P: WorkoutPlatform + ?Sized,
{
    if policy.strict {
        let issues = validate_workout(&planned.workout);
        if !issues.is_empty() {
            return (
                None,
                WorkoutOutcome::Failed {
                    reason: format!("validation failed: {}", issues.join("; ")),
                },
            );
        }
    }

    // Parse the date before uploading so a bad date never leaves an orphan
    let schedule_date = match planned.schedule_date.as_deref().map(parse_schedule_date) {
        None => None,
        Some(Ok(date)) => Some(date),
        Some(Err(e)) => {
            return (None, WorkoutOutcome::Failed { reason: e.to_string() });
        }
    };

    let document = compile_workout(&planned.workout);

    let receipt = match with_retry("upload", policy.max_attempts, || {
        platform.upload_workout(&document)
    }) {
        Ok(receipt) => receipt,
        Err(e) => {
            return (schedule_date, WorkoutOutcome::Failed { reason: e.to_string() });
        }
    };
    let workout_id = receipt.workout_id;
    tracing::debug!("Uploaded {} as {}", planned.workout.workout_name, workout_id);

    let Some(date) = schedule_date else {
        return (
            None,
            WorkoutOutcome::Uploaded {
                workout_id,
                schedule_error: None,
            },
        );
    };

    let outcome = match with_retry("schedule", policy.max_attempts, || {
        platform.schedule_workout(workout_id, date)
    }) {
        Ok(Some(scheduled)) => WorkoutOutcome::Scheduled {
            workout_id,
            schedule_id: scheduled.workout_schedule_id,
        },
        Ok(None) => {
            tracing::warn!("Could not schedule workout {} for {}", workout_id, date);
            WorkoutOutcome::Uploaded {
                workout_id,
                schedule_error: Some("schedule request was refused".into()),
            }
        }
        Err(e) => WorkoutOutcome::Uploaded {
            workout_id,
            schedule_error: Some(e.to_string()),
        },
    };

    (schedule_date, outcome)
}

fn with_retry<T>(what: &str, max_attempts: u32, mut op: impl FnMut() -> Result<T>) -> Result<T> {
    let attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!("{} attempt {}/{} failed: {}", what, attempt, attempts, e);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
