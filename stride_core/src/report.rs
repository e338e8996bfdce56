//! CSV export of batch upload reports.
//!
//! Each run appends one row per workout, so a single file accumulates the
//! history of every upload run.

use crate::batch::{BatchEntry, BatchReport, WorkoutOutcome};
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ReportRow {
    pub run_id: String,
    pub finished_at: String,
    pub workout_name: String,
    pub schedule_date: Option<String>,
    pub status: String,
    pub workout_id: Option<u64>,
    pub schedule_id: Option<u64>,
    pub detail: Option<String>,
}

impl ReportRow {
    fn new(report: &BatchReport, entry: &BatchEntry) -> Self {
        let (status, workout_id, schedule_id, detail) = match &entry.outcome {
            WorkoutOutcome::Scheduled {
                workout_id,
                schedule_id,
            } => ("scheduled", Some(*workout_id), Some(*schedule_id), None),
            WorkoutOutcome::Uploaded {
                workout_id,
                schedule_error,
            } => ("uploaded", Some(*workout_id), None, schedule_error.clone()),
            WorkoutOutcome::Failed { reason } => ("failed", None, None, Some(reason.clone())),
        };

        ReportRow {
            run_id: report.run_id.to_string(),
            finished_at: report.finished_at.to_rfc3339(),
            workout_name: entry.workout_name.clone(),
            schedule_date: entry.schedule_date.map(|d| d.to_string()),
            status: status.to_string(),
            workout_id,
            schedule_id,
            detail,
        }
    }
}

/// Append a report's rows to a CSV file, writing headers only for a new file
pub fn append_report_csv(report: &BatchReport, csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for entry in &report.entries {
        writer.serialize(ReportRow::new(report, entry))?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!(
        "Wrote {} report rows to {:?}",
        report.entries.len(),
        csv_path
    );
    Ok(report.entries.len())
}
