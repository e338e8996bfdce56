//! File-backed outbox platform.
//!
//! Instead of talking to the remote API, compiled workouts and schedule
//! requests are appended to a JSONL file with file locking, for a separate
//! uploader (or a human) to replay. Ids are assigned sequentially per file.

use crate::platform::{AthleteContext, ScheduleReceipt, UploadReceipt, WorkoutId, WorkoutPlatform};
use crate::{CompiledWorkout, Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One line of the outbox
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboxRecord {
    Upload {
        workout_id: WorkoutId,
        queued_at: DateTime<Utc>,
        workout: CompiledWorkout,
    },
    Schedule {
        schedule_id: u64,
        workout_id: WorkoutId,
        date: NaiveDate,
        queued_at: DateTime<Utc>,
    },
}

/// JSONL outbox acting as a [`WorkoutPlatform`]
pub struct OutboxPlatform {
    path: PathBuf,
}

impl OutboxPlatform {
    /// Create an outbox writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a record built from the records already present, under one lock
    fn append_with<F>(&self, build: F) -> Result<Option<OutboxRecord>>
    where
        F: FnOnce(&[OutboxRecord]) -> Option<OutboxRecord>,
    {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        // Exclusive lock covers both the id scan and the append
        file.lock_exclusive()?;

        let existing = parse_records(&file)?;
        let Some(record) = build(&existing) else {
            file.unlock()?;
            return Ok(None);
        };

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(&record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;
        Ok(Some(record))
    }
}

impl WorkoutPlatform for OutboxPlatform {
    fn upload_workout(&mut self, workout: &CompiledWorkout) -> Result<UploadReceipt> {
        let record = self.append_with(|existing| {
            let uploads = existing
                .iter()
                .filter(|r| matches!(r, OutboxRecord::Upload { .. }))
                .count();
            Some(OutboxRecord::Upload {
                workout_id: uploads as u64 + 1,
                queued_at: Utc::now(),
                workout: workout.clone(),
            })
        })?;

        match record {
            Some(OutboxRecord::Upload { workout_id, .. }) => {
                tracing::debug!("Queued workout {} in outbox {:?}", workout_id, self.path);
                Ok(UploadReceipt { workout_id })
            }
            _ => Err(Error::Other("outbox did not record the upload".into())),
        }
    }

    fn schedule_workout(
        &mut self,
        workout_id: WorkoutId,
        date: NaiveDate,
    ) -> Result<Option<ScheduleReceipt>> {
        let record = self.append_with(|existing| {
            let known = existing.iter().any(|r| {
                matches!(r, OutboxRecord::Upload { workout_id: id, .. } if *id == workout_id)
            });
            if !known {
                return None;
            }
            let schedules = existing
                .iter()
                .filter(|r| matches!(r, OutboxRecord::Schedule { .. }))
                .count();
            Some(OutboxRecord::Schedule {
                schedule_id: schedules as u64 + 1,
                workout_id,
                date,
                queued_at: Utc::now(),
            })
        })?;

        match record {
            Some(OutboxRecord::Schedule { schedule_id, .. }) => Ok(Some(ScheduleReceipt {
                workout_schedule_id: schedule_id,
            })),
            _ => {
                tracing::warn!("Workout {} is not in outbox {:?}", workout_id, self.path);
                Ok(None)
            }
        }
    }

    fn fetch_user_context(&mut self) -> Result<AthleteContext> {
        Err(Error::Platform(
            "the file outbox has no athlete data".into(),
        ))
    }
}

fn parse_records(file: &File) -> Result<Vec<OutboxRecord>> {
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<OutboxRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse outbox record at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(records)
}

/// Read all records from an outbox file
pub fn read_records(path: &Path) -> Result<Vec<OutboxRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;
    let records = parse_records(&file)?;
    file.unlock()?;

    tracing::debug!("Read {} records from outbox", records.len());
    Ok(records)
}
