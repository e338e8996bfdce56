#![forbid(unsafe_code)]

//! Core workout compiler and plan upload logic for Stride.
//!
//! This crate provides:
//! - Abstract workout types (as authored by the coaching agent)
//! - The wire-format document types and lookup tables
//! - Pace-window arithmetic
//! - The step-tree compiler, duration estimator and workout assembler
//! - Plan validation, training zones and batch upload orchestration
//! - File-backed outbox platform and CSV batch reports

pub mod types;
pub mod wire;
pub mod error;
pub mod config;
pub mod logging;
pub mod pace;
pub mod compiler;
pub mod estimate;
pub mod validate;
pub mod zones;
pub mod platform;
pub mod batch;
pub mod outbox;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use wire::{CompiledStep, CompiledWorkout};
pub use config::Config;
pub use pace::{pace_window, PaceWindow};
pub use compiler::{assemble, compile_step, compile_steps, compile_workout};
pub use estimate::{estimated_duration_secs, total_distance_and_time, Totals};
pub use validate::validate_workout;
pub use platform::{AthleteContext, ScheduleReceipt, UploadReceipt, WorkoutPlatform};
pub use batch::{upload_plan, BatchReport, UploadPolicy, WorkoutOutcome};
pub use outbox::OutboxPlatform;
