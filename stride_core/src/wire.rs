//! Wire-format document types for the platform's workout API.
//!
//! Field names, key order and the presence/absence of optional keys are part
//! of the contract: the platform rejects or mis-renders documents that carry
//! a unit on a time step, or a `null` where a key should be missing. Optional
//! keys are therefore always skipped rather than serialized as `null`.

use crate::{DurationKind, Intensity, TargetKind};
use serde::{Deserialize, Serialize};
use serde_json::Number;

// ============================================================================
// Reference Objects
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepTypeRef {
    pub step_type_id: u32,
    pub step_type_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndCondition {
    pub condition_type_id: u32,
    pub condition_type_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayable: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetTypeRef {
    pub workout_target_type_id: u32,
    pub workout_target_type_key: String,
    pub display_order: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistanceUnit {
    pub unit_id: u32,
    pub unit_key: String,
    pub factor: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SportType {
    pub sport_type_id: u32,
    pub sport_type_key: String,
}

// ============================================================================
// Lookup Tables
// ============================================================================

/// Step type codes for an intensity. ACTIVE shares INTERVAL's codes and
/// anything unrecognized falls back to ACTIVE.
pub fn step_type_for(intensity: Intensity) -> StepTypeRef {
    let (id, key) = match intensity {
        Intensity::Warmup => (1, "warmup"),
        Intensity::Cooldown => (2, "cooldown"),
        Intensity::Interval => (3, "interval"),
        Intensity::Recovery => (4, "recovery"),
        Intensity::Rest => (5, "rest"),
        Intensity::Active | Intensity::Unrecognized => (3, "interval"),
    };
    StepTypeRef {
        step_type_id: id,
        step_type_key: key.into(),
        display_order: Some(id),
    }
}

/// End condition for a duration kind; unrecognized kinds end like DISTANCE
pub fn end_condition_for(kind: DurationKind) -> EndCondition {
    let (id, key) = match kind {
        DurationKind::Time => (2, "time"),
        DurationKind::Distance | DurationKind::Unrecognized => (3, "distance"),
    };
    EndCondition {
        condition_type_id: id,
        condition_type_key: key.into(),
        display_order: Some(id),
        displayable: Some(true),
    }
}

/// Target type for a target kind; unrecognized kinds get no target
pub fn target_type_for(kind: TargetKind) -> TargetTypeRef {
    let (id, key) = match kind {
        TargetKind::Speed => (6, "pace.zone"),
        TargetKind::None | TargetKind::Unrecognized => (1, "no.target"),
    };
    TargetTypeRef {
        workout_target_type_id: id,
        workout_target_type_key: key.into(),
        display_order: id,
    }
}

/// Step type of every repeat group
pub fn repeat_step_type() -> StepTypeRef {
    StepTypeRef {
        step_type_id: 6,
        step_type_key: "repeat".into(),
        display_order: None,
    }
}

/// End condition of every repeat group
pub fn iterations_end_condition() -> EndCondition {
    EndCondition {
        condition_type_id: 7,
        condition_type_key: "iterations".into(),
        display_order: None,
        displayable: None,
    }
}

/// Preferred unit attached to distance steps
pub fn kilometer_unit() -> DistanceUnit {
    DistanceUnit {
        unit_id: 2,
        unit_key: "kilometer".into(),
        factor: 100000.0,
    }
}

pub fn running_sport() -> SportType {
    SportType {
        sport_type_id: 1,
        sport_type_key: "running".into(),
    }
}

// ============================================================================
// Compiled Steps and Documents
// ============================================================================

/// A compiled executable step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableStep {
    pub step_order: u32,
    pub step_type: StepTypeRef,
    pub end_condition: EndCondition,
    pub end_condition_value: f64,
    pub target_type: TargetTypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_end_condition_unit: Option<DistanceUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_one: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_two: Option<Number>,
}

/// A compiled repeat group. `end_condition_value` mirrors
/// `number_of_iterations`; the platform expects both.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatGroup {
    pub step_order: u32,
    pub step_type: StepTypeRef,
    pub number_of_iterations: u32,
    pub workout_steps: Vec<CompiledStep>,
    pub end_condition: EndCondition,
    pub end_condition_value: f64,
    pub smart_repeat: bool,
}

/// A step in platform vocabulary, tagged by `type`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CompiledStep {
    #[serde(rename = "ExecutableStepDTO")]
    Executable(ExecutableStep),
    #[serde(rename = "RepeatGroupDTO")]
    RepeatGroup(RepeatGroup),
}

impl CompiledStep {
    pub fn step_order(&self) -> u32 {
        match self {
            CompiledStep::Executable(step) => step.step_order,
            CompiledStep::RepeatGroup(group) => group.step_order,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSegment {
    pub segment_order: u32,
    pub sport_type: SportType,
    pub workout_steps: Vec<CompiledStep>,
}

/// The upload-ready workout document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompiledWorkout {
    pub workout_name: String,
    pub description: String,
    pub sport_type: SportType,
    pub estimated_duration_in_secs: u32,
    pub workout_segments: Vec<WorkoutSegment>,
}

impl CompiledWorkout {
    /// Steps of the single segment
    pub fn steps(&self) -> &[CompiledStep] {
        self.workout_segments
            .first()
            .map(|s| s.workout_steps.as_slice())
            .unwrap_or(&[])
    }
}
