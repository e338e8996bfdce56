//! Step-tree compiler and workout assembler.
//!
//! Turns the abstract step tree into the platform's nested document:
//! - Leaf steps become `ExecutableStepDTO` entries via the lookup tables
//! - Repeat blocks become `RepeatGroupDTO` entries with freshly numbered children
//! - The compiled list is wrapped in a single running segment
//!
//! Unrecognized enum values are compiled with the fallback mapping of the
//! lookup tables and logged; use [`crate::validate`] to reject them up front.

use crate::estimate::{estimated_duration_secs, total_distance_and_time};
use crate::wire::{
    end_condition_for, iterations_end_condition, kilometer_unit, repeat_step_type,
    running_sport, step_type_for, target_type_for, CompiledStep, CompiledWorkout,
    ExecutableStep, RepeatGroup, WorkoutSegment,
};
use crate::{AbstractStep, AbstractWorkout, DurationKind, Intensity, LeafStep, RepeatStep, TargetKind};

/// Compile one step at the given 1-based position within its parent list
pub fn compile_step(step: &AbstractStep, order: u32) -> CompiledStep {
    match step {
        AbstractStep::Repeat(repeat) => CompiledStep::RepeatGroup(compile_repeat(repeat, order)),
        AbstractStep::Leaf(leaf) => CompiledStep::Executable(compile_leaf(leaf, order)),
    }
}

/// Compile a step list, numbering entries 1..=N by position
pub fn compile_steps(steps: &[AbstractStep]) -> Vec<CompiledStep> {
    steps
        .iter()
        .zip(1u32..)
        .map(|(step, order)| compile_step(step, order))
        .collect()
}

fn compile_repeat(repeat: &RepeatStep, order: u32) -> RepeatGroup {
    RepeatGroup {
        step_order: order,
        step_type: repeat_step_type(),
        number_of_iterations: repeat.repeat_value,
        workout_steps: compile_steps(&repeat.steps),
        end_condition: iterations_end_condition(),
        end_condition_value: f64::from(repeat.repeat_value),
        smart_repeat: false,
    }
}

fn compile_leaf(leaf: &LeafStep, order: u32) -> ExecutableStep {
    if leaf.intensity == Intensity::Unrecognized {
        tracing::warn!("Step {}: unrecognized intensity, compiling as ACTIVE", order);
    }
    if leaf.duration_type == DurationKind::Unrecognized {
        tracing::warn!(
            "Step {}: unrecognized duration type, ending on distance without a unit",
            order
        );
    }
    if leaf.target_type == TargetKind::Unrecognized {
        tracing::warn!("Step {}: unrecognized target type, compiling without target", order);
    }

    let (target_value_one, target_value_two) = match leaf.speed_targets() {
        Some((one, two)) => (Some(one.clone()), Some(two.clone())),
        None => {
            if leaf.target_type == TargetKind::Speed {
                tracing::warn!("Step {}: speed target without both bounds, dropping it", order);
            }
            (None, None)
        }
    };

    // Only a literal DISTANCE gets the unit; a defaulted condition does not
    let preferred_end_condition_unit = match leaf.duration_type {
        DurationKind::Distance => Some(kilometer_unit()),
        DurationKind::Time | DurationKind::Unrecognized => None,
    };

    ExecutableStep {
        step_order: order,
        step_type: step_type_for(leaf.intensity),
        end_condition: end_condition_for(leaf.duration_type),
        end_condition_value: leaf.duration_value,
        target_type: target_type_for(leaf.target_type),
        preferred_end_condition_unit,
        target_value_one,
        target_value_two,
    }
}

/// Wrap compiled steps into the upload document
///
/// Steps are placed in a single running segment exactly as given; nothing is
/// reordered or checked here, so an empty list yields an empty segment.
pub fn assemble(
    name: &str,
    description: &str,
    steps: Vec<CompiledStep>,
    estimated_duration_secs: u32,
) -> CompiledWorkout {
    CompiledWorkout {
        workout_name: name.to_string(),
        description: description.to_string(),
        sport_type: running_sport(),
        estimated_duration_in_secs: estimated_duration_secs,
        workout_segments: vec![WorkoutSegment {
            segment_order: 1,
            sport_type: running_sport(),
            workout_steps: steps,
        }],
    }
}

/// Compile, estimate and assemble a whole workout
pub fn compile_workout(workout: &AbstractWorkout) -> CompiledWorkout {
    let steps = compile_steps(&workout.steps);
    let totals = total_distance_and_time(&workout.steps);
    let estimate = estimated_duration_secs(&totals);

    tracing::debug!(
        "Compiled '{}': {} top-level steps, {:.0} m + {:.0} s, estimated {} s",
        workout.workout_name,
        steps.len(),
        totals.distance_m,
        totals.time_s,
        estimate
    );

    assemble(&workout.workout_name, &workout.description, steps, estimate)
}
