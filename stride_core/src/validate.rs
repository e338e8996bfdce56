//! Plan validation.
//!
//! The compiler never rejects input: unknown values fall back and partial
//! targets are dropped. This module reports those cases so callers can refuse
//! a workout before it reaches the platform.

use crate::{AbstractStep, AbstractWorkout, DurationKind, Intensity, LeafStep, TargetKind};

/// Collect human-readable problems with a workout; empty means clean
pub fn validate_workout(workout: &AbstractWorkout) -> Vec<String> {
    let mut errors = Vec::new();

    if workout.workout_name.trim().is_empty() {
        errors.push("Workout has empty name".to_string());
    }
    if workout.steps.is_empty() {
        errors.push(format!("Workout '{}' has no steps", workout.workout_name));
    }

    validate_steps(&workout.steps, &workout.workout_name, &mut errors);
    errors
}

fn validate_steps(steps: &[AbstractStep], path: &str, errors: &mut Vec<String>) {
    for (idx, step) in steps.iter().enumerate() {
        let here = format!("{} > step {}", path, idx + 1);
        match step {
            AbstractStep::Repeat(repeat) => {
                if repeat.repeat_value == 0 {
                    errors.push(format!("{}: repeat count must be at least 1", here));
                }
                if repeat.steps.is_empty() {
                    errors.push(format!("{}: repeat block has no steps", here));
                }
                validate_steps(&repeat.steps, &here, errors);
            }
            AbstractStep::Leaf(leaf) => validate_leaf(leaf, &here, errors),
        }
    }
}

fn validate_leaf(leaf: &LeafStep, here: &str, errors: &mut Vec<String>) {
    if leaf.intensity == Intensity::Unrecognized {
        errors.push(format!("{}: unrecognized intensity", here));
    }
    if leaf.duration_type == DurationKind::Unrecognized {
        errors.push(format!("{}: unrecognized duration type", here));
    }
    if leaf.target_type == TargetKind::Unrecognized {
        errors.push(format!("{}: unrecognized target type", here));
    }
    if !leaf.duration_value.is_finite() || leaf.duration_value < 0.0 {
        errors.push(format!(
            "{}: duration value {} must be a non-negative number",
            here, leaf.duration_value
        ));
    }

    if leaf.target_type == TargetKind::Speed {
        match leaf.speed_bounds() {
            None => errors.push(format!(
                "{}: speed target needs both targetValueOne and targetValueTwo",
                here
            )),
            Some((min, max)) if min >= max => errors.push(format!(
                "{}: speed window {}..{} m/s is not increasing",
                here, min, max
            )),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout(steps: Vec<AbstractStep>) -> AbstractWorkout {
        AbstractWorkout {
            workout_name: "Test".into(),
            description: String::new(),
            steps,
        }
    }

    #[test]
    fn test_clean_workout_has_no_errors() {
        let w = workout(vec![
            LeafStep::distance(Intensity::Warmup, 2000.0).into(),
            AbstractStep::repeat(
                5,
                vec![
                    LeafStep::distance(Intensity::Interval, 800.0)
                        .with_speed(3.9, 4.2)
                        .into(),
                    LeafStep::time(Intensity::Recovery, 120.0).into(),
                ],
            ),
        ]);
        let errors = validate_workout(&w);
        assert!(errors.is_empty(), "Unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_empty_workout() {
        let mut w = workout(vec![]);
        w.workout_name = "  ".into();
        let errors = validate_workout(&w);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_unrecognized_values_reported() {
        let leaf = LeafStep {
            intensity: Intensity::Unrecognized,
            duration_type: DurationKind::Unrecognized,
            target_type: TargetKind::Unrecognized,
            ..Default::default()
        };
        let errors = validate_workout(&workout(vec![leaf.into()]));
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.starts_with("Test > step 1")));
    }

    #[test]
    fn test_speed_target_problems() {
        let mut missing = LeafStep::distance(Intensity::Interval, 800.0).with_speed(3.9, 4.2);
        missing.target_value_one = None;
        let inverted = LeafStep::distance(Intensity::Interval, 800.0).with_speed(4.2, 3.9);

        let errors = validate_workout(&workout(vec![missing.into(), inverted.into()]));
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("both targetValueOne and targetValueTwo"));
        assert!(errors[1].contains("not increasing"));
    }

    #[test]
    fn test_nested_repeat_paths() {
        let w = workout(vec![AbstractStep::repeat(
            2,
            vec![AbstractStep::repeat(0, vec![])],
        )]);
        let errors = validate_workout(&w);
        assert_eq!(
            errors,
            vec![
                "Test > step 1 > step 1: repeat count must be at least 1".to_string(),
                "Test > step 1 > step 1: repeat block has no steps".to_string(),
            ]
        );
    }
}
