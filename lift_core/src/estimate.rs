//! Rough workout-time estimates for planned sets.

use crate::Exercise;

/// Warm-up time added once for a compound exercise
pub const COMPOUND_WARMUP_MIN: f64 = 2.0;
pub const COMPOUND_MIN_PER_SET: f64 = 3.5;
pub const ISOLATION_MIN_PER_SET: f64 = 2.5;

/// Estimated minutes to perform `num_sets` sets of `exercise`
pub fn estimate_minutes(exercise: &Exercise, num_sets: u32) -> f64 {
    let sets = f64::from(num_sets);
    if exercise.is_compound {
        COMPOUND_WARMUP_MIN + sets * COMPOUND_MIN_PER_SET
    } else {
        sets * ISOLATION_MIN_PER_SET
    }
}
