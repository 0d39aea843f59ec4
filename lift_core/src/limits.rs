//! Workout time limits from free-text hour/minute form fields.

use crate::{Error, Result};

pub const DEFAULT_LOWER_LIMIT_MIN: u32 = 45;
pub const DEFAULT_UPPER_LIMIT_MIN: u32 = 75;

/// Width of the window filled in when only one bound is given
const DEFAULT_WINDOW_MIN: u32 = 30;
/// A lower bound derived from the upper bound never drops below this
const MIN_DERIVED_LOWER_MIN: u32 = 20;

/// Raw (hours, minutes) strings for both bounds, as typed by the user
#[derive(Clone, Debug, Default)]
pub struct RawLimits {
    pub lower_hrs: String,
    pub lower_min: String,
    pub upper_hrs: String,
    pub upper_min: String,
}

impl RawLimits {
    pub fn new(
        lower_hrs: impl Into<String>,
        lower_min: impl Into<String>,
        upper_hrs: impl Into<String>,
        upper_min: impl Into<String>,
    ) -> Self {
        Self {
            lower_hrs: lower_hrs.into(),
            lower_min: lower_min.into(),
            upper_hrs: upper_hrs.into(),
            upper_min: upper_min.into(),
        }
    }
}

/// Resolved per-workout time window in minutes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeLimits {
    pub lower_min: u32,
    pub upper_min: u32,
}

/// Parse one form field; blank, non-numeric or negative input counts as 0
fn parse_field(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}

/// Total minutes for an (hours, minutes) pair
pub fn to_minutes(hours: &str, minutes: &str) -> u32 {
    parse_field(hours)
        .saturating_mul(60)
        .saturating_add(parse_field(minutes))
}

/// Resolve the lower/upper limits, filling in defaults for missing bounds.
///
/// When both bounds are supplied and the lower exceeds the upper the input
/// is rejected.
pub fn resolve_limits(raw: &RawLimits) -> Result<TimeLimits> {
    let lower = to_minutes(&raw.lower_hrs, &raw.lower_min);
    let upper = to_minutes(&raw.upper_hrs, &raw.upper_min);

    let limits = match (lower, upper) {
        (0, 0) => TimeLimits {
            lower_min: DEFAULT_LOWER_LIMIT_MIN,
            upper_min: DEFAULT_UPPER_LIMIT_MIN,
        },
        (0, upper) => TimeLimits {
            lower_min: upper
                .saturating_sub(DEFAULT_WINDOW_MIN)
                .max(MIN_DERIVED_LOWER_MIN),
            upper_min: upper,
        },
        (lower, 0) => TimeLimits {
            lower_min: lower,
            upper_min: lower.saturating_add(DEFAULT_WINDOW_MIN),
        },
        (lower, upper) if lower > upper => {
            return Err(Error::InvalidInput(format!(
                "Lower time limit ({} min) is greater than upper time limit ({} min)",
                lower, upper
            )));
        }
        (lower, upper) => TimeLimits {
            lower_min: lower,
            upper_min: upper,
        },
    };

    tracing::debug!(
        "Resolved time limits: {}-{} min",
        limits.lower_min,
        limits.upper_min
    );
    Ok(limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(lh: &str, lm: &str, uh: &str, um: &str) -> Result<TimeLimits> {
        resolve_limits(&RawLimits::new(lh, lm, uh, um))
    }

    fn limits(lower_min: u32, upper_min: u32) -> TimeLimits {
        TimeLimits {
            lower_min,
            upper_min,
        }
    }

    #[test]
    fn test_all_zero_uses_defaults() {
        assert_eq!(resolve("0", "0", "0", "0").unwrap(), limits(45, 75));
    }

    #[test]
    fn test_blank_and_garbage_count_as_zero() {
        assert_eq!(resolve("", " ", "abc", "1.5").unwrap(), limits(45, 75));
        assert_eq!(resolve("-1", "0", "", "").unwrap(), limits(45, 75));
    }

    #[test]
    fn test_only_lower_given() {
        assert_eq!(resolve("1", "0", "0", "0").unwrap(), limits(60, 90));
    }

    #[test]
    fn test_only_upper_given() {
        assert_eq!(resolve("0", "0", "1", "30").unwrap(), limits(60, 90));
    }

    #[test]
    fn test_derived_lower_has_floor() {
        assert_eq!(resolve("", "", "0", "40").unwrap(), limits(20, 40));
        assert_eq!(resolve("", "", "0", "10").unwrap(), limits(20, 10));
    }

    #[test]
    fn test_both_given_are_kept() {
        assert_eq!(resolve("1", "0", "1", "30").unwrap(), limits(60, 90));
        assert_eq!(resolve("0", "50", "0", "50").unwrap(), limits(50, 50));
    }

    #[test]
    fn test_lower_above_upper_is_rejected() {
        let result = resolve("2", "0", "1", "0");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_to_minutes() {
        assert_eq!(to_minutes("1", "15"), 75);
        assert_eq!(to_minutes(" 2 ", ""), 120);
        assert_eq!(to_minutes("x", "30"), 30);
    }
}
