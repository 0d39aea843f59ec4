//! Greedy set filling for a single day.
//!
//! Each pass walks the day's focus muscles in catalog order and adds one
//! randomly chosen, directly-targeting exercise per muscle. Filling stops as
//! soon as the day's estimated time passes the routine's lower limit.

use crate::estimate::estimate_minutes;
use crate::random::{choose, RandomSource};
use crate::{Catalog, Day, Error, PlannedSets, Result};

/// Sets prescribed per exercise block
pub const SETS_PER_EXERCISE: u32 = 3;
/// Rep counts a block can be prescribed with
pub const REP_CHOICES: [u32; 4] = [6, 8, 10, 12];

/// Fill `day` with planned sets until its estimated time reaches `lower_limit_min`.
///
/// Rest days are left empty. A focused muscle with no directly-targeting
/// exercise is a catalog integrity failure.
pub fn fill_day<R: RandomSource + ?Sized>(
    day: &mut Day,
    catalog: &Catalog,
    lower_limit_min: u32,
    rng: &mut R,
) -> Result<()> {
    if day.day_type.is_rest() {
        return Ok(());
    }

    let muscles = catalog.focused_muscles(day.day_type);
    if muscles.is_empty() {
        return Err(Error::DataIntegrity(format!(
            "{} day has no focus muscles in the catalog",
            day.day_type
        )));
    }

    // Resolve candidates up front so a gap in the catalog fails before any
    // sets are added.
    let candidates = muscles
        .iter()
        .map(|muscle| {
            let exercises = catalog.direct_exercises(muscle);
            if exercises.is_empty() {
                Err(Error::DataIntegrity(format!(
                    "No exercise directly targets '{}'",
                    muscle
                )))
            } else {
                Ok(exercises)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let lower = f64::from(lower_limit_min);
    let mut accumulated = day.estimated_time_minutes;

    while accumulated < lower {
        for exercises in &candidates {
            let exercise = choose(rng, exercises)
                .copied()
                .ok_or_else(|| Error::DataIntegrity("Empty exercise selection".into()))?;
            let reps = REP_CHOICES[rng.pick(REP_CHOICES.len())];
            let estimated = estimate_minutes(exercise, SETS_PER_EXERCISE);

            day.planned_sets.push(PlannedSets {
                exercise: exercise.clone(),
                num_sets: SETS_PER_EXERCISE,
                reps,
                estimated_time_minutes: estimated,
            });
            accumulated += estimated;

            if accumulated > lower {
                break;
            }
        }
    }

    day.estimated_time_minutes = accumulated;
    tracing::debug!(
        "Filled {} with {} exercises (~{} min)",
        day.name,
        day.planned_sets.len(),
        accumulated
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::*;
    use crate::random::testing::ScriptedSource;
    use crate::DayType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rest_day_stays_empty() {
        let catalog = build_default_catalog();
        let mut day = Day::new("Rest", DayType::Rest);
        let mut rng = ScriptedSource::always_first();

        fill_day(&mut day, &catalog, 45, &mut rng).unwrap();

        assert!(day.planned_sets.is_empty());
        assert_eq!(day.estimated_time_minutes, 0.0);
    }

    #[test]
    fn test_scripted_picks_are_followed() {
        let catalog = build_default_catalog();
        let mut day = Day::new("Chest", DayType::Chest);
        // Upper Chest: incline press (0) or cable fly (1); Lower Chest: bench (0) or fly (1).
        // Each block draws exercise then reps.
        let mut rng = ScriptedSource::new(&[0, 3, 1, 0]);

        fill_day(&mut day, &catalog, 25, &mut rng).unwrap();

        // 12.5 (incline, compound) + 7.5 (fly) = 20.0 after the first pass,
        // so a second pass starts and its first block pushes past 25.
        let picked: Vec<_> = day
            .planned_sets
            .iter()
            .map(|p| (p.exercise.id.as_str(), p.reps))
            .collect();
        assert_eq!(
            picked,
            vec![
                ("incline_bench_press_db", 12),
                ("cable_fly_cb", 6),
                ("incline_bench_press_db", 6),
            ]
        );
        assert_eq!(day.estimated_time_minutes, 32.5);
    }

    #[test]
    fn test_stops_mid_pass_once_limit_passed() {
        let catalog = build_default_catalog();
        let mut day = Day::new("Legs", DayType::Legs);
        let mut rng = ScriptedSource::always_first();

        // Quadriceps come first; the hexbar deadlift (12.5) alone passes 10.
        fill_day(&mut day, &catalog, 10, &mut rng).unwrap();

        assert_eq!(day.planned_sets.len(), 1);
        assert_eq!(day.planned_sets[0].exercise.id, "deadlift_hb");
        assert_eq!(day.estimated_time_minutes, 12.5);
    }

    #[test]
    fn test_non_rest_days_reach_lower_limit() {
        let catalog = build_default_catalog();
        let mut rng = StdRng::seed_from_u64(1234);
        for day_type in DayType::ALL.iter().filter(|t| !t.is_rest()) {
            for limit in [20, 45, 90] {
                let mut day = Day::new(day_type.label(), *day_type);
                fill_day(&mut day, &catalog, limit, &mut rng).unwrap();
                assert!(!day.planned_sets.is_empty());
                assert!(day.estimated_time_minutes >= f64::from(limit));
                let total: f64 = day
                    .planned_sets
                    .iter()
                    .map(|p| p.estimated_time_minutes)
                    .sum();
                assert_eq!(total, day.estimated_time_minutes);
            }
        }
    }

    #[test]
    fn test_reps_and_sets_follow_policy() {
        let catalog = build_default_catalog();
        let mut rng = StdRng::seed_from_u64(99);
        let mut day = Day::new("Upper", DayType::Upper);
        fill_day(&mut day, &catalog, 120, &mut rng).unwrap();

        for planned in &day.planned_sets {
            assert_eq!(planned.num_sets, 3);
            assert!(planned.reps % 2 == 0);
            assert!((6..=12).contains(&planned.reps));
        }
    }

    #[test]
    fn test_missing_direct_exercise_is_integrity_error() {
        let mut catalog = build_default_catalog();
        catalog.muscles_worked.retain(|mw| mw.muscle != CALVES);
        let mut day = Day::new("Legs", DayType::Legs);
        let mut rng = ScriptedSource::always_first();

        let result = fill_day(&mut day, &catalog, 45, &mut rng);

        assert!(matches!(result, Err(Error::DataIntegrity(_))));
        assert!(day.planned_sets.is_empty());
    }

    #[test]
    fn test_missing_focus_is_integrity_error() {
        let mut catalog = build_default_catalog();
        catalog.focuses.retain(|f| f.day_type != DayType::Arms);
        let mut day = Day::new("Arms", DayType::Arms);
        let mut rng = ScriptedSource::always_first();

        let result = fill_day(&mut day, &catalog, 45, &mut rng);
        assert!(matches!(result, Err(Error::DataIntegrity(_))));
    }
}
