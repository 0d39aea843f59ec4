//! Routine generation: ties limits, day planning and set filling together.
//!
//! Generation is a pure function of the request, the catalog snapshot and the
//! random source. The finished routine is handed to a `RoutineSink` in one
//! call, so a failure part-way never leaves a half-built routine behind.

use crate::filler::fill_day;
use crate::limits::{resolve_limits, RawLimits};
use crate::planner::{plan_days, resolve_split};
use crate::random::RandomSource;
use crate::store::RoutineSink;
use crate::{Catalog, Day, Result, Routine, SplitChoice};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Parameters submitted by the user when designing a routine
#[derive(Clone, Debug)]
pub struct RoutineRequest {
    pub user: String,
    /// "sync" for weekday-pinned schedules, anything else is asynchronous
    pub schedule: String,
    pub limits: RawLimits,
    /// "musc" marks the routine as muscle-focused
    pub goal: String,
    /// "Arnold", "Bro", "PPL", "UL" or "Anything"
    pub split: String,
    pub name: Option<String>,
}

impl RoutineRequest {
    pub fn is_synchronous(&self) -> bool {
        self.schedule.trim().eq_ignore_ascii_case("sync")
    }

    pub fn is_muscle_focused(&self) -> bool {
        self.goal.trim().eq_ignore_ascii_case("musc")
    }
}

/// Build a complete routine without persisting it
pub fn generate_routine<R: RandomSource + ?Sized>(
    request: &RoutineRequest,
    catalog: &Catalog,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Routine> {
    let limits = resolve_limits(&request.limits)?;
    let choice: SplitChoice = request.split.parse()?;
    let split = resolve_split(choice, rng);
    let is_synchronous = request.is_synchronous();

    tracing::info!(
        "Generating {} routine for {} ({}, {}-{} min)",
        split,
        request.user,
        if is_synchronous { "sync" } else { "async" },
        limits.lower_min,
        limits.upper_min
    );

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("{} Routine", split.label()));

    let mut routine = Routine {
        id: Uuid::new_v4(),
        name,
        user: request.user.clone(),
        created_at: now,
        split,
        is_synchronous,
        lower_limit_min: limits.lower_min,
        upper_limit_min: limits.upper_min,
        is_muscle_focused: request.is_muscle_focused(),
        days: Vec::new(),
    };

    for (label, day_type) in plan_days(split, is_synchronous) {
        let mut day = Day::new(*label, *day_type);
        fill_day(&mut day, catalog, routine.lower_limit_min, rng)?;
        routine.days.push(day);
    }

    tracing::info!(
        "Generated routine {} with {} days",
        routine.id,
        routine.days.len()
    );
    Ok(routine)
}

/// Generate a routine and persist it through `sink`
pub fn create_routine<R, S>(
    request: &RoutineRequest,
    catalog: &Catalog,
    rng: &mut R,
    sink: &mut S,
) -> Result<Routine>
where
    R: RandomSource + ?Sized,
    S: RoutineSink + ?Sized,
{
    let routine = generate_routine(request, catalog, rng, Utc::now())?;
    sink.create(&routine)?;
    Ok(routine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_default_catalog, CALVES};
    use crate::random::testing::ScriptedSource;
    use crate::{DayType, Error, Split};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(split: &str, schedule: &str) -> RoutineRequest {
        RoutineRequest {
            user: "alex".into(),
            schedule: schedule.into(),
            limits: RawLimits::default(),
            goal: "musc".into(),
            split: split.into(),
            name: None,
        }
    }

    /// In-memory sink recording what was persisted
    #[derive(Default)]
    struct MemorySink {
        routines: Vec<Routine>,
    }

    impl RoutineSink for MemorySink {
        fn create(&mut self, routine: &Routine) -> Result<()> {
            self.routines.push(routine.clone());
            Ok(())
        }
    }

    #[test]
    fn test_ppl_sync_end_to_end() {
        crate::logging::init_test();
        let catalog = build_default_catalog();
        let mut rng = StdRng::seed_from_u64(5);
        let mut sink = MemorySink::default();

        let routine =
            create_routine(&request("PPL", "sync"), &catalog, &mut rng, &mut sink).unwrap();

        use DayType::*;
        let types: Vec<_> = routine.days.iter().map(|d| d.day_type).collect();
        assert_eq!(types, vec![Legs, Push, Pull, Legs, Push, Pull, Rest]);
        assert_eq!(routine.split, Split::PushPullLegs);
        assert!(routine.is_synchronous);
        assert!(routine.is_muscle_focused);
        assert_eq!(routine.lower_limit_min, 45);
        assert_eq!(routine.upper_limit_min, 75);
        assert_eq!(routine.name, "Push-Pull-Legs Routine");

        for day in routine.training_days() {
            assert!(!day.planned_sets.is_empty());
            assert!(day.estimated_time_minutes >= 45.0);
        }
        let rest = &routine.days[6];
        assert!(rest.planned_sets.is_empty());
        assert_eq!(rest.estimated_time_minutes, 0.0);

        assert_eq!(sink.routines.len(), 1);
        assert_eq!(sink.routines[0].id, routine.id);
    }

    #[test]
    fn test_schedule_and_goal_tokens() {
        let catalog = build_default_catalog();
        let mut rng = ScriptedSource::always_first();
        let mut req = request("Arnold", "async");
        req.goal = "strength".into();

        let routine = generate_routine(&req, &catalog, &mut rng, Utc::now()).unwrap();

        assert!(!routine.is_synchronous);
        assert!(!routine.is_muscle_focused);
        assert_eq!(routine.days.len(), 8);
        assert_eq!(routine.days[0].name, "Legs A");
    }

    #[test]
    fn test_anything_consumes_first_pick_for_split() {
        let catalog = build_default_catalog();
        // First pick selects the split: index 1 is Bro.
        let mut rng = ScriptedSource::new(&[1]);

        let routine =
            generate_routine(&request("Anything", "sync"), &catalog, &mut rng, Utc::now())
                .unwrap();

        assert_eq!(routine.split, Split::Bro);
        assert_eq!(routine.days[0].day_type, DayType::Chest);
    }

    #[test]
    fn test_custom_limits_and_name() {
        let catalog = build_default_catalog();
        let mut rng = StdRng::seed_from_u64(11);
        let mut req = request("UL", "sync");
        req.limits = RawLimits::new("1", "0", "", "");
        req.name = Some("  Winter block ".into());

        let routine = generate_routine(&req, &catalog, &mut rng, Utc::now()).unwrap();

        assert_eq!(routine.lower_limit_min, 60);
        assert_eq!(routine.upper_limit_min, 90);
        assert_eq!(routine.name, "Winter block");
        for day in routine.training_days() {
            assert!(day.estimated_time_minutes >= 60.0);
        }
    }

    #[test]
    fn test_unknown_split_is_rejected() {
        let catalog = build_default_catalog();
        let mut rng = ScriptedSource::always_first();
        let result =
            generate_routine(&request("Full Body", "sync"), &catalog, &mut rng, Utc::now());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_incomplete_catalog_persists_nothing() {
        let mut catalog = build_default_catalog();
        catalog.muscles_worked.retain(|mw| mw.muscle != CALVES);
        let mut rng = ScriptedSource::always_first();
        let mut sink = MemorySink::default();

        let result = create_routine(&request("PPL", "sync"), &catalog, &mut rng, &mut sink);

        assert!(matches!(result, Err(Error::DataIntegrity(_))));
        assert!(sink.routines.is_empty());
    }
}
