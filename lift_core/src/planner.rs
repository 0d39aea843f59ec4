//! Day planning: the fixed weekly layout for each split.
//!
//! Synchronous schedules are pinned to weekdays; asynchronous ones repeat an
//! A/B rotation with a rest day after each half.

use crate::random::{choose, RandomSource};
use crate::{DayType, Split, SplitChoice};

/// (display label, day type) for one slot in a schedule
pub type DaySlot = (&'static str, DayType);

const ARNOLD_SYNC: &[DaySlot] = &[
    ("Legs (Mon)", DayType::Legs),
    ("Back-Chest (Tue)", DayType::BackChest),
    ("Shoulders-Arms (Wed)", DayType::ShouldersArms),
    ("Legs (Thu)", DayType::Legs),
    ("Back-Chest (Fri)", DayType::BackChest),
    ("Shoulders-Arms (Sat)", DayType::ShouldersArms),
    ("Rest (Sun)", DayType::Rest),
];

const ARNOLD_ASYNC: &[DaySlot] = &[
    ("Legs A", DayType::Legs),
    ("Back-Chest A", DayType::BackChest),
    ("Shoulders-Arms A", DayType::ShouldersArms),
    ("Rest", DayType::Rest),
    ("Legs B", DayType::Legs),
    ("Back-Chest B", DayType::BackChest),
    ("Shoulders-Arms B", DayType::ShouldersArms),
    ("Rest", DayType::Rest),
];

const BRO: &[DaySlot] = &[
    ("Chest", DayType::Chest),
    ("Back", DayType::Back),
    ("Legs", DayType::Legs),
    ("Shoulders", DayType::Shoulders),
    ("Arms", DayType::Arms),
    ("Rest", DayType::Rest),
    ("Rest", DayType::Rest),
];

const PPL_SYNC: &[DaySlot] = &[
    ("Legs (Mon)", DayType::Legs),
    ("Push (Tue)", DayType::Push),
    ("Pull (Wed)", DayType::Pull),
    ("Legs (Thu)", DayType::Legs),
    ("Push (Fri)", DayType::Push),
    ("Pull (Sat)", DayType::Pull),
    ("Rest (Sun)", DayType::Rest),
];

const PPL_ASYNC: &[DaySlot] = &[
    ("Legs A", DayType::Legs),
    ("Push A", DayType::Push),
    ("Pull A", DayType::Pull),
    ("Rest", DayType::Rest),
    ("Legs B", DayType::Legs),
    ("Push B", DayType::Push),
    ("Pull B", DayType::Pull),
    ("Rest", DayType::Rest),
];

const UPPER_LOWER: &[DaySlot] = &[
    ("Upper", DayType::Upper),
    ("Lower", DayType::Lower),
    ("Rest", DayType::Rest),
    ("Upper", DayType::Upper),
    ("Lower", DayType::Lower),
    ("Rest", DayType::Rest),
    ("Rest", DayType::Rest),
];

/// Ordered day layout for a split. Bro and Upper-Lower ignore synchronicity.
pub fn plan_days(split: Split, is_synchronous: bool) -> &'static [DaySlot] {
    match (split, is_synchronous) {
        (Split::Arnold, true) => ARNOLD_SYNC,
        (Split::Arnold, false) => ARNOLD_ASYNC,
        (Split::Bro, _) => BRO,
        (Split::PushPullLegs, true) => PPL_SYNC,
        (Split::PushPullLegs, false) => PPL_ASYNC,
        (Split::UpperLower, _) => UPPER_LOWER,
    }
}

/// Turn the requested split into a concrete one, picking uniformly for `Anything`
pub fn resolve_split<R: RandomSource + ?Sized>(choice: SplitChoice, rng: &mut R) -> Split {
    match choice {
        SplitChoice::Fixed(split) => split,
        SplitChoice::Anything => {
            let split = choose(rng, &Split::ALL).copied().unwrap_or(Split::PushPullLegs);
            tracing::info!("No split preference, picked {}", split);
            split
        }
    }
}
