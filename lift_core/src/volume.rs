//! Training volume per muscle over a date range.

use crate::{Catalog, Error, LoggedSet, Result};
use chrono::NaiveDate;

/// Volume credited for a set that directly targets a muscle
pub const DIRECT_CREDIT: f64 = 1.0;
/// Volume credited for a set that works a muscle secondarily
pub const INDIRECT_CREDIT: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct MuscleVolume {
    pub muscle: String,
    pub sets: f64,
}

/// Sum set volume per muscle for `user` between `start` and `end` inclusive.
///
/// Every catalog muscle appears in the result, in catalog order, even when
/// no set touched it. Sets for exercises missing from the catalog are skipped.
pub fn muscle_volume(
    catalog: &Catalog,
    sets: &[LoggedSet],
    user: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<MuscleVolume>> {
    if start > end {
        return Err(Error::InvalidInput(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }

    let mut volume: Vec<MuscleVolume> = catalog
        .muscles
        .iter()
        .map(|m| MuscleVolume {
            muscle: m.name.clone(),
            sets: 0.0,
        })
        .collect();

    let in_range = sets
        .iter()
        .filter(|s| s.logged_by == user && s.date >= start && s.date <= end);

    let mut counted = 0usize;
    for set in in_range {
        if catalog.exercise(&set.exercise_id).is_none() {
            tracing::warn!(
                "Set {} references unknown exercise '{}', skipping",
                set.id,
                set.exercise_id
            );
            continue;
        }
        for worked in catalog.muscles_worked_by(&set.exercise_id) {
            if let Some(entry) = volume.iter_mut().find(|v| v.muscle == worked.muscle) {
                entry.sets += if worked.directly_targets {
                    DIRECT_CREDIT
                } else {
                    INDIRECT_CREDIT
                };
            }
        }
        counted += 1;
    }

    tracing::debug!("Counted volume for {} sets ({} to {})", counted, start, end);
    Ok(volume)
}
