//! CSV export of a routine.

use crate::{Result, Routine};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    day: usize,
    day_name: &'a str,
    day_type: &'a str,
    exercise: Option<&'a str>,
    equipment: Option<&'a str>,
    sets: Option<u32>,
    reps: Option<u32>,
    time_est_min: f64,
}

/// Write one row per planned set; rest days get a single row with empty exercise fields.
///
/// Returns the number of rows written.
pub fn export_routine_csv<W: std::io::Write>(routine: &Routine, out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    let mut rows = 0;

    for (idx, day) in routine.days.iter().enumerate() {
        if day.planned_sets.is_empty() {
            writer.serialize(CsvRow {
                day: idx + 1,
                day_name: &day.name,
                day_type: day.day_type.label(),
                exercise: None,
                equipment: None,
                sets: None,
                reps: None,
                time_est_min: day.estimated_time_minutes,
            })?;
            rows += 1;
            continue;
        }

        for planned in &day.planned_sets {
            writer.serialize(CsvRow {
                day: idx + 1,
                day_name: &day.name,
                day_type: day.day_type.label(),
                exercise: Some(&planned.exercise.name),
                equipment: Some(planned.exercise.equipment.label()),
                sets: Some(planned.num_sets),
                reps: Some(planned.reps),
                time_est_min: planned.estimated_time_minutes,
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

/// Export a routine to a CSV file, creating parent directories as needed
pub fn export_routine_to_path(routine: &Routine, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let rows = export_routine_csv(routine, file)?;
    tracing::info!("Exported routine {} ({} rows) to {:?}", routine.id, rows, path);
    Ok(rows)
}
