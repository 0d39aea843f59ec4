//! Default exercise catalog and catalog queries.
//!
//! The catalog is a read-only snapshot handed to the routine generator at
//! call time. The built-in seed can be replaced by a JSON catalog file.

use crate::types::*;
use crate::{Error, Result};
use fs2::FileExt;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const UPPER_CHEST: &str = "Upper Chest";
pub const LOWER_CHEST: &str = "Lower Chest";
pub const TRICEPS: &str = "Triceps";
pub const FRONT_DELTS: &str = "Front Delts";
pub const LATERAL_DELTS: &str = "Lateral Delts";
pub const REAR_DELTS: &str = "Rear Delts";
pub const UPPER_TRAPS: &str = "Upper Traps";
pub const LOWER_TRAPS: &str = "Lower Traps";
pub const LATS: &str = "Lats";
pub const SPINAL_ERECTORS: &str = "Spinal Erectors";
pub const BICEPS: &str = "Biceps";
pub const FOREARMS: &str = "Forearms";
pub const QUADRICEPS: &str = "Quadriceps";
pub const HAMSTRINGS: &str = "Hamstrings";
pub const GLUTES: &str = "Glutes";
pub const CALVES: &str = "Calves";
pub const ABS: &str = "Abs";

const SEED_MUSCLES: [&str; 17] = [
    UPPER_CHEST,
    LOWER_CHEST,
    TRICEPS,
    FRONT_DELTS,
    LATERAL_DELTS,
    REAR_DELTS,
    UPPER_TRAPS,
    LOWER_TRAPS,
    LATS,
    SPINAL_ERECTORS,
    BICEPS,
    FOREARMS,
    QUADRICEPS,
    HAMSTRINGS,
    GLUTES,
    CALVES,
    ABS,
];

/// Focus table, in the order rows were seeded
const SEED_FOCUS: &[(DayType, &[&str])] = &[
    (
        DayType::Push,
        &[UPPER_CHEST, LOWER_CHEST, TRICEPS, FRONT_DELTS, LATERAL_DELTS],
    ),
    (
        DayType::Pull,
        &[UPPER_TRAPS, LOWER_TRAPS, LATS, SPINAL_ERECTORS, REAR_DELTS, BICEPS, FOREARMS],
    ),
    (DayType::Legs, &[QUADRICEPS, HAMSTRINGS, GLUTES, CALVES, ABS]),
    (
        DayType::Upper,
        &[
            UPPER_CHEST,
            LOWER_CHEST,
            TRICEPS,
            FRONT_DELTS,
            LATERAL_DELTS,
            UPPER_TRAPS,
            LOWER_TRAPS,
            LATS,
            REAR_DELTS,
            BICEPS,
            FOREARMS,
        ],
    ),
    (
        DayType::Lower,
        &[QUADRICEPS, HAMSTRINGS, GLUTES, CALVES, ABS, SPINAL_ERECTORS],
    ),
    (DayType::Chest, &[UPPER_CHEST, LOWER_CHEST]),
    (DayType::Back, &[UPPER_TRAPS, LOWER_TRAPS, SPINAL_ERECTORS, LATS]),
    (DayType::Shoulders, &[FRONT_DELTS, LATERAL_DELTS, REAR_DELTS]),
    (DayType::Arms, &[FOREARMS, BICEPS, TRICEPS]),
    (
        DayType::BackChest,
        &[UPPER_CHEST, LOWER_CHEST, UPPER_TRAPS, LOWER_TRAPS, SPINAL_ERECTORS, LATS],
    ),
    (
        DayType::ShouldersArms,
        &[FRONT_DELTS, LATERAL_DELTS, REAR_DELTS, FOREARMS, BICEPS, TRICEPS],
    ),
];

struct SeedExercise {
    id: &'static str,
    name: &'static str,
    equipment: Equipment,
    compound: bool,
    direct: &'static [&'static str],
    indirect: &'static [&'static str],
}

const SEED_EXERCISES: &[SeedExercise] = &[
    SeedExercise {
        id: "bench_press_bb",
        name: "Bench Press",
        equipment: Equipment::Barbell,
        compound: true,
        direct: &[LOWER_CHEST],
        indirect: &[UPPER_CHEST, TRICEPS, FRONT_DELTS],
    },
    SeedExercise {
        id: "incline_bench_press_db",
        name: "Incline Bench Press",
        equipment: Equipment::Dumbbells,
        compound: true,
        direct: &[UPPER_CHEST],
        indirect: &[TRICEPS, FRONT_DELTS],
    },
    SeedExercise {
        id: "cable_fly_cb",
        name: "Cable Fly",
        equipment: Equipment::Cables,
        compound: false,
        direct: &[LOWER_CHEST, UPPER_CHEST],
        indirect: &[],
    },
    SeedExercise {
        id: "tricep_pushdown_cb",
        name: "Tricep Pushdown",
        equipment: Equipment::Cables,
        compound: false,
        direct: &[TRICEPS],
        indirect: &[],
    },
    SeedExercise {
        id: "skull_crusher_bb",
        name: "Skull Crusher",
        equipment: Equipment::Barbell,
        compound: false,
        direct: &[TRICEPS],
        indirect: &[],
    },
    SeedExercise {
        id: "overhead_press_bb",
        name: "Overhead Press",
        equipment: Equipment::Barbell,
        compound: true,
        direct: &[FRONT_DELTS],
        indirect: &[LATERAL_DELTS, TRICEPS, UPPER_TRAPS],
    },
    SeedExercise {
        id: "lateral_raise_db",
        name: "Lateral Raise",
        equipment: Equipment::Dumbbells,
        compound: false,
        direct: &[LATERAL_DELTS],
        indirect: &[],
    },
    SeedExercise {
        id: "rear_delt_fly_db",
        name: "Rear Delt Fly",
        equipment: Equipment::Dumbbells,
        compound: false,
        direct: &[REAR_DELTS],
        indirect: &[LOWER_TRAPS],
    },
    SeedExercise {
        id: "band_pull_apart_rb",
        name: "Band Pull-Apart",
        equipment: Equipment::ResistanceBand,
        compound: false,
        direct: &[REAR_DELTS],
        indirect: &[UPPER_TRAPS],
    },
    SeedExercise {
        id: "shrug_bb",
        name: "Shrug",
        equipment: Equipment::Barbell,
        compound: false,
        direct: &[UPPER_TRAPS],
        indirect: &[FOREARMS],
    },
    SeedExercise {
        id: "y_raise_db",
        name: "Prone Y Raise",
        equipment: Equipment::Dumbbells,
        compound: false,
        direct: &[LOWER_TRAPS],
        indirect: &[REAR_DELTS],
    },
    SeedExercise {
        id: "pull_up_bw",
        name: "Pull-Up",
        equipment: Equipment::Bodyweight,
        compound: true,
        direct: &[LATS],
        indirect: &[BICEPS, LOWER_TRAPS],
    },
    SeedExercise {
        id: "barbell_row_bb",
        name: "Barbell Row",
        equipment: Equipment::Barbell,
        compound: true,
        direct: &[LATS],
        indirect: &[REAR_DELTS, BICEPS, SPINAL_ERECTORS],
    },
    SeedExercise {
        id: "back_extension_bw",
        name: "Back Extension",
        equipment: Equipment::Bodyweight,
        compound: false,
        direct: &[SPINAL_ERECTORS],
        indirect: &[GLUTES, HAMSTRINGS],
    },
    SeedExercise {
        id: "deadlift_hb",
        name: "Deadlift",
        equipment: Equipment::Hexbar,
        compound: true,
        direct: &[SPINAL_ERECTORS, GLUTES, QUADRICEPS],
        indirect: &[HAMSTRINGS, UPPER_TRAPS, FOREARMS],
    },
    SeedExercise {
        id: "bicep_curl_db",
        name: "Bicep Curl",
        equipment: Equipment::Dumbbells,
        compound: false,
        direct: &[BICEPS],
        indirect: &[FOREARMS],
    },
    SeedExercise {
        id: "hammer_curl_db",
        name: "Hammer Curl",
        equipment: Equipment::Dumbbells,
        compound: false,
        direct: &[BICEPS, FOREARMS],
        indirect: &[],
    },
    SeedExercise {
        id: "wrist_curl_db",
        name: "Wrist Curl",
        equipment: Equipment::Dumbbells,
        compound: false,
        direct: &[FOREARMS],
        indirect: &[],
    },
    SeedExercise {
        id: "squat_bb",
        name: "Squat",
        equipment: Equipment::Barbell,
        compound: true,
        direct: &[QUADRICEPS, GLUTES],
        indirect: &[SPINAL_ERECTORS, HAMSTRINGS],
    },
    SeedExercise {
        id: "leg_press_mc",
        name: "Leg Press",
        equipment: Equipment::Machine,
        compound: true,
        direct: &[QUADRICEPS],
        indirect: &[GLUTES],
    },
    SeedExercise {
        id: "romanian_deadlift_bb",
        name: "Romanian Deadlift",
        equipment: Equipment::Barbell,
        compound: true,
        direct: &[HAMSTRINGS, GLUTES],
        indirect: &[SPINAL_ERECTORS],
    },
    SeedExercise {
        id: "leg_curl_mc",
        name: "Leg Curl",
        equipment: Equipment::Machine,
        compound: false,
        direct: &[HAMSTRINGS],
        indirect: &[],
    },
    SeedExercise {
        id: "hip_thrust_bb",
        name: "Hip Thrust",
        equipment: Equipment::Barbell,
        compound: true,
        direct: &[GLUTES],
        indirect: &[HAMSTRINGS],
    },
    SeedExercise {
        id: "kettlebell_swing_kb",
        name: "Kettlebell Swing",
        equipment: Equipment::Kettlebell,
        compound: true,
        direct: &[GLUTES, HAMSTRINGS],
        indirect: &[SPINAL_ERECTORS],
    },
    SeedExercise {
        id: "calf_raise_mc",
        name: "Calf Raise",
        equipment: Equipment::Machine,
        compound: false,
        direct: &[CALVES],
        indirect: &[],
    },
    SeedExercise {
        id: "hanging_leg_raise_bw",
        name: "Hanging Leg Raise",
        equipment: Equipment::Bodyweight,
        compound: false,
        direct: &[ABS],
        indirect: &[FOREARMS],
    },
    SeedExercise {
        id: "cable_crunch_cb",
        name: "Cable Crunch",
        equipment: Equipment::Cables,
        compound: false,
        direct: &[ABS],
        indirect: &[],
    },
];

/// Cached default catalog - built once and cloned or borrowed as a snapshot
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the built-in catalog of muscles, exercises and day focus
pub fn build_default_catalog() -> Catalog {
    let muscles = SEED_MUSCLES.iter().map(|m| Muscle::new(*m)).collect();

    let mut exercises = Vec::with_capacity(SEED_EXERCISES.len());
    let mut muscles_worked = Vec::new();
    for seed in SEED_EXERCISES {
        exercises.push(Exercise {
            id: seed.id.into(),
            name: seed.name.into(),
            equipment: seed.equipment,
            is_compound: seed.compound,
            created_by: None,
        });
        let direct = seed.direct.iter().map(|m| (m, true));
        let indirect = seed.indirect.iter().map(|m| (m, false));
        for (muscle, directly_targets) in direct.chain(indirect) {
            muscles_worked.push(MuscleWorked {
                exercise_id: seed.id.into(),
                muscle: (*muscle).into(),
                directly_targets,
            });
        }
    }

    let focuses = SEED_FOCUS
        .iter()
        .flat_map(|(day_type, muscles)| {
            muscles.iter().map(move |m| Focus {
                day_type: *day_type,
                muscle: (*m).into(),
            })
        })
        .collect();

    Catalog {
        muscles,
        exercises,
        muscles_worked,
        focuses,
    }
}

/// Derive an exercise id from its identity, e.g. "Bench Press" + barbell -> "bench_press_bb"
pub fn exercise_slug(name: &str, equipment: Equipment) -> String {
    let mut slug = String::with_capacity(name.len() + 3);
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    if !slug.ends_with('_') {
        slug.push('_');
    }
    slug.push_str(&equipment.code().to_lowercase());
    slug
}

impl Catalog {
    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn has_muscle(&self, name: &str) -> bool {
        self.muscles.iter().any(|m| m.name == name)
    }

    /// Muscles targeted by a day type, in focus-table order
    pub fn focused_muscles(&self, day_type: DayType) -> Vec<&str> {
        self.focuses
            .iter()
            .filter(|f| f.day_type == day_type)
            .map(|f| f.muscle.as_str())
            .collect()
    }

    /// Exercises with a direct association to `muscle`
    pub fn direct_exercises(&self, muscle: &str) -> Vec<&Exercise> {
        self.muscles_worked
            .iter()
            .filter(|mw| mw.directly_targets && mw.muscle == muscle)
            .filter_map(|mw| self.exercise(&mw.exercise_id))
            .collect()
    }

    pub fn muscles_worked_by<'a>(
        &'a self,
        exercise_id: &'a str,
    ) -> impl Iterator<Item = &'a MuscleWorked> + 'a {
        self.muscles_worked
            .iter()
            .filter(move |mw| mw.exercise_id == exercise_id)
    }

    /// Add a user-created exercise together with the muscles it works
    pub fn add_exercise(
        &mut self,
        exercise: Exercise,
        worked: &[(String, bool)],
    ) -> Result<()> {
        if exercise.name.trim().is_empty() {
            return Err(Error::InvalidInput("Exercise name must not be empty".into()));
        }
        // The id is derived from the ASCII letters and digits of the name
        if !exercise.name.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidInput(format!(
                "Exercise name '{}' needs at least one letter or digit",
                exercise.name.trim()
            )));
        }
        if self.exercises.iter().any(|e| e.same_identity(&exercise)) {
            return Err(Error::InvalidInput(
                "An exercise with identical name and equipment already exists.".into(),
            ));
        }
        if self.exercise(&exercise.id).is_some() {
            return Err(Error::InvalidInput(format!(
                "Exercise id '{}' is already taken",
                exercise.id
            )));
        }
        if let Some((unknown, _)) = worked.iter().find(|(m, _)| !self.has_muscle(m)) {
            return Err(Error::InvalidInput(format!("Unknown muscle: {}", unknown)));
        }

        for (muscle, directly_targets) in worked {
            self.muscles_worked.push(MuscleWorked {
                exercise_id: exercise.id.clone(),
                muscle: muscle.clone(),
                directly_targets: *directly_targets,
            });
        }
        tracing::info!("Added exercise {} to catalog", exercise);
        self.exercises.push(exercise);
        Ok(())
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut muscle_names = HashSet::new();
        for muscle in &self.muscles {
            if muscle.name.trim().is_empty() {
                errors.push("Muscle has empty name".to_string());
            }
            if !muscle_names.insert(muscle.name.as_str()) {
                errors.push(format!("Duplicate muscle '{}'", muscle.name));
            }
        }

        let mut ids = HashSet::new();
        for (idx, exercise) in self.exercises.iter().enumerate() {
            if exercise.id.is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", exercise.name));
            }
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if !ids.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
            if self.exercises[..idx]
                .iter()
                .any(|other| other.same_identity(exercise))
            {
                errors.push(format!(
                    "Exercise {} duplicates an existing name and equipment",
                    exercise
                ));
            }
        }

        for mw in &self.muscles_worked {
            if self.exercise(&mw.exercise_id).is_none() {
                errors.push(format!(
                    "Muscle association references non-existent exercise '{}'",
                    mw.exercise_id
                ));
            }
            if !muscle_names.contains(mw.muscle.as_str()) {
                errors.push(format!(
                    "Exercise '{}' references non-existent muscle '{}'",
                    mw.exercise_id, mw.muscle
                ));
            }
        }

        for focus in &self.focuses {
            if !muscle_names.contains(focus.muscle.as_str()) {
                errors.push(format!(
                    "{} focus references non-existent muscle '{}'",
                    focus.day_type, focus.muscle
                ));
            }
        }

        for day_type in DayType::ALL {
            let focused = self.focused_muscles(day_type);
            if day_type.is_rest() {
                if !focused.is_empty() {
                    errors.push("Rest days must not focus any muscle".to_string());
                }
                continue;
            }
            if focused.is_empty() {
                errors.push(format!("{} day has no focus muscles", day_type));
            }
            for muscle in focused {
                if self.direct_exercises(muscle).is_empty() {
                    errors.push(format!(
                        "No exercise directly targets '{}' ({} focus)",
                        muscle, day_type
                    ));
                }
            }
        }

        errors
    }

    /// Load a catalog snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded catalog from {:?} ({} exercises)",
            path,
            catalog.exercises.len()
        );
        Ok(catalog)
    }

    /// Load the catalog at `path` when it exists, otherwise the built-in seed
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No catalog at {:?}, using built-in catalog", path);
            Ok(get_default_catalog().clone())
        }
    }

    /// Save the catalog atomically (temp file + rename) under the catalog lock
    pub fn save(&self, path: &Path) -> Result<()> {
        let lock = open_lock(path)?;
        lock.lock_exclusive()?;
        let result = self.write_file(path);
        lock.unlock()?;
        result
    }

    /// Load, modify and save the catalog at `path` while holding the catalog lock.
    ///
    /// Concurrent edits are serialised, so none of them is lost. Nothing is
    /// written when `f` fails.
    pub fn update<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut Catalog) -> Result<T>,
    {
        let lock = open_lock(path)?;
        lock.lock_exclusive()?;
        let result = Self::load_or_default(path).and_then(|mut catalog| {
            let value = f(&mut catalog)?;
            catalog.write_file(path)?;
            Ok(value)
        });
        lock.unlock()?;
        result
    }

    fn write_file(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("Catalog path {:?} has no parent", path)))?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved catalog to {:?}", path);
        Ok(())
    }
}

/// Open (creating if needed) the sidecar lock file guarding a catalog file
fn open_lock(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path.with_extension("lock"))?;
    Ok(file)
}
