//! Core domain types for the Liftlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Catalog entries (muscles, exercises, which muscles they work)
//! - Day types and their muscle focus
//! - Routines, days and planned sets produced by the designer
//! - Logged sets and daily weights

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

// ============================================================================
// Catalog Types
// ============================================================================

/// Equipment an exercise is performed with
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbells,
    Cables,
    Machine,
    Hexbar,
    Kettlebell,
    ResistanceBand,
    Bodyweight,
}

impl Equipment {
    pub const ALL: [Equipment; 8] = [
        Equipment::Barbell,
        Equipment::Dumbbells,
        Equipment::Cables,
        Equipment::Machine,
        Equipment::Hexbar,
        Equipment::Kettlebell,
        Equipment::ResistanceBand,
        Equipment::Bodyweight,
    ];

    /// Two-letter short code, used in exercise display names
    pub fn code(&self) -> &'static str {
        match self {
            Equipment::Barbell => "BB",
            Equipment::Dumbbells => "DB",
            Equipment::Cables => "CB",
            Equipment::Machine => "MC",
            Equipment::Hexbar => "HB",
            Equipment::Kettlebell => "KB",
            Equipment::ResistanceBand => "RB",
            Equipment::Bodyweight => "BW",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Equipment::Barbell => "Barbell",
            Equipment::Dumbbells => "Dumbbells",
            Equipment::Cables => "Cables",
            Equipment::Machine => "Machine",
            Equipment::Hexbar => "Hexbar",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::ResistanceBand => "Resistance Band",
            Equipment::Bodyweight => "Bodyweight",
        }
    }
}

impl FromStr for Equipment {
    type Err = Error;

    /// Accepts the short code ("BB") or the label ("barbell", "resistance band")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', '-'], " ");
        if wanted == "band" {
            return Ok(Equipment::ResistanceBand);
        }
        Equipment::ALL
            .iter()
            .copied()
            .find(|e| e.code().to_lowercase() == wanted || e.label().to_lowercase() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown equipment: {}", s)))
    }
}

/// A muscle that exercises can work
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Muscle {
    pub name: String,
}

impl Muscle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An exercise definition.
///
/// Identity is the (name, equipment) pair: "Bench Press" with a barbell and
/// "Bench Press" with dumbbells are distinct exercises.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub equipment: Equipment,
    pub is_compound: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Exercise {
    /// Whether `other` names the same exercise (case-insensitive name, same equipment)
    pub fn same_identity(&self, other: &Exercise) -> bool {
        self.equipment == other.equipment
            && self.name.trim().to_lowercase() == other.name.trim().to_lowercase()
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.equipment.code())
    }
}

/// Association between an exercise and a muscle it works
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MuscleWorked {
    pub exercise_id: String,
    pub muscle: String,
    pub directly_targets: bool,
}

/// Category of training day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayType {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    Chest,
    Back,
    Shoulders,
    Arms,
    #[serde(rename = "BC")]
    BackChest,
    #[serde(rename = "SA")]
    ShouldersArms,
    Rest,
}

impl DayType {
    pub const ALL: [DayType; 12] = [
        DayType::Push,
        DayType::Pull,
        DayType::Legs,
        DayType::Upper,
        DayType::Lower,
        DayType::Chest,
        DayType::Back,
        DayType::Shoulders,
        DayType::Arms,
        DayType::BackChest,
        DayType::ShouldersArms,
        DayType::Rest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DayType::Push => "Push",
            DayType::Pull => "Pull",
            DayType::Legs => "Legs",
            DayType::Upper => "Upper",
            DayType::Lower => "Lower",
            DayType::Chest => "Chest",
            DayType::Back => "Back",
            DayType::Shoulders => "Shoulders",
            DayType::Arms => "Arms",
            DayType::BackChest => "Back-Chest",
            DayType::ShouldersArms => "Shoulders-Arms",
            DayType::Rest => "Rest",
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, DayType::Rest)
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which muscles a day type targets
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Focus {
    pub day_type: DayType,
    pub muscle: String,
}

/// A read-only snapshot of the exercise catalog.
///
/// Association tables are kept as ordered vectors: focus order drives the
/// order muscles are filled within a day.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub muscles: Vec<Muscle>,
    pub exercises: Vec<Exercise>,
    pub muscles_worked: Vec<MuscleWorked>,
    pub focuses: Vec<Focus>,
}

// ============================================================================
// Designer Types
// ============================================================================

/// Weekly workout schedule pattern
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Split {
    Arnold,
    Bro,
    #[serde(rename = "PPL")]
    PushPullLegs,
    #[serde(rename = "UL")]
    UpperLower,
}

impl Split {
    pub const ALL: [Split; 4] = [
        Split::Arnold,
        Split::Bro,
        Split::PushPullLegs,
        Split::UpperLower,
    ];

    /// Short token used on the command line and in storage
    pub fn token(&self) -> &'static str {
        match self {
            Split::Arnold => "Arnold",
            Split::Bro => "Bro",
            Split::PushPullLegs => "PPL",
            Split::UpperLower => "UL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Split::Arnold => "Arnold",
            Split::Bro => "Bro",
            Split::PushPullLegs => "Push-Pull-Legs",
            Split::UpperLower => "Upper-Lower",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The split a user asked for; `Anything` is resolved at random
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitChoice {
    Fixed(Split),
    Anything,
}

impl FromStr for SplitChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arnold" => Ok(SplitChoice::Fixed(Split::Arnold)),
            "bro" => Ok(SplitChoice::Fixed(Split::Bro)),
            "ppl" | "push-pull-legs" => Ok(SplitChoice::Fixed(Split::PushPullLegs)),
            "ul" | "upper-lower" | "upperlower" => Ok(SplitChoice::Fixed(Split::UpperLower)),
            "anything" => Ok(SplitChoice::Anything),
            _ => Err(Error::InvalidInput(format!("Unknown split: {}", s))),
        }
    }
}

/// A block of sets prescribed for one exercise within a day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannedSets {
    pub exercise: Exercise,
    pub num_sets: u32,
    pub reps: u32,
    pub estimated_time_minutes: f64,
}

/// One day of a routine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Day {
    pub name: String,
    pub day_type: DayType,
    pub estimated_time_minutes: f64,
    pub planned_sets: Vec<PlannedSets>,
}

impl Day {
    /// A freshly planned day with nothing in it yet
    pub fn new(name: impl Into<String>, day_type: DayType) -> Self {
        Self {
            name: name.into(),
            day_type,
            estimated_time_minutes: 0.0,
            planned_sets: Vec::new(),
        }
    }
}

/// A generated training routine. Days and their planned sets are owned by
/// value, so removing a routine removes everything beneath it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub split: Split,
    pub is_synchronous: bool,
    pub lower_limit_min: u32,
    pub upper_limit_min: u32,
    pub is_muscle_focused: bool,
    pub days: Vec<Day>,
}

impl Routine {
    /// Days that actually contain training
    pub fn training_days(&self) -> impl Iterator<Item = &Day> {
        self.days.iter().filter(|d| !d.day_type.is_rest())
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// A set logged by a user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    pub id: Uuid,
    pub date: NaiveDate,
    pub exercise_id: String,
    pub reps: u32,
    pub weight: f64,
    pub logged_by: String,
}

/// Body weight logged for a day; one entry per (user, date)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyWeight {
    pub user: String,
    pub date: NaiveDate,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_parses_code_and_label() {
        assert_eq!("BB".parse::<Equipment>().unwrap(), Equipment::Barbell);
        assert_eq!("dumbbells".parse::<Equipment>().unwrap(), Equipment::Dumbbells);
        assert_eq!(
            "resistance_band".parse::<Equipment>().unwrap(),
            Equipment::ResistanceBand
        );
        assert!("trampoline".parse::<Equipment>().is_err());
    }

    #[test]
    fn test_exercise_identity_is_name_and_equipment() {
        let barbell = Exercise {
            id: "bench_press_bb".into(),
            name: "Bench Press".into(),
            equipment: Equipment::Barbell,
            is_compound: true,
            created_by: None,
        };
        let mut dumbbell = barbell.clone();
        dumbbell.id = "bench_press_db".into();
        dumbbell.equipment = Equipment::Dumbbells;
        let mut shouting = barbell.clone();
        shouting.name = "BENCH PRESS".into();

        assert!(!barbell.same_identity(&dumbbell));
        assert!(barbell.same_identity(&shouting));
        assert_eq!(barbell.to_string(), "Bench Press (BB)");
    }

    #[test]
    fn test_split_choice_tokens() {
        assert_eq!(
            "PPL".parse::<SplitChoice>().unwrap(),
            SplitChoice::Fixed(Split::PushPullLegs)
        );
        assert_eq!(
            "UL".parse::<SplitChoice>().unwrap(),
            SplitChoice::Fixed(Split::UpperLower)
        );
        assert_eq!("Anything".parse::<SplitChoice>().unwrap(), SplitChoice::Anything);
        assert!("Full Body".parse::<SplitChoice>().is_err());
    }

    #[test]
    fn test_split_serializes_as_token() {
        let json = serde_json::to_string(&Split::PushPullLegs).unwrap();
        assert_eq!(json, "\"PPL\"");
    }

    #[test]
    fn test_day_type_tokens() {
        let tokens: Vec<String> = DayType::ALL
            .iter()
            .map(|t| serde_json::to_string(t).unwrap())
            .collect();
        assert_eq!(
            tokens,
            vec![
                "\"PUSH\"", "\"PULL\"", "\"LEGS\"", "\"UPPER\"", "\"LOWER\"", "\"CHEST\"",
                "\"BACK\"", "\"SHOULDERS\"", "\"ARMS\"", "\"BC\"", "\"SA\"", "\"REST\"",
            ]
        );
        let parsed: DayType = serde_json::from_str("\"SA\"").unwrap();
        assert_eq!(parsed, DayType::ShouldersArms);
    }
}
