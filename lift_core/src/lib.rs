#![forbid(unsafe_code)]

//! Core domain model and business logic for the Liftlog system.
//!
//! This crate provides:
//! - Domain types (muscles, exercises, routines, logged sets)
//! - Exercise catalog management
//! - Workout designer (time limits, day planning, set filling)
//! - Persistence (routine store, set log, weight log)
//! - Volume aggregation and routine export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod random;
pub mod limits;
pub mod estimate;
pub mod planner;
pub mod filler;
pub mod generator;
pub mod store;
pub mod set_log;
pub mod volume;
pub mod weight_log;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use random::RandomSource;
pub use limits::{resolve_limits, RawLimits, TimeLimits};
pub use generator::{create_routine, generate_routine, RoutineRequest};
pub use store::{RoutineSink, RoutineStore};
pub use set_log::{SetEdit, SetLog};
pub use volume::{muscle_volume, MuscleVolume};
pub use weight_log::{WeightChange, WeightLog};
pub use export::export_routine_to_path;
