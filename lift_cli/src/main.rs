use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use lift_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout designer and training log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(long, global = true)]
    user: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Design a new routine
    Design {
        /// Split (Arnold, Bro, PPL, UL, Anything)
        #[arg(long, default_value = "Anything")]
        split: String,

        /// Schedule (sync pins days to weekdays, async rotates A/B days)
        #[arg(long, default_value = "sync")]
        schedule: String,

        /// Goal ("musc" for muscle-focused)
        #[arg(long, default_value = "musc")]
        goal: String,

        /// Minimum workout length, hours part
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        lower_hrs: String,

        /// Minimum workout length, minutes part
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        lower_min: String,

        /// Maximum workout length, hours part
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        upper_hrs: String,

        /// Maximum workout length, minutes part
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        upper_min: String,

        /// Routine name
        #[arg(long)]
        name: Option<String>,

        /// Seed for reproducible exercise picks
        #[arg(long)]
        seed: Option<u64>,

        /// Dry run - show the routine without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// List your routines, newest first
    Routines,

    /// Show one routine
    Show { id: Uuid },

    /// Delete a routine with all its days
    Delete { id: Uuid },

    /// Export a routine to CSV
    Export {
        id: Uuid,

        #[arg(long)]
        out: PathBuf,
    },

    /// List the exercise catalog
    Exercises,

    /// Add an exercise to the catalog
    AddExercise {
        #[arg(long)]
        name: String,

        /// Equipment (barbell, dumbbells, cables, machine, hexbar, kettlebell, band, bodyweight)
        #[arg(long)]
        equipment: String,

        #[arg(long)]
        compound: bool,

        /// Muscle the exercise directly targets (repeatable)
        #[arg(long = "direct")]
        direct: Vec<String>,

        /// Muscle the exercise works secondarily (repeatable)
        #[arg(long = "indirect")]
        indirect: Vec<String>,
    },

    /// Log a set
    LogSet {
        /// Exercise id (see `liftlog exercises`)
        #[arg(long)]
        exercise: String,

        #[arg(long)]
        reps: u32,

        #[arg(long)]
        weight: f64,

        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show logged sets grouped by day
    Sets,

    /// Edit a logged set
    EditSet {
        id: Uuid,

        #[arg(long)]
        exercise: Option<String>,

        #[arg(long)]
        reps: Option<u32>,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Sets per muscle between two dates (inclusive)
    Volume {
        #[arg(long)]
        start: NaiveDate,

        #[arg(long)]
        end: NaiveDate,
    },

    /// Log body weight for a day (0 removes the entry)
    Weight {
        #[arg(long)]
        weight: f64,

        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List logged body weights
    Weights,
}

/// Resolved locations and identity for one invocation
struct Env {
    user: String,
    catalog_path: PathBuf,
    routines_path: PathBuf,
    sets_path: PathBuf,
    weights_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        lift_core::logging::init_with_level("info");
    } else {
        lift_core::logging::init();
    }

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let env = Env {
        user: cli.user.unwrap_or_else(|| config.user.name.clone()),
        catalog_path: config.catalog_path(&data_dir),
        routines_path: data_dir.join("routines.json"),
        sets_path: data_dir.join("sets.jsonl"),
        weights_path: data_dir.join("weights.json"),
    };

    match cli.command {
        Commands::Design {
            split,
            schedule,
            goal,
            lower_hrs,
            lower_min,
            upper_hrs,
            upper_min,
            name,
            seed,
            dry_run,
        } => {
            let request = RoutineRequest {
                user: env.user.clone(),
                schedule,
                limits: RawLimits::new(lower_hrs, lower_min, upper_hrs, upper_min),
                goal,
                split,
                name,
            };
            cmd_design(&env, &request, seed, dry_run)
        }
        Commands::Routines => cmd_routines(&env),
        Commands::Show { id } => {
            let routine = RoutineStore::new(&env.routines_path).get_owned(id, &env.user)?;
            display_routine(&routine);
            Ok(())
        }
        Commands::Delete { id } => {
            let removed = RoutineStore::new(&env.routines_path).delete(id, &env.user)?;
            println!("✓ Deleted routine '{}' ({} days)", removed.name, removed.days.len());
            Ok(())
        }
        Commands::Export { id, out } => {
            let routine = RoutineStore::new(&env.routines_path).get_owned(id, &env.user)?;
            let rows = export_routine_to_path(&routine, &out)?;
            println!("✓ Exported {} rows to {}", rows, out.display());
            Ok(())
        }
        Commands::Exercises => cmd_exercises(&env),
        Commands::AddExercise {
            name,
            equipment,
            compound,
            direct,
            indirect,
        } => cmd_add_exercise(&env, name, &equipment, compound, direct, indirect),
        Commands::LogSet {
            exercise,
            reps,
            weight,
            date,
        } => cmd_log_set(&env, exercise, reps, weight, date),
        Commands::Sets => cmd_sets(&env),
        Commands::EditSet {
            id,
            exercise,
            reps,
            weight,
            date,
        } => {
            if let Some(ref exercise_id) = exercise {
                require_exercise(&load_catalog(&env.catalog_path)?, exercise_id)?;
            }
            let edit = SetEdit {
                date,
                exercise_id: exercise,
                reps,
                weight,
            };
            let updated = SetLog::new(&env.sets_path).edit(id, &env.user, &edit)?;
            println!(
                "✓ Set updated: {} {} x {} @ {}",
                updated.date, updated.exercise_id, updated.reps, updated.weight
            );
            Ok(())
        }
        Commands::Volume { start, end } => cmd_volume(&env, start, end),
        Commands::Weight { weight, date } => {
            let date = date.unwrap_or_else(today);
            let change = WeightLog::new(&env.weights_path).set_weight(&env.user, date, weight)?;
            match change {
                WeightChange::Created => println!("✓ Logged {} for {}", weight, date),
                WeightChange::Updated => println!("✓ Updated weight for {} to {}", date, weight),
                WeightChange::Removed => println!("✓ Removed weight for {}", date),
                WeightChange::Unchanged => println!("No weight logged for {}", date),
            }
            Ok(())
        }
        Commands::Weights => {
            let weights = WeightLog::new(&env.weights_path).list_for_user(&env.user)?;
            if weights.is_empty() {
                println!("No weights logged yet.");
            }
            for w in weights {
                println!("  {}  {:>6.1}", w.date, w.weight);
            }
            Ok(())
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Load the catalog snapshot, reporting (but not failing on) validation problems
fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::load_or_default(path)?;
    for problem in catalog.validate() {
        tracing::warn!("Catalog problem: {}", problem);
    }
    Ok(catalog)
}

fn require_exercise<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Exercise> {
    catalog
        .exercise(id)
        .ok_or_else(|| Error::NotFound(format!("Exercise '{}'", id)))
}

fn cmd_design(env: &Env, request: &RoutineRequest, seed: Option<u64>, dry_run: bool) -> Result<()> {
    let catalog = load_catalog(&env.catalog_path)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if dry_run {
        let routine = generate_routine(request, &catalog, &mut rng, chrono::Utc::now())?;
        display_routine(&routine);
        println!("\n[Dry run - routine not saved]");
        return Ok(());
    }

    let mut store = RoutineStore::new(&env.routines_path);
    let routine = create_routine(request, &catalog, &mut rng, &mut store)?;
    display_routine(&routine);
    println!("\n✓ Routine saved!");
    Ok(())
}

fn cmd_routines(env: &Env) -> Result<()> {
    let routines = RoutineStore::new(&env.routines_path).list_for_user(&env.user)?;
    if routines.is_empty() {
        println!("No routines yet. Create one with `liftlog design`.");
        return Ok(());
    }

    for routine in routines {
        println!(
            "{}  {}  ({}, {} days, {}-{} min)  {}",
            routine.id,
            routine.name,
            routine.split,
            routine.days.len(),
            routine.lower_limit_min,
            routine.upper_limit_min,
            routine.created_at.format("%Y-%m-%d"),
        );
    }
    Ok(())
}

fn cmd_exercises(env: &Env) -> Result<()> {
    let catalog = load_catalog(&env.catalog_path)?;
    for exercise in &catalog.exercises {
        let (direct, indirect): (Vec<_>, Vec<_>) = catalog
            .muscles_worked_by(&exercise.id)
            .partition(|mw| mw.directly_targets);
        let names = |rows: Vec<&MuscleWorked>| {
            rows.iter()
                .map(|mw| mw.muscle.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:<24} {:<28} {}  direct: {}  indirect: {}",
            exercise.id,
            exercise.to_string(),
            if exercise.is_compound { "compound " } else { "isolation" },
            names(direct),
            names(indirect),
        );
    }
    Ok(())
}

fn cmd_add_exercise(
    env: &Env,
    name: String,
    equipment: &str,
    compound: bool,
    direct: Vec<String>,
    indirect: Vec<String>,
) -> Result<()> {
    if direct.is_empty() {
        return Err(Error::InvalidInput(
            "An exercise needs at least one --direct muscle".into(),
        ));
    }
    let equipment: Equipment = equipment.parse()?;

    let exercise = Exercise {
        id: lift_core::catalog::exercise_slug(&name, equipment),
        name,
        equipment,
        is_compound: compound,
        created_by: Some(env.user.clone()),
    };
    let worked: Vec<(String, bool)> = direct
        .into_iter()
        .map(|m| (m, true))
        .chain(indirect.into_iter().map(|m| (m, false)))
        .collect();

    let id = exercise.id.clone();
    Catalog::update(&env.catalog_path, |catalog| catalog.add_exercise(exercise, &worked))?;
    println!("✓ Added exercise {}", id);
    Ok(())
}

fn cmd_log_set(
    env: &Env,
    exercise: String,
    reps: u32,
    weight: f64,
    date: Option<NaiveDate>,
) -> Result<()> {
    let catalog = load_catalog(&env.catalog_path)?;
    let name = require_exercise(&catalog, &exercise)?.to_string();

    let set = LoggedSet {
        id: Uuid::new_v4(),
        date: date.unwrap_or_else(today),
        exercise_id: exercise,
        reps,
        weight,
        logged_by: env.user.clone(),
    };
    SetLog::new(&env.sets_path).append(&set)?;
    println!("✓ Set logged: {} {} x {} @ {}", set.date, name, reps, weight);
    Ok(())
}

fn cmd_sets(env: &Env) -> Result<()> {
    let catalog = load_catalog(&env.catalog_path)?;
    let sets = SetLog::new(&env.sets_path).read_for_user(&env.user)?;
    if sets.is_empty() {
        println!("No sets logged yet.");
        return Ok(());
    }

    for (date, day_sets) in lift_core::set_log::group_by_date(&sets) {
        println!("{}", date);
        for set in day_sets {
            let name = catalog
                .exercise(&set.exercise_id)
                .map(|e| e.to_string())
                .unwrap_or_else(|| set.exercise_id.clone());
            println!("  {}  {} reps @ {}  [{}]", name, set.reps, set.weight, set.id);
        }
    }
    Ok(())
}

fn cmd_volume(env: &Env, start: NaiveDate, end: NaiveDate) -> Result<()> {
    let catalog = load_catalog(&env.catalog_path)?;
    let sets = SetLog::new(&env.sets_path).read_for_user(&env.user)?;
    let volume = muscle_volume(&catalog, &sets, &env.user, start, end)?;

    println!("Sets per muscle, {} to {}", start, end);
    for entry in volume {
        println!("  {:<16} {:>5.1}", entry.muscle, entry.sets);
    }
    Ok(())
}

fn display_routine(routine: &Routine) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", routine.name);
    println!("╰─────────────────────────────────────────╯");
    println!("  id: {}", routine.id);
    println!(
        "  {} split, {}, {}-{} min per workout",
        routine.split,
        if routine.is_synchronous { "synchronous" } else { "asynchronous" },
        routine.lower_limit_min,
        routine.upper_limit_min
    );

    for day in &routine.days {
        println!();
        if day.day_type.is_rest() {
            println!("  {}", day.name);
            continue;
        }
        println!("  {}  (~{} min)", day.name, day.estimated_time_minutes);
        for planned in &day.planned_sets {
            println!(
                "    → {}  {}x{}",
                planned.exercise, planned.num_sets, planned.reps
            );
        }
    }
    println!();
}
