//! Append-only log of sets the user performed.
//!
//! Sets are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access.

use crate::{Error, LoggedSet, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// JSONL-based set log with file locking
pub struct SetLog {
    path: PathBuf,
}

/// Changes applied when editing a logged set
#[derive(Clone, Debug, Default)]
pub struct SetEdit {
    pub date: Option<NaiveDate>,
    pub exercise_id: Option<String>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
}

impl SetLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Open (creating if needed) the lock file guarding the log.
    ///
    /// `edit` replaces the log file, so locks are never taken on the log
    /// itself: a handle opened before the replacement would point at the
    /// old, unlinked file.
    fn open_lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        Ok(file)
    }

    pub fn append(&mut self, set: &LoggedSet) -> Result<()> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let result = self.append_locked(set);
        lock.unlock()?;
        result?;

        tracing::debug!("Appended set {} to log", set.id);
        Ok(())
    }

    fn append_locked(&self, set: &LoggedSet) -> Result<()> {
        // Opened only after the lock is held, so this is the current file
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(set)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Every set in the log, in the order they were logged
    pub fn read_all(&self) -> Result<Vec<LoggedSet>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let sets = File::open(&self.path)
            .map_err(Error::from)
            .and_then(|file| parse_lines(&file));
        lock.unlock()?;

        let sets = sets?;
        tracing::debug!("Read {} sets from log", sets.len());
        Ok(sets)
    }

    /// Sets logged by `user`
    pub fn read_for_user(&self, user: &str) -> Result<Vec<LoggedSet>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|s| s.logged_by == user)
            .collect())
    }

    /// Edit a set in place. Only the user who logged it may change it.
    pub fn edit(&mut self, id: Uuid, user: &str, edit: &SetEdit) -> Result<LoggedSet> {
        if !self.path.exists() {
            return Err(Error::NotFound(format!("Set {}", id)));
        }

        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let result = self.rewrite_locked(id, user, edit);
        lock.unlock()?;

        let updated = result?;
        tracing::info!("Edited set {}", id);
        Ok(updated)
    }

    fn rewrite_locked(&self, id: Uuid, user: &str, edit: &SetEdit) -> Result<LoggedSet> {
        let mut sets = parse_lines(&File::open(&self.path)?)?;
        let set = sets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("Set {}", id)))?;
        if set.logged_by != user {
            return Err(Error::NotOwner(format!("Set {} was logged by another user", id)));
        }

        if let Some(date) = edit.date {
            set.date = date;
        }
        if let Some(ref exercise_id) = edit.exercise_id {
            set.exercise_id = exercise_id.clone();
        }
        if let Some(reps) = edit.reps {
            set.reps = reps;
        }
        if let Some(weight) = edit.weight {
            set.weight = weight;
        }
        let updated = set.clone();

        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Other(format!("Set log {:?} has no parent", self.path)))?;
        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for s in &sets {
                serde_json::to_writer(&mut writer, s)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        Ok(updated)
    }
}

fn parse_lines(file: &File) -> Result<Vec<LoggedSet>> {
    let reader = BufReader::new(file);
    let mut sets = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<LoggedSet>(&line) {
            Ok(set) => sets.push(set),
            Err(e) => {
                tracing::warn!("Failed to parse set at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(sets)
}

/// Group sets by date, newest date first
pub fn group_by_date(sets: &[LoggedSet]) -> Vec<(NaiveDate, Vec<&LoggedSet>)> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&LoggedSet>> = BTreeMap::new();
    for set in sets {
        by_date.entry(set.date).or_default().push(set);
    }
    by_date.into_iter().rev().collect()
}
