//! Daily body-weight log with file locking.
//!
//! One entry per (user, date). Logging a weight of zero for a date that
//! already has an entry removes it. Writers hold an exclusive lock on a
//! sidecar lock file for the whole load-modify-save cycle.

use crate::{DailyWeight, Error, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Outcome of logging a weight
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightChange {
    Created,
    Updated,
    Removed,
    /// Zero logged for a date with no entry
    Unchanged,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WeightFile {
    weights: Vec<DailyWeight>,
}

/// JSON-file weight log
pub struct WeightLog {
    path: PathBuf,
}

impl WeightLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Where an unreadable log is moved before it is replaced
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }

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

    fn read_file(&self) -> Result<WeightFile> {
        if !self.path.exists() {
            return Ok(WeightFile::default());
        }
        let file = File::open(&self.path)?;
        let weights: WeightFile = serde_json::from_reader(BufReader::new(file))?;
        Ok(weights)
    }

    fn write_file(&self, weights: &WeightFile) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Other(format!("Weight log {:?} has no parent", self.path)))?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, weights)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("Saved weight log to {:?}", self.path);
        Ok(())
    }

    /// Snapshot for reading. An unreadable log reads as empty.
    fn snapshot(&self) -> Result<WeightFile> {
        if !self.path.exists() {
            return Ok(WeightFile::default());
        }
        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let result = self.read_file();
        lock.unlock()?;

        match result {
            Err(Error::Json(e)) => {
                tracing::warn!("Failed to parse weight log {:?}: {}. Reading as empty.", self.path, e);
                Ok(WeightFile::default())
            }
            other => other,
        }
    }

    /// Run a load-modify-save cycle under the exclusive lock.
    ///
    /// An unreadable log is moved aside to `corrupt_path()` first, so its
    /// contents are never overwritten.
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WeightFile) -> Result<(T, bool)>,
    {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let result = self.load_for_update().and_then(|mut contents| {
            let (value, changed) = f(&mut contents)?;
            if changed {
                self.write_file(&contents)?;
            }
            Ok(value)
        });
        lock.unlock()?;
        result
    }

    fn load_for_update(&self) -> Result<WeightFile> {
        match self.read_file() {
            Err(Error::Json(e)) => {
                let aside = self.corrupt_path();
                tracing::warn!(
                    "Failed to parse weight log {:?}: {}. Moving it to {:?}.",
                    self.path,
                    e,
                    aside
                );
                std::fs::rename(&self.path, &aside)?;
                Ok(WeightFile::default())
            }
            other => other,
        }
    }

    /// Log `weight` for `user` on `date`
    pub fn set_weight(&mut self, user: &str, date: NaiveDate, weight: f64) -> Result<WeightChange> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidInput(format!("Invalid weight: {}", weight)));
        }

        let change = self.update(|file| {
            let existing = file
                .weights
                .iter()
                .position(|w| w.user == user && w.date == date);

            let change = match (existing, weight == 0.0) {
                (Some(idx), true) => {
                    file.weights.remove(idx);
                    WeightChange::Removed
                }
                (Some(idx), false) => {
                    file.weights[idx].weight = weight;
                    WeightChange::Updated
                }
                (None, true) => WeightChange::Unchanged,
                (None, false) => {
                    file.weights.push(DailyWeight {
                        user: user.into(),
                        date,
                        weight,
                    });
                    WeightChange::Created
                }
            };
            Ok((change, change != WeightChange::Unchanged))
        })?;

        tracing::info!("Weight for {} on {}: {:?}", user, date, change);
        Ok(change)
    }

    /// A user's weights ordered by date
    pub fn list_for_user(&self, user: &str) -> Result<Vec<DailyWeight>> {
        let mut weights: Vec<_> = self
            .snapshot()?
            .weights
            .into_iter()
            .filter(|w| w.user == user)
            .collect();
        weights.sort_by_key(|w| w.date);
        Ok(weights)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_create_then_update() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = WeightLog::new(temp_dir.path().join("weights.json"));

        assert_eq!(
            log.set_weight("alex", date("2024-02-01"), 180.5).unwrap(),
            WeightChange::Created
        );
        assert_eq!(
            log.set_weight("alex", date("2024-02-01"), 179.0).unwrap(),
            WeightChange::Updated
        );

        let weights = log.list_for_user("alex").unwrap();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].weight, 179.0);
    }

    #[test]
    fn test_zero_removes_existing_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = WeightLog::new(temp_dir.path().join("weights.json"));
        log.set_weight("alex", date("2024-02-01"), 180.0).unwrap();

        assert_eq!(
            log.set_weight("alex", date("2024-02-01"), 0.0).unwrap(),
            WeightChange::Removed
        );
        assert!(log.list_for_user("alex").unwrap().is_empty());
        assert_eq!(
            log.set_weight("alex", date("2024-02-01"), 0.0).unwrap(),
            WeightChange::Unchanged
        );
    }

    #[test]
    fn test_entries_are_per_user_and_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = WeightLog::new(temp_dir.path().join("weights.json"));
        log.set_weight("alex", date("2024-02-03"), 181.0).unwrap();
        log.set_weight("alex", date("2024-02-01"), 180.0).unwrap();
        log.set_weight("sam", date("2024-02-01"), 150.0).unwrap();

        let weights = log.list_for_user("alex").unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].date, date("2024-02-01"));
        assert_eq!(log.list_for_user("sam").unwrap().len(), 1);
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = WeightLog::new(temp_dir.path().join("weights.json"));
        let result = log.set_weight("alex", date("2024-02-01"), -3.0);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_corrupted_log_reads_as_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weights.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let log = WeightLog::new(&path);
        assert!(log.list_for_user("alex").unwrap().is_empty());
        // Reading leaves the file alone
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ invalid json }");
    }

    #[test]
    fn test_corrupted_log_is_moved_aside_before_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weights.json");
        let mut log = WeightLog::new(&path);
        log.set_weight("sam", date("2024-01-01"), 150.0).unwrap();

        let mut damaged = std::fs::read_to_string(&path).unwrap();
        damaged.push('x');
        std::fs::write(&path, &damaged).unwrap();

        log.set_weight("alex", date("2024-01-02"), 180.0).unwrap();

        let aside = std::fs::read_to_string(log.corrupt_path()).unwrap();
        assert_eq!(aside, damaged);
        assert!(aside.contains("\"sam\""));
        assert_eq!(log.list_for_user("alex").unwrap().len(), 1);
    }

    #[test]
    fn test_zero_on_corrupted_log_still_preserves_it() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weights.json");
        std::fs::write(&path, "{ invalid json }").unwrap();
        let mut log = WeightLog::new(&path);

        assert_eq!(
            log.set_weight("alex", date("2024-01-02"), 0.0).unwrap(),
            WeightChange::Unchanged
        );
        assert_eq!(
            std::fs::read_to_string(log.corrupt_path()).unwrap(),
            "{ invalid json }"
        );
    }

    #[test]
    fn test_concurrent_writers_keep_every_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weights.json");

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let mut log = WeightLog::new(path);
                    let user = format!("user{}", t);
                    let first = date("2024-01-01");
                    for day in 0..20 {
                        let when = first + chrono::Duration::days(day);
                        log.set_weight(&user, when, 150.0 + day as f64).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let log = WeightLog::new(&path);
        for t in 0..8 {
            assert_eq!(log.list_for_user(&format!("user{}", t)).unwrap().len(), 20);
        }
    }
}
