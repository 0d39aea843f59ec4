//! Routine persistence with file locking.
//!
//! All routines live in one JSON document. Writers hold an exclusive lock on
//! a sidecar lock file for the whole load-modify-save cycle and replace the
//! document atomically.

use crate::{Error, Result, Routine};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Routine sink trait for persisting newly generated routines
pub trait RoutineSink {
    /// Persist a routine together with its days and planned sets
    fn create(&mut self, routine: &Routine) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RoutineFile {
    routines: Vec<Routine>,
}

/// JSON-file routine store
pub struct RoutineStore {
    path: PathBuf,
}

impl RoutineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Open (creating if needed) the lock file guarding the store
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

    fn read_file(&self) -> Result<RoutineFile> {
        if !self.path.exists() {
            return Ok(RoutineFile::default());
        }
        let file = File::open(&self.path)?;
        let contents: RoutineFile = serde_json::from_reader(BufReader::new(file))?;
        Ok(contents)
    }

    fn write_file(&self, contents: &RoutineFile) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Other(format!("Store path {:?} has no parent", self.path)))?;
        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, contents)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Run a load-modify-save cycle under the exclusive lock
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut RoutineFile) -> Result<T>,
    {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let result = self.read_file().and_then(|mut contents| {
            let value = f(&mut contents)?;
            self.write_file(&contents)?;
            Ok(value)
        });
        lock.unlock()?;
        result
    }

    fn snapshot(&self) -> Result<RoutineFile> {
        if !self.path.exists() {
            return Ok(RoutineFile::default());
        }
        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let result = self.read_file();
        lock.unlock()?;
        result
    }

    /// All routines belonging to `user`, newest first
    pub fn list_for_user(&self, user: &str) -> Result<Vec<Routine>> {
        let mut routines: Vec<_> = self
            .snapshot()?
            .routines
            .into_iter()
            .filter(|r| r.user == user)
            .collect();
        routines.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!("Loaded {} routines for {}", routines.len(), user);
        Ok(routines)
    }

    pub fn get(&self, id: Uuid) -> Result<Routine> {
        self.snapshot()?
            .routines
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Routine {}", id)))
    }

    /// Fetch a routine and check it belongs to `user`
    pub fn get_owned(&self, id: Uuid, user: &str) -> Result<Routine> {
        let routine = self.get(id)?;
        if routine.user != user {
            return Err(Error::NotOwner(format!("Routine {} belongs to another user", id)));
        }
        Ok(routine)
    }

    /// Delete a routine owned by `user`; its days and planned sets go with it
    pub fn delete(&self, id: Uuid, user: &str) -> Result<Routine> {
        let removed = self.update(|contents| {
            let idx = contents
                .routines
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| Error::NotFound(format!("Routine {}", id)))?;
            if contents.routines[idx].user != user {
                return Err(Error::NotOwner(format!(
                    "Routine {} belongs to another user",
                    id
                )));
            }
            Ok(contents.routines.remove(idx))
        })?;
        tracing::info!("Deleted routine {} ({} days)", id, removed.days.len());
        Ok(removed)
    }
}

impl RoutineSink for RoutineStore {
    fn create(&mut self, routine: &Routine) -> Result<()> {
        self.update(|contents| {
            if contents.routines.iter().any(|r| r.id == routine.id) {
                return Err(Error::Other(format!("Routine {} already stored", routine.id)));
            }
            contents.routines.push(routine.clone());
            Ok(())
        })?;
        tracing::info!("Stored routine {} for {}", routine.id, routine.user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Day, DayType, Split};
    use chrono::{Duration, Utc};

    fn routine(user: &str, hours_ago: i64) -> Routine {
        Routine {
            id: Uuid::new_v4(),
            name: "Test Routine".into(),
            user: user.into(),
            created_at: Utc::now() - Duration::hours(hours_ago),
            split: Split::Bro,
            is_synchronous: true,
            lower_limit_min: 45,
            upper_limit_min: 75,
            is_muscle_focused: false,
            days: vec![Day::new("Rest", DayType::Rest)],
        }
    }

    #[test]
    fn test_create_and_get() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RoutineStore::new(temp_dir.path().join("routines.json"));

        let r = routine("alex", 0);
        store.create(&r).unwrap();

        let loaded = store.get(r.id).unwrap();
        assert_eq!(loaded.name, "Test Routine");
        assert_eq!(loaded.days.len(), 1);
    }

    #[test]
    fn test_list_is_per_user_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RoutineStore::new(temp_dir.path().join("routines.json"));

        let old = routine("alex", 48);
        let new = routine("alex", 1);
        store.create(&old).unwrap();
        store.create(&new).unwrap();
        store.create(&routine("jordan", 0)).unwrap();

        let listed = store.list_for_user("alex").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, new.id);
        assert_eq!(listed[1].id, old.id);
    }

    #[test]
    fn test_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = RoutineStore::new(temp_dir.path().join("routines.json"));
        assert!(store.list_for_user("alex").unwrap().is_empty());
        assert!(matches!(store.get(Uuid::new_v4()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_checks_owner() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RoutineStore::new(temp_dir.path().join("routines.json"));
        let r = routine("alex", 0);
        store.create(&r).unwrap();

        assert!(matches!(store.delete(r.id, "jordan"), Err(Error::NotOwner(_))));
        assert!(store.get(r.id).is_ok());

        store.delete(r.id, "alex").unwrap();
        assert!(matches!(store.get(r.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_get_owned() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RoutineStore::new(temp_dir.path().join("routines.json"));
        let r = routine("alex", 0);
        store.create(&r).unwrap();

        assert!(store.get_owned(r.id, "alex").is_ok());
        assert!(matches!(store.get_owned(r.id, "sam"), Err(Error::NotOwner(_))));
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RoutineStore::new(temp_dir.path().join("routines.json"));
        let r = routine("alex", 0);
        store.create(&r).unwrap();
        assert!(store.create(&r).is_err());
        assert_eq!(store.list_for_user("alex").unwrap().len(), 1);
    }
}
