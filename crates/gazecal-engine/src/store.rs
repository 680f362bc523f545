//! Profile persistence boundary.
//!
//! The engine only depends on the [`ProfileStore`] contract; storage
//! technology is the collaborator's concern. Two implementations are
//! provided: an in-memory map for tests and composition, and a
//! one-JSON-file-per-profile directory store.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use gazecal_core::{CalibrationProfile, ProfileId};

/// Failures of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No profile stored under the given id.
    #[error("profile '{0}' not found")]
    NotFound(ProfileId),
    /// Filesystem failure.
    #[error("profile store i/o failure: {0}")]
    Io(#[from] io::Error),
    /// Profile (de)serialization failure.
    #[error("profile (de)serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable storage contract for calibration profiles.
///
/// `load` returns [`StoreError::NotFound`] for unknown ids; `save`
/// overwrites; `delete` fails with `NotFound` when nothing was stored.
pub trait ProfileStore {
    fn load(&self, id: &ProfileId) -> Result<CalibrationProfile, StoreError>;
    fn save(&mut self, profile: &CalibrationProfile) -> Result<(), StoreError>;
    fn delete(&mut self, id: &ProfileId) -> Result<(), StoreError>;
    /// List stored profile ids in a stable order.
    fn list(&self) -> Result<Vec<ProfileId>, StoreError>;
}

/// In-memory profile store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: BTreeMap<ProfileId, CalibrationProfile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self, id: &ProfileId) -> Result<CalibrationProfile, StoreError> {
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&mut self, profile: &CalibrationProfile) -> Result<(), StoreError> {
        self.profiles
            .insert(profile.profile_id().clone(), profile.clone());
        Ok(())
    }

    fn delete(&mut self, id: &ProfileId) -> Result<(), StoreError> {
        self.profiles
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn list(&self) -> Result<Vec<ProfileId>, StoreError> {
        Ok(self.profiles.keys().cloned().collect())
    }
}

/// Directory-backed store with one pretty-printed JSON file per profile.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn profile_path(&self, id: &ProfileId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self, id: &ProfileId) -> Result<CalibrationProfile, StoreError> {
        let path = self.profile_path(id);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        let profile = serde_json::from_reader(io::BufReader::new(file))?;
        debug!("loaded profile '{}' from {}", id, path.display());
        Ok(profile)
    }

    fn save(&mut self, profile: &CalibrationProfile) -> Result<(), StoreError> {
        let path = self.profile_path(profile.profile_id());
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(io::BufWriter::new(file), profile)?;
        debug!(
            "saved profile '{}' ({} points) to {}",
            profile.profile_id(),
            profile.len(),
            path.display()
        );
        Ok(())
    }

    fn delete(&mut self, id: &ProfileId) -> Result<(), StoreError> {
        let path = self.profile_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<ProfileId>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(ProfileId::new(stem));
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazecal_core::{CalibrationPoint, EyeCoordinates, GazeVector, Pt2};

    fn profile_with_point(id: &str) -> CalibrationProfile {
        let mut profile = CalibrationProfile::new(ProfileId::from(id));
        profile.add_point(
            CalibrationPoint::new(
                GazeVector::new(0.1, -0.2),
                EyeCoordinates::new(320.0, 240.0),
                Pt2::new(800.0, 450.0),
            )
            .unwrap(),
        );
        profile
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        let profile = profile_with_point("alice");
        store.save(&profile).unwrap();

        let loaded = store.load(profile.profile_id()).unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(store.list().unwrap(), vec![ProfileId::from("alice")]);

        store.delete(profile.profile_id()).unwrap();
        assert!(matches!(
            store.load(profile.profile_id()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn memory_store_missing_profile() {
        let store = MemoryStore::new();
        let err = store.load(&ProfileId::from("ghost")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn json_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "gazecal-store-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut store = JsonFileStore::new(&dir).unwrap();

        let profile = profile_with_point("bob");
        store.save(&profile).unwrap();

        let loaded = store.load(profile.profile_id()).unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(store.list().unwrap(), vec![ProfileId::from("bob")]);

        store.delete(profile.profile_id()).unwrap();
        assert!(matches!(
            store.load(profile.profile_id()),
            Err(StoreError::NotFound(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_store_delete_missing_is_not_found() {
        let dir = std::env::temp_dir().join(format!(
            "gazecal-store-del-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut store = JsonFileStore::new(&dir).unwrap();
        let err = store.delete(&ProfileId::from("ghost")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let _ = fs::remove_dir_all(&dir);
    }
}
