//! Profile load/save backends.
//!
//! One profile per installation, stored under a single fixed key
//! (`~/.minesweep/profile.json` by default).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::constants::{PROFILE_FILE_NAME, SAVE_DIR_NAME};

use super::types::PlayerProfile;

/// Persistence collaborator for the player profile.
pub trait ProfileBackend {
    /// Stored profile, or `None` when missing or unreadable.
    ///
    /// An unreadable profile must be set aside before returning `None`,
    /// since the caller saves a fresh profile in its place.
    fn load(&self) -> Option<PlayerProfile>;

    /// Persist a full profile snapshot.
    fn save(&mut self, profile: &PlayerProfile) -> io::Result<()>;
}

/// Get the ~/.minesweep/ directory path, creating it if needed.
pub fn save_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(SAVE_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Pretty-printed JSON file backend.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Backend at the default location in the home directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            path: save_dir()?.join(PROFILE_FILE_NAME),
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable profile is moved, e.g. `profile.json.bak`.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Move the current file to [`Self::backup_path`], replacing an older backup.
    fn back_up(&self) {
        let backup = self.backup_path();
        match fs::rename(&self.path, &backup) {
            Ok(()) => log::warn!("moved unreadable profile to {}", backup.display()),
            Err(e) => log::warn!(
                "could not back up profile {}: {}",
                self.path.display(),
                e
            ),
        }
    }

    /// Remove the stored profile. Missing files are not an error.
    pub fn delete(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl ProfileBackend for JsonFileBackend {
    fn load(&self) -> Option<PlayerProfile> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("could not read profile {}: {}", self.path.display(), e);
                self.back_up();
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                log::warn!("ignoring corrupt profile {}: {}", self.path.display(), e);
                self.back_up();
                None
            }
        }
    }

    fn save(&mut self, profile: &PlayerProfile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory backend for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    stored: Option<PlayerProfile>,
    save_count: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with a profile.
    pub fn with_profile(profile: PlayerProfile) -> Self {
        Self {
            stored: Some(profile),
            save_count: 0,
        }
    }

    pub fn stored(&self) -> Option<&PlayerProfile> {
        self.stored.as_ref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ProfileBackend for MemoryBackend {
    fn load(&self) -> Option<PlayerProfile> {
        self.stored.clone()
    }

    fn save(&mut self, profile: &PlayerProfile) -> io::Result<()> {
        self.stored = Some(profile.clone());
        self.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn temp_path() -> PathBuf {
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("minesweep-test-{}-{}", std::process::id(), test_id))
            .join(PROFILE_FILE_NAME)
    }

    #[test]
    fn test_json_save_and_load() {
        let path = temp_path();
        let mut backend = JsonFileBackend::with_path(&path);
        let mut profile = PlayerProfile::new("saved".to_string(), 10);
        profile.total_score = 321;
        profile.best_time_seconds = Some(44);

        backend.save(&profile).expect("save should succeed");
        let loaded = backend.load().expect("profile should load");
        assert_eq!(loaded, profile);

        backend.delete().unwrap();
        assert!(backend.load().is_none());
    }

    #[test]
    fn test_missing_file_loads_none() {
        let backend = JsonFileBackend::with_path(temp_path());
        assert!(backend.load().is_none());
        assert!(backend.delete().is_ok());
    }

    #[test]
    fn test_corrupt_file_loads_none() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::with_path(&path);
        assert!(backend.load().is_none());
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(backend.backup_path()).unwrap(),
            "{ not json"
        );
        fs::remove_file(backend.backup_path()).unwrap();
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        let backend = JsonFileBackend::with_path("/tmp/saves/profile.json");
        assert_eq!(
            backend.backup_path(),
            PathBuf::from("/tmp/saves/profile.json.bak")
        );
    }

    #[test]
    fn test_unknown_ability_is_corrupt() {
        let path = temp_path();
        let mut backend = JsonFileBackend::with_path(&path);
        backend
            .save(&PlayerProfile::new("x".to_string(), 0))
            .unwrap();
        let json = fs::read_to_string(&path).unwrap().replace("hint", "fireball");
        fs::write(&path, json).unwrap();

        assert!(backend.load().is_none());
        assert!(fs::read_to_string(backend.backup_path())
            .unwrap()
            .contains("fireball"));
        fs::remove_file(backend.backup_path()).unwrap();
    }

    #[test]
    fn test_memory_backend_counts_saves() {
        let mut backend = MemoryBackend::new();
        assert!(backend.load().is_none());

        let profile = PlayerProfile::new("m".to_string(), 0);
        backend.save(&profile).unwrap();
        backend.save(&profile).unwrap();

        assert_eq!(backend.save_count(), 2);
        assert_eq!(backend.load(), Some(profile));
    }
}
