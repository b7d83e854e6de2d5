//! Persistence of the last saved city.
//!
//! Writes never fail from the caller's point of view: a store that cannot be
//! written logs a warning and carries on.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::config::project_dirs;

pub const SAVED_CITY_KEY: &str = "saved_city";

const PREFERENCES_FILE: &str = "WeatherAppPreferences.toml";

pub trait PreferenceStore: Send + Sync + Debug {
    fn save(&self, city: &str);
    fn load(&self) -> Option<String>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_city: Option<String>,
}

/// TOML-backed store in the per-application data directory.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(project_dirs()?.data_dir().join(PREFERENCES_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }

    fn write(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(prefs).context("Failed to serialize preferences")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferences {
    fn save(&self, city: &str) {
        // An unreadable file is replaced rather than blocking the save.
        let mut prefs = self.read().unwrap_or_else(|err| {
            warn!("{err:#}");
            Preferences::default()
        });
        prefs.saved_city = Some(city.to_owned());

        match self.write(&prefs) {
            Ok(()) => debug!("Saved {SAVED_CITY_KEY} = {city:?}"),
            Err(err) => warn!("Could not persist {SAVED_CITY_KEY}: {err:#}"),
        }
    }

    fn load(&self) -> Option<String> {
        match self.read() {
            Ok(prefs) => prefs.saved_city,
            Err(err) => {
                warn!("{err:#}");
                None
            }
        }
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    saved_city: Mutex<Option<String>>,
}

impl MemoryPreferences {
    pub fn with_city(city: &str) -> Self {
        Self { saved_city: Mutex::new(Some(city.to_owned())) }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn save(&self, city: &str) {
        match self.saved_city.lock() {
            Ok(mut slot) => *slot = Some(city.to_owned()),
            Err(_) => warn!("Could not persist {SAVED_CITY_KEY}: preference lock poisoned"),
        }
    }

    fn load(&self) -> Option<String> {
        self.saved_city.lock().ok().and_then(|slot| slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_before_save_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::at(dir.path().join(PREFERENCES_FILE));

        assert_eq!(prefs.load(), None);
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::at(dir.path().join("nested").join(PREFERENCES_FILE));

        prefs.save("Paris");
        assert_eq!(prefs.load().as_deref(), Some("Paris"));

        prefs.save("Oslo");
        assert_eq!(prefs.load().as_deref(), Some("Oslo"));
    }

    #[test]
    fn saved_city_survives_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);

        FilePreferences::at(&path).save("São Paulo");

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains(SAVED_CITY_KEY));
        assert_eq!(FilePreferences::at(&path).load().as_deref(), Some("São Paulo"));
    }

    #[test]
    fn unwritable_location_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let prefs = FilePreferences::at(blocker.join(PREFERENCES_FILE));

        prefs.save("Paris");
        assert_eq!(prefs.load(), None);
    }

    #[test]
    fn corrupt_file_is_overwritten_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        fs::write(&path, "saved_city = ").unwrap();
        let prefs = FilePreferences::at(&path);

        assert_eq!(prefs.load(), None);
        prefs.save("Lima");
        assert_eq!(prefs.load().as_deref(), Some("Lima"));
    }

    #[test]
    fn memory_store_round_trip() {
        let prefs = MemoryPreferences::default();
        assert_eq!(prefs.load(), None);

        prefs.save("Paris");
        assert_eq!(prefs.load().as_deref(), Some("Paris"));
        assert_eq!(MemoryPreferences::with_city("Rome").load().as_deref(), Some("Rome"));
    }
}
