//! Settings file: alert switches, the last duration entered on the timer
//! form, and the default log filter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use timer_core::DurationFields;

use crate::alerts::AlertConfig;

const APP_NAME: &str = "widget-timers";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config directory available for this user")]
    NoConfigDir,
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Timer form contents as stored on disk.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerForm {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl Default for TimerForm {
    fn default() -> Self {
        Self {
            hours: "0".into(),
            minutes: "0".into(),
            seconds: "10".into(),
        }
    }
}

impl From<&TimerForm> for DurationFields {
    fn from(form: &TimerForm) -> Self {
        DurationFields::new(&*form.hours, &*form.minutes, &*form.seconds)
    }
}

impl From<&DurationFields> for TimerForm {
    fn from(fields: &DurationFields) -> Self {
        Self {
            hours: fields.hours.clone(),
            minutes: fields.minutes.clone(),
            seconds: fields.seconds.clone(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub alerts: AlertConfig,
    pub timer: TimerForm,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            alerts: AlertConfig::default(),
            timer: TimerForm::default(),
        }
    }
}

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("", "", APP_NAME).ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::at(dirs.config_dir().join(CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(settings)?;
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        fs::write(&self.path, text).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use timer_core::DurationInput;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("absent.toml"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("nested").join(CONFIG_FILE));
        let mut settings = Settings::default();
        settings.alerts.bell = false;
        settings.timer.minutes = "25".into();
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[alerts]\nbell = false\n").unwrap();
        let settings = ConfigStore::at(&path).load().unwrap();
        assert!(!settings.alerts.bell);
        assert!(settings.alerts.acknowledge);
        assert_eq!(settings.timer, TimerForm::default());
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "alerts = 3").unwrap();
        let err = ConfigStore::at(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_form_conversion() {
        let fields = DurationFields::from(&TimerForm::default());
        assert_eq!(fields.total_seconds(), 10);
        assert_eq!(TimerForm::from(&fields), TimerForm::default());
    }
}
