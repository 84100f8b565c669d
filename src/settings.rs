//! Persisted user preferences, stored as JSON in the OS config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::{LocalBackend, ProjectBackend, RestBackend};
use crate::error::BackendError;
use crate::model::Granularity;

/// Environment variable that points the app at a REST server.
pub const BACKEND_URL_ENV: &str = "TIMELINE_BACKEND_URL";

const APP_NAME: &str = "ProjectTimeline";
const WORKSPACE_FILE: &str = "workspace.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

/// Where projects are read from and written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendSettings {
    /// JSON file; `None` means the default file in the data directory.
    Local {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Rest { base_url: String },
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings::Local { path: None }
    }
}

impl BackendSettings {
    pub fn open(&self) -> Result<Box<dyn ProjectBackend>, BackendError> {
        let backend: Box<dyn ProjectBackend> = match self {
            BackendSettings::Local { path } => {
                let path = path.clone().unwrap_or_else(default_workspace_path);
                Box::new(LocalBackend::open(path)?)
            }
            BackendSettings::Rest { base_url } => Box::new(RestBackend::new(base_url)?),
        };
        Ok(backend)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub granularity: Granularity,
    pub backend: BackendSettings,
}

impl AppSettings {
    /// Load from the default location and apply the environment override.
    pub fn load() -> Self {
        Self::load_from(&settings_path()).with_backend_url(std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Read settings from `path`. A missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read settings");
                return Self::default();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            Self::default()
        })
    }

    pub fn save(&self) -> std::io::Result<()> {
        self.save_to(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Switch to the REST backend when `url` is a non-empty value.
    pub fn with_backend_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            tracing::info!(%url, "backend overridden from {}", BACKEND_URL_ENV);
            self.backend = BackendSettings::Rest { base_url: url };
        }
        self
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

pub fn settings_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("settings.json")
}

/// Folder holding the local workspace file.
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_workspace_path() -> PathBuf {
    data_dir().join(WORKSPACE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("settings.json");
        let settings = AppSettings {
            theme: ThemeMode::Dark,
            granularity: Granularity::Quarter,
            backend: BackendSettings::Rest {
                base_url: "http://localhost:5000".into(),
            },
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn partial_and_broken_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let partial = AppSettings::load_from(&path);
        assert_eq!(partial.theme, ThemeMode::Dark);
        assert_eq!(partial.backend, BackendSettings::Local { path: None });

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn backend_url_override_switches_to_rest() {
        let settings = AppSettings::default().with_backend_url(Some(" http://srv:8000 ".into()));
        assert_eq!(
            settings.backend,
            BackendSettings::Rest {
                base_url: "http://srv:8000".into()
            }
        );

        let untouched = AppSettings::default().with_backend_url(Some("  ".into()));
        assert_eq!(untouched.backend, BackendSettings::default());
    }

    #[test]
    fn local_backend_opens_at_the_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ws.json");
        let backend = BackendSettings::Local {
            path: Some(path.clone()),
        }
        .open()
        .unwrap();
        assert!(backend.describe().contains("ws.json"));
        assert!(path.exists());
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert!(ThemeMode::Light.toggled().is_dark());
    }
}
