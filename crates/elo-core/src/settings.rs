//! Application settings
//!
//! Non-secret configuration lives in a plain `settings.json` next to the
//! vault files. The database location is static configuration: it is turned
//! into a connection string once, then stored encrypted alongside the login.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{EloError, Result};

/// Backend the application talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    #[default]
    Postgres,
    Sqlite,
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseDriver::Postgres => f.write_str("postgres"),
            DatabaseDriver::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    pub driver: DatabaseDriver,
    pub host: String,
    pub port: u16,
    /// Database name for postgres, file path for sqlite
    pub service_name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::Postgres,
            host: "localhost".to_string(),
            port: 5432,
            service_name: "elo".to_string(),
        }
    }
}

impl DatabaseSettings {
    /// Combine driver, host, port and service into one connection string
    pub fn connection_string(&self) -> String {
        match self.driver {
            DatabaseDriver::Postgres => format!(
                "postgres://{}:{}/{}",
                self.host, self.port, self.service_name
            ),
            DatabaseDriver::Sqlite => format!("sqlite://{}?mode=rwc", self.service_name),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub version: u32,
    pub database: DatabaseSettings,
    /// Export directory, relative paths resolve against the data directory
    pub export_dir: PathBuf,
    /// Log file name, relative paths resolve against the data directory
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            database: DatabaseSettings::default(),
            export_dir: PathBuf::from("export"),
            log_file: PathBuf::from("elo.log"),
        }
    }
}

/// Default data directory for the platform
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("org", "elo", "elo")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| EloError::SettingsError("could not determine data directory".to_string()))
}

/// Loads and saves `settings.json`
pub struct SettingsManager {
    data_dir: PathBuf,
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from `data_dir`, falling back to defaults when absent
    pub fn new(data_dir: &Path) -> Result<Self> {
        let settings_file = data_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            settings_file,
            settings,
        })
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)
            .map_err(|e| EloError::SettingsError(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Write settings atomically
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        tokio::fs::create_dir_all(&self.data_dir).await?;
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Export directory resolved against the data directory
    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join(&self.settings.export_dir)
    }

    /// Log file path resolved against the data directory
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(&self.settings.log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path()).unwrap();

        assert_eq!(manager.get(), &Settings::default());
        assert_eq!(
            manager.get().database.connection_string(),
            "postgres://localhost:5432/elo"
        );
        assert_eq!(manager.export_dir(), temp_dir.path().join("export"));
    }

    #[test]
    fn test_sqlite_connection_string() {
        let db = DatabaseSettings {
            driver: DatabaseDriver::Sqlite,
            service_name: "/tmp/elo.db".to_string(),
            ..DatabaseSettings::default()
        };
        assert_eq!(db.connection_string(), "sqlite:///tmp/elo.db?mode=rwc");
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut manager = SettingsManager::new(temp_dir.path()).unwrap();
            manager.get_mut().database.host = "db.defesacivil.local".to_string();
            manager.get_mut().database.port = 6543;
            manager.save().await.unwrap();
        }

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(manager.get().database.host, "db.defesacivil.local");
        assert_eq!(manager.get().database.port, 6543);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{ "database": { "driver": "sqlite", "host": "", "port": 0, "serviceName": "elo.db" } }"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(manager.get().database.driver, DatabaseDriver::Sqlite);
        assert_eq!(manager.get().log_file, PathBuf::from("elo.log"));
    }

    #[test]
    fn test_partial_database_section_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{ "database": { "host": "db.defesacivil.local" } }"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        let db = &manager.get().database;
        assert_eq!(db.host, "db.defesacivil.local");
        assert_eq!(db.driver, DatabaseDriver::Postgres);
        assert_eq!(db.port, 5432);
        assert_eq!(db.service_name, "elo");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{ not json").unwrap();

        assert!(matches!(
            SettingsManager::new(temp_dir.path()),
            Err(EloError::SettingsError(_))
        ));
    }
}
