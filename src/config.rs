use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    StintviewError,
    chart::ChartOptions,
    provider::CachedSessionProvider,
    session::{Circuit, SessionKind},
};

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_YEAR: u16 = 2021;

/// Dashboard settings persisted between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Cache directory of the session provider, `None` uses the default data directory
    pub cache_dir: Option<PathBuf>,
    pub year: u16,
    pub circuit: Circuit,
    pub session_kind: SessionKind,
    pub chart_options: ChartOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            year: DEFAULT_YEAR,
            circuit: Circuit::default(),
            session_kind: SessionKind::default(),
            chart_options: ChartOptions::default(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf, StintviewError> {
        Ok(dirs::config_dir()
            .ok_or(StintviewError::NoConfigDir)?
            .join("stintview")
            .join(CONFIG_FILE_NAME))
    }

    pub fn from_local_file() -> Result<Option<Self>, StintviewError> {
        Self::from_file(&Self::config_path()?)
    }

    pub fn from_file(config_path: &Path) -> Result<Option<Self>, StintviewError> {
        if !config_path.exists() {
            return Ok(None);
        }
        let file = std::fs::File::open(config_path)
            .map_err(|e| StintviewError::ConfigIOError { source: e })?;
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|e| StintviewError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), StintviewError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), StintviewError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StintviewError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| StintviewError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| StintviewError::ConfigSerializeError { source: e })
    }

    /// Resolves the cache directory, falling back to the default data directory.
    pub fn resolved_cache_dir(&self) -> Result<PathBuf, StintviewError> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => CachedSessionProvider::default_cache_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            AppConfig::from_file(&temp_dir.path().join("config.json")).unwrap(),
            None
        );
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stintview").join("config.json");
        let config = AppConfig {
            cache_dir: Some(PathBuf::from("/tmp/f1")),
            year: 2019,
            circuit: Circuit::Silverstone,
            session_kind: SessionKind::Qualifying,
            chart_options: ChartOptions {
                show_pit_stops: false,
                ..Default::default()
            },
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::from_file(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"year": 2023, "chart_options": {"show_safety_car": false}}"#)
            .unwrap();
        let config = AppConfig::from_file(&path).unwrap().unwrap();
        assert_eq!(config.year, 2023);
        assert_eq!(config.circuit, Circuit::Monza);
        assert!(!config.chart_options.show_safety_car);
        assert!(config.chart_options.show_pit_stops);
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        match AppConfig::from_file(&path) {
            Err(StintviewError::ConfigSerializeError { .. }) => {}
            other => panic!("Expected ConfigSerializeError, got {:?}", other),
        }
    }
}
