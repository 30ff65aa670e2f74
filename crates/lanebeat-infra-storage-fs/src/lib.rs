use lanebeat_ports::storage::{ChartEntry, SettingsDto, StorageError, StoragePort};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const CHART_EXTENSION: &str = "json";

/// Settings and charts under one base directory:
/// `settings.json` plus `charts/<name>.json`.
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_base_dir() -> Result<PathBuf, StorageError> {
        let base = dirs_next::config_dir()
            .ok_or_else(|| StorageError::Io("config dir not found".to_string()))?;
        Ok(base.join("Lanebeat"))
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.base_dir.join("charts")
    }

    /// Stores raw chart text under `name`, replacing any previous copy.
    pub fn write_chart(&self, name: &str, body: &str) -> Result<(), StorageError> {
        let path = self.chart_path(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        fs::write(path, body).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn settings_path(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    fn chart_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StorageError::ChartNotFound(name.to_string()));
        }
        Ok(self
            .charts_dir()
            .join(format!("{name}.{CHART_EXTENSION}")))
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
        let data = fs::read(path).map_err(|e| StorageError::Io(e.to_string()))?;
        serde_json::from_slice(&data).map_err(|e| StorageError::Serde(e.to_string()))
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let data =
            serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serde(e.to_string()))?;
        fs::write(path, data).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl Default for FsStorage {
    fn default() -> Self {
        let base_dir = Self::default_base_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { base_dir }
    }
}

impl StoragePort for FsStorage {
    fn load_settings(&self) -> Result<SettingsDto, StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(SettingsDto::default());
        }
        Self::read_json(&path)
    }

    fn save_settings(&self, s: &SettingsDto) -> Result<(), StorageError> {
        let path = self.settings_path();
        Self::write_json(&path, s)
    }

    fn list_charts(&self) -> Result<Vec<ChartEntry>, StorageError> {
        let dir = self.charts_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut charts = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| StorageError::Io(e.to_string()))? {
            let path = entry.map_err(|e| StorageError::Io(e.to_string()))?.path();
            let is_chart = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(CHART_EXTENSION);
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(name) if is_chart => charts.push(ChartEntry {
                    name: name.to_string(),
                }),
                _ => debug!("skipping {} in chart directory", path.display()),
            }
        }
        charts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(charts)
    }

    fn read_chart(&self, name: &str) -> Result<String, StorageError> {
        let path = self.chart_path(name)?;
        if !path.is_file() {
            return Err(StorageError::ChartNotFound(name.to_string()));
        }
        fs::read_to_string(&path).map_err(|e| StorageError::Io(e.to_string()))
    }
}
