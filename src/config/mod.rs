//! Persisted editor settings. An explicit struct handed to the session at
//! construction and saved back on exit; there is no process-wide singleton.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(String),
    #[error("config file is not valid JSON: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 1400,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub font_family: String,
    pub font_size: u16,
    pub text_color: String,
    pub background_color: String,
    pub auto_validate: bool,
    /// Trailing-edge debounce delay for re-validation after a text change.
    pub validation_delay_ms: u64,
    pub window_geometry: WindowGeometry,
    pub splitter_sizes: Vec<u32>,
    /// Most-recent-first, de-duplicated by path, capped at `max_recent_files`.
    pub recent_files: Vec<PathBuf>,
    pub max_recent_files: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_family: "Consolas".to_string(),
            font_size: 12,
            text_color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            auto_validate: true,
            validation_delay_ms: 500,
            window_geometry: WindowGeometry::default(),
            splitter_sizes: vec![700, 300],
            recent_files: Vec::new(),
            max_recent_files: 10,
        }
    }
}

impl EditorConfig {
    /// Loads settings from a JSON file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config =
            serde_json::from_str(&text).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let text =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        fs::write(path, text).map_err(|e| ConfigError::Io(e.to_string()))?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Moves (or inserts) `path` to the front of the recent-file list and
    /// trims it to the configured maximum.
    pub fn add_recent_file(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_path_buf());
        self.recent_files.truncate(self.max_recent_files);
    }

    pub fn clear_recent_files(&mut self) {
        self.recent_files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.font_family, "Consolas");
        assert_eq!(config.validation_delay_ms, 500);
        assert_eq!(config.splitter_sizes, vec![700, 300]);
        assert_eq!(config.max_recent_files, 10);
        assert!(config.recent_files.is_empty());
    }

    #[test]
    fn test_recent_files_dedup_and_order() {
        let mut config = EditorConfig::default();
        config.add_recent_file(Path::new("/a.json"));
        config.add_recent_file(Path::new("/b.json"));
        config.add_recent_file(Path::new("/a.json"));
        assert_eq!(
            config.recent_files,
            vec![PathBuf::from("/a.json"), PathBuf::from("/b.json")]
        );
    }

    #[test]
    fn test_recent_files_capped() {
        let mut config = EditorConfig {
            max_recent_files: 3,
            ..EditorConfig::default()
        };
        for i in 0..5 {
            config.add_recent_file(Path::new(&format!("/f{}.json", i)));
        }
        assert_eq!(config.recent_files.len(), 3);
        assert_eq!(config.recent_files[0], PathBuf::from("/f4.json"));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join("jot_config_test");
        let path = dir.join("config.json");
        let mut config = EditorConfig::default();
        config.font_size = 16;
        config.add_recent_file(Path::new("/tmp/x.json"));
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let loaded = EditorConfig::load(Path::new("/nonexistent/jot.json")).unwrap();
        assert_eq!(loaded, EditorConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = std::env::temp_dir().join("jot_config_partial_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"font_size": 20}"#).unwrap();
        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded.font_size, 20);
        assert_eq!(loaded.font_family, "Consolas");
        std::fs::remove_dir_all(&dir).ok();
    }
}
