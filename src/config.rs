use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "titanic-explorer.json";

/// Application settings. Every field has a default, so a partial file
/// (or none at all) is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    /// Directory holding the optional illustration images.
    pub image_dir: PathBuf,
    /// How many titles the name analysis lists.
    pub title_top_n: usize,
    /// Lower age bound pre-selected on the age slider.
    pub min_default_age: i64,
    /// Upper limit of the fare slider.
    pub fare_cap: f64,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/titanic.csv.gz"),
            image_dir: PathBuf::from("img"),
            title_top_n: 10,
            min_default_age: 18,
            fare_cap: 300.0,
            window_size: [1200.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Read settings from `path`; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// [`AppConfig::from_file`] on [`CONFIG_FILE`], falling back to the
    /// defaults with a warning when the file is unreadable.
    pub fn load() -> Self {
        Self::from_file(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
            log::warn!("Ignoring {CONFIG_FILE}: {e:#}");
            Self::default()
        })
    }

    /// Path of an illustration inside `image_dir`.
    pub fn image(&self, file_name: &str) -> PathBuf {
        self.image_dir.join(file_name)
    }
}

/// URI for an illustration on disk, or the warning shown in its place
/// when the file is missing.
pub fn image_source(path: &Path) -> std::result::Result<String, String> {
    if path.is_file() {
        Ok(format!("file://{}", path.display()))
    } else {
        Err(format!("Image not found: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"title_top_n": 5}"#).unwrap();
        assert_eq!(cfg.title_top_n, 5);
        assert_eq!(cfg.fare_cap, 300.0);
        assert_eq!(cfg.data_path, PathBuf::from("data/titanic.csv.gz"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = AppConfig::from_file(Path::new("does/not/exist.json")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("titanic-explorer-cfg-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_image_gives_warning() {
        let path = AppConfig::default().image("no-such-picture.jpg");
        let warning = image_source(&path).unwrap_err();
        assert_eq!(warning, format!("Image not found: {}", path.display()));
    }

    #[test]
    fn test_existing_image_gives_file_uri() {
        let path = std::env::temp_dir().join(format!("titanic-explorer-img-{}.png", std::process::id()));
        std::fs::write(&path, b"png").unwrap();
        let uri = image_source(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(uri, format!("file://{}", path.display()));
    }

    #[test]
    fn test_image_path() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.image("titanic.jpg"), PathBuf::from("img/titanic.jpg"));
    }
}
