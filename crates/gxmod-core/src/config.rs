use crate::CoreError;
use gxmod_store::ArchiveFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "GXMOD_CONFIG";
pub const DEFAULT_SESSION_FILE: &str = "gxmod-session.json";

/// User-level defaults for the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Session file used when `--session` is not given.
    pub session: PathBuf,
    /// Archive format when the output extension names none.
    pub archive_format: ArchiveFormat,
    /// How many missing paths the export confirmation lists.
    pub confirm_preview_limit: usize,
    /// Extension of generated silent filler files.
    pub placeholder_extension: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            session: PathBuf::from(DEFAULT_SESSION_FILE),
            archive_format: ArchiveFormat::Zip,
            confirm_preview_limit: 20,
            placeholder_extension: "mp3".to_owned(),
        }
    }
}

impl BuilderConfig {
    /// Load from `$GXMOD_CONFIG` or `~/.config/gxmod/config.json`.
    ///
    /// A missing file yields the defaults; a present but invalid one is an error.
    pub fn load_default() -> Result<Self, CoreError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::Config(format!("invalid config {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/gxmod/config.json"))
}
