use crate::CoreError;
use gxmod_schema::{
    build_manifest, normalize_with_fixes, FlavorHash, ManifestDocument, ModMetadata, Payload,
    ValidationReport,
};
use gxmod_store::{export, flavor_fingerprint, ExportOutcome, ExportTarget, FileMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// One mod under construction: metadata, payload, registered files and key.
///
/// Every core operation takes the session explicitly; there is no global
/// builder state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub metadata: ModMetadata,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub files: FileMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Session {
    pub fn new(metadata: ModMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::SessionNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let session = serde_json::from_str(&content)?;
        debug!("loaded session {}", path.display());
        Ok(session)
    }

    /// Load the session at `path`, or start an empty one if none exists yet.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist atomically: write a sibling temp file, then rename over `path`.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        fs::create_dir_all(&dir)?;
        let content = serde_json::to_string_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;
        debug!("saved session {}", path.display());
        Ok(())
    }

    pub fn build_manifest(&self) -> ManifestDocument {
        build_manifest(&self.metadata, &self.payload, &self.files, self.key.as_deref())
    }

    /// The manifest as it would be exported, minus the flavor stamp.
    pub fn preview(&self) -> Result<String, CoreError> {
        Ok(self.build_manifest().to_json_pretty()?)
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationReport::run(&self.payload, &self.files)
    }

    /// Normalize the payload in place, returning a note per rewrite.
    pub fn fix(&mut self) -> Vec<String> {
        let (payload, fixes) = normalize_with_fixes(&self.payload);
        self.payload = payload;
        for fix in &fixes {
            info!("autofix: {fix}");
        }
        fixes
    }

    pub fn flavor_hash(&self) -> FlavorHash {
        flavor_fingerprint(&self.files)
    }

    pub fn export(
        &self,
        target: &ExportTarget,
        confirm: impl FnOnce(&[String]) -> bool,
    ) -> Result<ExportOutcome, CoreError> {
        Ok(export(self.build_manifest(), &self.files, target, confirm)?)
    }

    pub fn set_key(&mut self, key: Option<&str>) {
        self.key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned);
    }

    /// Read a key or pem file and adopt its trimmed text.
    ///
    /// Returns `false` and leaves the current key alone when the file is blank.
    pub fn load_key(&mut self, path: &Path) -> Result<bool, CoreError> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        self.key = Some(trimmed.to_owned());
        info!("loaded key from {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gxmod_schema::{Section, ICON_512_KEY};
    use serde_json::json;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::new(ModMetadata::new("Neon", "1.0"));
        session
            .payload
            .set(Section::Theme, json!([{"id": "theme_0", "name": "T"}]));
        session.files.insert_inline("sounds/empty_CLICK.mp3", Vec::new());
        session.set_key(Some("  KEY  "));
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.key.as_deref(), Some("KEY"));
    }

    #[test]
    fn load_missing_session_fails_but_open_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.json");
        assert!(matches!(Session::load(&path), Err(CoreError::SessionNotFound(_))));
        assert_eq!(Session::open(&path).unwrap(), Session::default());
    }

    #[test]
    fn blank_key_file_keeps_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let blank = dir.path().join("blank.pem");
        let real = dir.path().join("real.pem");
        fs::write(&blank, "  \n").unwrap();
        fs::write(&real, "\n-----BEGIN KEY-----\nabc\n-----END KEY-----\n").unwrap();

        let mut session = Session::default();
        assert!(session.load_key(&real).unwrap());
        assert!(!session.load_key(&blank).unwrap());
        assert!(session.key.as_deref().unwrap().starts_with("-----BEGIN KEY-----"));
        assert!(session.key.as_deref().unwrap().ends_with("-----END KEY-----"));
    }

    #[test]
    fn fix_rewrites_payload_in_place() {
        let mut session = Session::default();
        session
            .payload
            .set(Section::BrowserSounds, json!({"CLICK": ["sounds/c.wav"]}));
        let fixes = session.fix();
        assert_eq!(fixes.len(), 1);
        assert!(session.payload.get(Section::BrowserSounds).unwrap().is_array());
        assert!(session.fix().is_empty());
    }

    #[test]
    fn preview_reflects_registered_icon() {
        let mut session = Session::new(ModMetadata::new("Neon", "1.0"));
        assert!(!session.preview().unwrap().contains("icons"));
        session.files.insert_inline(ICON_512_KEY, b"png".to_vec());
        assert!(session.preview().unwrap().contains("\"512\": \"icon_512.png\""));
    }
}
