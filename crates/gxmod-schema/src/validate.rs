use crate::assets::{AssetIndex, ICON_512_KEY};
use crate::payload::{Payload, Section};
use crate::references::unregistered_references;
use crate::shape::{decode, is_falsy, SectionShape};
use serde::Serialize;
use serde_json::Value;

/// How many missing paths the "not registered" issue lists before eliding.
pub const MISSING_PREVIEW_LIMIT: usize = 8;

/// Outcome of a validation pass: structural issues plus advisory notes.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<String>,
    pub notes: Vec<String>,
}

impl ValidationReport {
    pub fn run(payload: &Payload, assets: &(impl AssetIndex + ?Sized)) -> Self {
        Self {
            issues: validate(payload, assets),
            notes: advisories(assets),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check structural invariants of the payload against the registered assets.
///
/// Rules run in a fixed order and every violation is reported; an empty list
/// means the payload passed.
pub fn validate(payload: &Payload, assets: &(impl AssetIndex + ?Sized)) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(value) = payload.get(Section::BackgroundMusic) {
        match decode(value) {
            SectionShape::Packs(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if entry.get("tracks").map_or(true, is_falsy) {
                        issues.push(format!("background_music[{i}] has an empty 'tracks' array"));
                    }
                }
            }
            _ => issues.push(
                "background_music is present but must be a non-empty array of objects".to_owned(),
            ),
        }
    }

    for section in [Section::KeyboardSounds, Section::BrowserSounds] {
        if let Some(value) = payload.get(section) {
            let ok = match decode(value) {
                SectionShape::Packs(entries) => entries.iter().all(is_sound_pack),
                _ => false,
            };
            if !ok {
                issues.push(format!(
                    "{section} is present but must be a non-empty array of pack objects (id, name, sounds)"
                ));
            }
        }
    }

    if let Some(value) = payload.get(Section::Wallpaper) {
        if !matches!(decode(value), SectionShape::Packs(_)) {
            issues.push("wallpaper must be a non-empty array of objects when present".to_owned());
        }
    }

    let missing = unregistered_references(payload, assets);
    if !missing.is_empty() {
        let shown = missing
            .iter()
            .take(MISSING_PREVIEW_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let ellipsis = if missing.len() > MISSING_PREVIEW_LIMIT {
            " ..."
        } else {
            ""
        };
        issues.push(format!(
            "referenced asset files not registered: {shown}{ellipsis}"
        ));
    }

    issues
}

/// Informational notes that never fail validation.
pub fn advisories(assets: &(impl AssetIndex + ?Sized)) -> Vec<String> {
    let mut notes = Vec::new();
    if !assets.contains_asset(ICON_512_KEY) {
        notes.push(format!(
            "{ICON_512_KEY} not registered; the manifest will omit icons until one is registered"
        ));
    }
    notes
}

fn is_sound_pack(entry: &Value) -> bool {
    ["id", "name", "sounds"]
        .iter()
        .all(|field| entry.get(field).is_some())
}
