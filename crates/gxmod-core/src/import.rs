use crate::session::Session;
use crate::CoreError;
use gxmod_schema::{collect_references, Section, ICON_512_KEY, LICENSE_KEY};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a merge changed in the live session.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    /// Metadata fields that were overwritten.
    pub metadata_fields: Vec<String>,
    /// Entries merged per section.
    pub sections: BTreeMap<String, usize>,
    /// Relative keys registered with the source they resolved to.
    pub registered: BTreeMap<String, PathBuf>,
    /// Referenced paths for which no candidate file exists.
    pub unresolved: Vec<String>,
    /// Payload sections ignored because of an unknown name or shape.
    pub skipped_sections: Vec<String>,
    pub key_loaded: bool,
}

/// Read and merge a `manifest.json`, resolving assets next to it.
///
/// Nothing in `session` changes unless the file reads and parses.
pub fn import_manifest_file(session: &mut Session, path: &Path) -> Result<ImportReport, CoreError> {
    let text = fs::read_to_string(path).map_err(|e| CoreError::ImportParse {
        origin: path.display().to_string(),
        message: e.to_string(),
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_and_merge(session, &text, base_dir, &path.display().to_string())
}

pub fn import_manifest_str(
    session: &mut Session,
    text: &str,
    base_dir: &Path,
) -> Result<ImportReport, CoreError> {
    parse_and_merge(session, text, base_dir, "manifest text")
}

fn parse_and_merge(
    session: &mut Session,
    text: &str,
    base_dir: &Path,
    origin: &str,
) -> Result<ImportReport, CoreError> {
    let doc: Value = serde_json::from_str(text).map_err(|e| CoreError::ImportParse {
        origin: origin.to_owned(),
        message: e.to_string(),
    })?;
    if !doc.is_object() {
        return Err(CoreError::ImportParse {
            origin: origin.to_owned(),
            message: "top level is not an object".to_owned(),
        });
    }
    let report = merge(session, &doc, base_dir);
    info!(
        "imported {origin}: {} section(s), {} file(s) registered, {} unresolved",
        report.sections.len(),
        report.registered.len(),
        report.unresolved.len()
    );
    Ok(report)
}

/// First existing candidate for `rel`: itself when absolute, then under
/// `base_dir`, then its bare file name under `base_dir`.
pub fn resolve_asset(rel: &str, base_dir: &Path) -> Option<PathBuf> {
    let as_given = Path::new(rel);
    if as_given.is_absolute() && as_given.exists() {
        return Some(as_given.to_path_buf());
    }
    let joined = base_dir.join(rel);
    if joined.exists() {
        return Some(joined);
    }
    let flat = base_dir.join(as_given.file_name()?);
    flat.exists().then_some(flat)
}

/// Merge an already parsed manifest document into `session`.
///
/// Best effort per section: unrecognized or mis-shaped sections are skipped
/// whole, and references that resolve nowhere are left for validation.
/// Pack sections gain the imported entries; theme, wallpaper, page style and
/// mobile override sections are replaced by them.
pub fn merge(session: &mut Session, doc: &Value, base_dir: &Path) -> ImportReport {
    let mut report = ImportReport::default();
    merge_metadata(session, doc, &mut report);

    let mod_section = doc.get("mod").and_then(Value::as_object);
    if let Some(payload) = mod_section.and_then(|m| m.get("payload")).and_then(Value::as_object) {
        for (name, value) in payload {
            let Ok(section) = name.parse::<Section>() else {
                warn!("ignoring unknown payload section '{name}'");
                report.skipped_sections.push(name.clone());
                continue;
            };
            let Some(items) = section_items(section, value) else {
                warn!("ignoring {section}: unexpected shape");
                report.skipped_sections.push(name.clone());
                continue;
            };
            merge_section(session, section, items, base_dir, &mut report);
        }
    }

    if let Some(icon) = doc.get("icons").and_then(|i| i.get("512")).and_then(Value::as_str) {
        register_resolved(session, ICON_512_KEY, icon, base_dir, &mut report);
    }
    if let Some(license) = mod_section
        .and_then(|m| m.get("license"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
    {
        let candidate = if Path::new(license).is_absolute() {
            PathBuf::from(license)
        } else {
            base_dir.join(license)
        };
        if candidate.exists() {
            session.files.insert_file(LICENSE_KEY, &candidate);
            report.registered.insert(LICENSE_KEY.to_owned(), candidate);
        } else {
            report.unresolved.push(license.to_owned());
        }
    }

    let key = mod_section
        .and_then(|m| m.get("key"))
        .or_else(|| doc.get("key"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|k| !k.is_empty());
    if let Some(key) = key {
        session.key = Some(key.to_owned());
        report.key_loaded = true;
    }

    report
}

fn merge_metadata(session: &mut Session, doc: &Value, report: &mut ImportReport) {
    let meta = &mut session.metadata;
    let developer = doc.get("developer").and_then(|d| d.get("name"));
    let fields: [(&str, Option<&Value>, &mut String); 6] = [
        ("name", doc.get("name"), &mut meta.name),
        ("version", doc.get("version"), &mut meta.version),
        ("author", doc.get("author"), &mut meta.author),
        ("description", doc.get("description"), &mut meta.description),
        ("developer", developer, &mut meta.developer),
        ("update_url", doc.get("update_url"), &mut meta.update_url),
    ];
    for (label, incoming, live) in fields {
        let Some(value) = incoming.and_then(Value::as_str).map(str::trim) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        *live = value.to_owned();
        report.metadata_fields.push(label.to_owned());
    }
}

/// Entries of a section value in a shape the merger accepts.
fn section_items(section: Section, value: &Value) -> Option<Vec<&Map<String, Value>>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(Value::as_object).collect()),
        Value::Object(map) if matches!(section, Section::Wallpaper | Section::PageStyles) => {
            Some(vec![map])
        }
        _ => None,
    }
}

/// Sections whose imported entries replace the live ones instead of
/// being appended after them.
fn replaced_on_import(section: Section) -> bool {
    matches!(
        section,
        Section::Theme | Section::MobileImageOverrides | Section::Wallpaper | Section::PageStyles
    )
}

fn merge_section(
    session: &mut Session,
    section: Section,
    items: Vec<&Map<String, Value>>,
    base_dir: &Path,
    report: &mut ImportReport,
) {
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let mut entry = item.clone();
        if section.is_sound_pack() {
            flatten_sound_sources(&mut entry);
        }
        let entry = Value::Object(entry);
        for rel in collect_references(&entry) {
            register_resolved(session, &rel, &rel, base_dir, report);
        }
        entries.push(entry);
    }

    let merged = if replaced_on_import(section) {
        let count = entries.len();
        session.payload.set(section, Value::Array(entries));
        count
    } else {
        let mut appended = 0;
        for entry in entries {
            if let Err(e) = session.payload.push_entry(section, entry) {
                warn!("cannot append to {section}: {e}");
                report.skipped_sections.push(section.to_string());
                break;
            }
            appended += 1;
        }
        appended
    };
    if merged == 0 {
        return;
    }
    debug!("merged {merged} {section} entries");
    *report.sections.entry(section.to_string()).or_default() += merged;
}

/// Sound lists may hold `{ "src": path }` items; keep only the path strings.
fn flatten_sound_sources(entry: &mut Map<String, Value>) {
    let Some(Value::Object(sounds)) = entry.get_mut("sounds") else {
        return;
    };
    for list in sounds.values_mut() {
        let Value::Array(items) = list else {
            continue;
        };
        let flat: Vec<Value> = items
            .iter()
            .filter_map(|item| match item {
                Value::String(_) => Some(item.clone()),
                Value::Object(obj) => obj.get("src").filter(|s| s.is_string()).cloned(),
                _ => None,
            })
            .collect();
        *items = flat;
    }
}

fn register_resolved(
    session: &mut Session,
    key: &str,
    reference: &str,
    base_dir: &Path,
    report: &mut ImportReport,
) {
    match resolve_asset(reference, base_dir) {
        Some(path) => {
            debug!("resolved {reference} -> {}", path.display());
            session.files.insert_file(key, &path);
            report.registered.insert(key.to_owned(), path);
        }
        None if !session.files.contains(key) => report.unresolved.push(reference.to_owned()),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gxmod_schema::ModMetadata;
    use serde_json::json;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, rel.as_bytes()).unwrap();
        path
    }

    #[test]
    fn blank_metadata_never_overwrites() {
        let mut session = Session::new(ModMetadata {
            name: "Live".to_owned(),
            author: "Me".to_owned(),
            ..ModMetadata::default()
        });
        let doc = json!({"name": "  ", "author": "Them", "version": 3, "developer": {"name": " Dev "}});
        let report = merge(&mut session, &doc, Path::new("."));
        assert_eq!(session.metadata.name, "Live");
        assert_eq!(session.metadata.author, "Them");
        assert_eq!(session.metadata.developer, "Dev");
        assert!(session.metadata.version.is_empty());
        assert_eq!(report.metadata_fields, vec!["author", "developer"]);
    }

    #[test]
    fn resolution_prefers_path_then_flattened_name() {
        let dir = tempfile::tempdir().unwrap();
        let nested = touch(dir.path(), "music/a.mp3");
        let flat = touch(dir.path(), "b.mp3");

        assert_eq!(resolve_asset("music/a.mp3", dir.path()), Some(nested.clone()));
        assert_eq!(resolve_asset("music/b.mp3", dir.path()), Some(flat));
        assert_eq!(
            resolve_asset(nested.to_str().unwrap(), Path::new("/nowhere")),
            Some(nested)
        );
        assert_eq!(resolve_asset("music/c.mp3", dir.path()), None);
    }

    #[test]
    fn sections_are_appended_and_assets_registered() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "music/a.mp3");
        let mut session = Session::default();
        session
            .payload
            .push_entry(Section::BackgroundMusic, json!({"id": "bgm_0", "name": "Old", "tracks": ["music/old.mp3"]}))
            .unwrap();

        let doc = json!({"mod": {"payload": {
            "background_music": [
                {"id": "bgm_1", "name": "New", "tracks": ["music/a.mp3", "music/gone.mp3"]},
                "stray"
            ],
            "stickers": [{"id": "s"}],
            "theme": "dark"
        }}});
        let report = merge(&mut session, &doc, dir.path());

        assert_eq!(session.payload.entries(Section::BackgroundMusic).len(), 2);
        assert!(session.files.contains("music/a.mp3"));
        assert!(!session.files.contains("music/gone.mp3"));
        assert_eq!(report.sections.get("background_music"), Some(&1));
        assert_eq!(report.unresolved, vec!["music/gone.mp3"]);
        assert_eq!(report.skipped_sections, vec!["stickers", "theme"]);
    }

    #[test]
    fn wallpaper_mapping_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "night.png");
        let mut session = Session::default();
        let doc = json!({"mod": {"payload": {
            "wallpaper": {"id": "wp_0", "name": "W", "dark": {"image": "wallpaper/night.png"}}
        }}});
        merge(&mut session, &doc, dir.path());
        assert_eq!(session.payload.entries(Section::Wallpaper).len(), 1);
        assert_eq!(
            session.files.get("wallpaper/night.png").unwrap().external_path(),
            Some(dir.path().join("night.png").as_path())
        );
    }

    #[test]
    fn styling_sections_are_replaced_on_repeat_import() {
        let mut session = Session::default();
        let doc = json!({"mod": {"payload": {
            "theme": [{"id": "theme_0", "name": "T"}],
            "wallpaper": [{"id": "wp_0", "name": "W"}],
            "page_styles": {"id": "ps", "name": "P", "matches": ["*://*/*"]},
            "mobile_image_overrides": [{"id": "mobile_0", "name": "M"}],
            "cursors": [{"id": "cursor_0", "name": "C", "items": []}]
        }}});
        merge(&mut session, &doc, Path::new("."));
        let report = merge(&mut session, &doc, Path::new("."));

        for section in [
            Section::Theme,
            Section::Wallpaper,
            Section::PageStyles,
            Section::MobileImageOverrides,
        ] {
            assert_eq!(session.payload.entries(section).len(), 1, "{section}");
        }
        assert_eq!(session.payload.entries(Section::Cursors).len(), 2);
        assert_eq!(report.sections.get("theme"), Some(&1));
    }

    #[test]
    fn empty_replacement_drops_live_section() {
        let mut session = Session::default();
        session
            .payload
            .push_entry(Section::Theme, json!({"id": "theme_0", "name": "Old"}))
            .unwrap();
        let report = merge(&mut session, &json!({"mod": {"payload": {"theme": []}}}), Path::new("."));
        assert!(!session.payload.contains(Section::Theme));
        assert!(report.sections.is_empty());
    }

    #[test]
    fn sound_src_objects_are_flattened() {
        let mut session = Session::default();
        let doc = json!({"mod": {"payload": {"browser_sounds": [{
            "id": "b", "name": "B",
            "sounds": {"CLICK": [{"src": "sounds/c.wav"}, "sounds/d.wav", 5, {"other": 1}]}
        }]}}});
        merge(&mut session, &doc, Path::new("/nowhere"));
        assert_eq!(
            session.payload.entries(Section::BrowserSounds)[0]["sounds"]["CLICK"],
            json!(["sounds/c.wav", "sounds/d.wav"])
        );
    }

    #[test]
    fn empty_sequences_leave_no_section() {
        let mut session = Session::default();
        let doc = json!({"mod": {"payload": {"fonts": [], "cursors": [1, 2]}}});
        merge(&mut session, &doc, Path::new("."));
        assert!(session.payload.is_empty());
    }

    #[test]
    fn icon_license_and_key() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "icon_512.png");
        touch(dir.path(), "LICENSE.md");
        let mut session = Session::default();
        let doc = json!({
            "icons": {"512": "icon_512.png"},
            "mod": {"license": "LICENSE.md", "key": "  secret  "}
        });
        let report = merge(&mut session, &doc, dir.path());
        assert!(session.files.contains(ICON_512_KEY));
        assert_eq!(
            session.files.get(LICENSE_KEY).unwrap().external_path(),
            Some(dir.path().join("LICENSE.md").as_path())
        );
        assert_eq!(session.key.as_deref(), Some("secret"));
        assert!(report.key_loaded);
    }

    #[test]
    fn legacy_top_level_key_is_accepted() {
        let mut session = Session::default();
        merge(&mut session, &json!({"key": "K"}), Path::new("."));
        assert_eq!(session.key.as_deref(), Some("K"));
    }

    #[test]
    fn parse_failure_leaves_session_untouched() {
        let mut session = Session::new(ModMetadata::new("Live", "1"));
        session.files.insert_inline("a.txt", Vec::new());
        let before = session.clone();

        let err = import_manifest_str(&mut session, "{\"name\": ", Path::new(".")).unwrap_err();
        assert!(matches!(err, CoreError::ImportParse { .. }));
        let err = import_manifest_str(&mut session, "[1, 2]", Path::new(".")).unwrap_err();
        assert!(matches!(err, CoreError::ImportParse { .. }));
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("manifest.json");
        assert!(import_manifest_file(&mut session, &missing).is_err());

        assert_eq!(session, before);
    }
}
