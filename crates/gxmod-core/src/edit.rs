//! Editing operations: the data half of the pack editor.
//!
//! Each operation mutates the session's payload and registers the attached
//! files under `<folder>/<basename>`, the folder being fixed per section.

use crate::session::Session;
use crate::CoreError;
use gxmod_schema::{
    CursorItem, CursorPack, FontFace, FontPack, FontVariant, Hsl, MobileOverride, MusicPack,
    PageStyle, PackId, Section, SingleAsset, SoundPack, ThemeEntry, ThemeMode, WallpaperEntry,
    WallpaperMode,
};
use gxmod_store::is_safe_relative;
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Bytes of the generated placeholder for a sound event with no files.
pub const SILENT_FILLER: &[u8] = b"";

const DEFAULT_CURSOR_TYPE: &str = "POINTER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Dark,
    Light,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(CoreError::InvalidInput(format!(
                "unknown color scheme '{other}' (expected dark or light)"
            ))),
        }
    }
}

impl Session {
    /// Append a new entry to `section` and attach `files` to it.
    ///
    /// The id defaults to the first free `<prefix>_N`. `app_icon` and
    /// `splash_screen` entries need exactly one file up front.
    pub fn add_pack(
        &mut self,
        section: Section,
        id: Option<&str>,
        name: &str,
        files: &[PathBuf],
        slot: Option<&str>,
    ) -> Result<usize, CoreError> {
        let id = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => PackId::new(id),
            None => self.payload.next_auto_id(section, section.auto_id_prefix()),
        };
        let id = id.into_inner();
        let name = name.trim().to_owned();

        let index = match section {
            Section::AppIcon | Section::SplashScreen => {
                let [file] = files else {
                    return Err(CoreError::InvalidInput(format!(
                        "{section} entries need exactly one file"
                    )));
                };
                let path = self.register_into(section, file)?;
                return Ok(self
                    .payload
                    .push(section, &SingleAsset { id, name, path })?);
            }
            Section::BackgroundMusic => self.payload.push(
                section,
                &MusicPack {
                    id,
                    name,
                    tracks: Vec::new(),
                },
            )?,
            Section::BrowserSounds | Section::KeyboardSounds => self.payload.push(
                section,
                &SoundPack {
                    id,
                    name,
                    sounds: Default::default(),
                },
            )?,
            Section::Cursors => self.payload.push(
                section,
                &CursorPack {
                    id,
                    name,
                    items: Vec::new(),
                },
            )?,
            Section::Fonts => self.payload.push(
                section,
                &FontPack {
                    id,
                    name,
                    header: FontFace::default(),
                    body: FontFace::default(),
                },
            )?,
            Section::MobileImageOverrides => self.payload.push(
                section,
                &MobileOverride {
                    id,
                    name,
                    images: Default::default(),
                },
            )?,
            Section::Theme => self.payload.push(
                section,
                &ThemeEntry {
                    id,
                    name,
                    dark: ThemeMode::default(),
                    light: ThemeMode::default(),
                },
            )?,
            Section::Wallpaper => self.payload.push(
                section,
                &WallpaperEntry {
                    id,
                    name,
                    dark: WallpaperMode::default(),
                    light: WallpaperMode::default(),
                },
            )?,
            Section::PageStyles => self.payload.push(
                section,
                &PageStyle {
                    css: Vec::new(),
                    id,
                    matches: Vec::new(),
                    name,
                },
            )?,
        };
        info!("added {section}[{index}]");

        if !files.is_empty() {
            self.attach(section, index, files, slot)?;
        }
        Ok(index)
    }

    /// Register `files` and reference them from entry `index` of `section`.
    ///
    /// `slot` names where the files go inside the entry: the event for sound
    /// packs, the cursor type (default `POINTER`), the image key for mobile
    /// overrides, or `dark`/`light` for wallpapers. Returns the keys registered.
    pub fn attach(
        &mut self,
        section: Section,
        index: usize,
        files: &[PathBuf],
        slot: Option<&str>,
    ) -> Result<Vec<String>, CoreError> {
        if files.is_empty() {
            return Err(CoreError::InvalidInput("no files given".to_owned()));
        }
        if section == Section::Theme {
            return Err(CoreError::InvalidInput("theme entries carry no files".to_owned()));
        }
        let single = matches!(
            section,
            Section::AppIcon
                | Section::SplashScreen
                | Section::MobileImageOverrides
                | Section::Wallpaper
        );
        if single && files.len() != 1 {
            return Err(CoreError::InvalidInput(format!(
                "{section} takes exactly one file per attach"
            )));
        }
        let slot = slot.map(str::trim).filter(|s| !s.is_empty());
        let slot_required = |what: &str| {
            slot.ok_or_else(|| CoreError::InvalidInput(format!("{section} needs {what}")))
        };
        let needed_slot = match section {
            Section::BrowserSounds | Section::KeyboardSounds => Some(slot_required("an event name")?),
            Section::MobileImageOverrides => Some(slot_required("an image key")?),
            Section::Wallpaper => Some(slot_required("a color scheme (dark or light)")?),
            _ => None,
        };
        let scheme = if section == Section::Wallpaper {
            Some(needed_slot.unwrap_or_default().parse::<ColorScheme>()?)
        } else {
            None
        };

        // Validate the target entry before touching the file map.
        self.payload.entry_mut(section, index)?;

        let mut keys = Vec::with_capacity(files.len());
        for file in files {
            keys.push(self.register_into(section, file)?);
        }

        let entry = self.payload.entry_mut(section, index)?;
        match section {
            Section::AppIcon | Section::SplashScreen => {
                entry.insert("path".to_owned(), json!(keys[0]));
            }
            Section::BackgroundMusic => {
                push_all(array_field(entry, "tracks"), &keys);
            }
            Section::BrowserSounds | Section::KeyboardSounds => {
                let event = needed_slot.unwrap_or_default();
                let sounds = object_field(entry, "sounds");
                let list = sounds
                    .entry(event.to_owned())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !list.is_array() {
                    *list = Value::Array(Vec::new());
                }
                if let Value::Array(items) = list {
                    push_all(items, &keys);
                }
            }
            Section::Cursors => {
                let kind = slot.unwrap_or(DEFAULT_CURSOR_TYPE);
                let items = array_field(entry, "items");
                for key in &keys {
                    items.push(serde_json::to_value(CursorItem {
                        path: key.clone(),
                        kind: kind.to_owned(),
                    })?);
                }
            }
            Section::Fonts => {
                for (i, key) in keys.iter().enumerate() {
                    let face = if i == 0 { "header" } else { "body" };
                    let variants = array_field(object_field(entry, face), "variants");
                    variants.push(serde_json::to_value(FontVariant { path: key.clone() })?);
                }
            }
            Section::MobileImageOverrides => {
                let image_key = needed_slot.unwrap_or_default();
                object_field(entry, "images").insert(image_key.to_owned(), json!(keys[0]));
            }
            Section::Wallpaper => {
                let scheme = scheme.unwrap_or(ColorScheme::Dark);
                object_field(entry, scheme.as_str()).insert("image".to_owned(), json!(keys[0]));
            }
            Section::PageStyles => {
                push_all(array_field(entry, "css"), &keys);
            }
            Section::Theme => {}
        }
        info!("attached {} file(s) to {section}[{index}]", keys.len());
        Ok(keys)
    }

    /// Map `event` of a sound pack to a generated silent placeholder.
    ///
    /// The placeholder is registered inline at
    /// `<folder>/empty_<EVENT>.<extension>` and replaces the event's file list.
    pub fn insert_placeholder(
        &mut self,
        section: Section,
        index: usize,
        event: &str,
        extension: &str,
    ) -> Result<String, CoreError> {
        if !section.is_sound_pack() {
            return Err(CoreError::InvalidInput(format!(
                "placeholders only apply to sound packs, not {section}"
            )));
        }
        let event = event.trim();
        if event.is_empty() {
            return Err(CoreError::InvalidInput("event name is empty".to_owned()));
        }
        let folder = section.asset_folder().unwrap_or(section.as_str());
        let ext = extension.trim().trim_start_matches('.');
        let rel = format!("{folder}/empty_{event}.{ext}");
        check_key(&rel)?;

        let entry = self.payload.entry_mut(section, index)?;
        object_field(entry, "sounds").insert(event.to_owned(), json!([rel]));
        self.files.insert_inline(rel.clone(), SILENT_FILLER.to_vec());
        info!("inserted silent filler {rel}");
        Ok(rel)
    }

    pub fn remove_entry(&mut self, section: Section, index: usize) -> Result<Value, CoreError> {
        let removed = self.payload.remove_entry(section, index)?;
        info!("removed {section}[{index}]");
        Ok(removed)
    }

    /// Register `path` under an explicit relative key, replacing any prior source.
    pub fn register_file(&mut self, rel: &str, path: &Path) -> Result<(), CoreError> {
        let rel = rel.trim();
        check_key(rel)?;
        self.files.insert_file(rel, path);
        info!("registered {} -> {rel}", path.display());
        Ok(())
    }

    pub fn unregister_file(&mut self, rel: &str) -> bool {
        self.files.remove(rel).is_some()
    }

    pub fn set_theme_colors(
        &mut self,
        index: usize,
        scheme: ColorScheme,
        accent: Hsl,
        secondary: Hsl,
    ) -> Result<(), CoreError> {
        let mode = ThemeMode {
            accent: Hsl::clamped(accent.h, accent.s, accent.l),
            secondary: Hsl::clamped(secondary.h, secondary.s, secondary.l),
        };
        let entry = self.payload.entry_mut(Section::Theme, index)?;
        entry.insert(scheme.as_str().to_owned(), serde_json::to_value(mode)?);
        Ok(())
    }

    /// Set or clear (`None` or blank) the text colour of one wallpaper scheme.
    pub fn set_wallpaper_text_color(
        &mut self,
        index: usize,
        scheme: ColorScheme,
        color: Option<&str>,
    ) -> Result<(), CoreError> {
        let entry = self.payload.entry_mut(Section::Wallpaper, index)?;
        let mode = object_field(entry, scheme.as_str());
        match color.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => {
                mode.insert("text_color".to_owned(), json!(c));
            }
            None => {
                mode.remove("text_color");
            }
        }
        Ok(())
    }

    /// Replace a page style's match patterns from a comma-separated list.
    pub fn set_page_style_matches(&mut self, index: usize, patterns: &str) -> Result<(), CoreError> {
        let matches: Vec<&str> = patterns
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect();
        let entry = self.payload.entry_mut(Section::PageStyles, index)?;
        entry.insert("matches".to_owned(), json!(matches));
        Ok(())
    }

    fn register_into(&mut self, section: Section, file: &Path) -> Result<String, CoreError> {
        let folder = section.asset_folder().ok_or_else(|| {
            CoreError::InvalidInput(format!("{section} entries carry no files"))
        })?;
        let base = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CoreError::InvalidInput(format!("no usable file name in {}", file.display()))
            })?;
        let rel = format!("{folder}/{base}");
        self.files.insert_file(rel.clone(), file);
        Ok(rel)
    }
}

fn check_key(rel: &str) -> Result<(), CoreError> {
    if is_safe_relative(rel) {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "'{rel}' is not a relative path inside the bundle"
        )))
    }
}

fn push_all(items: &mut Vec<Value>, keys: &[String]) {
    items.extend(keys.iter().map(|k| json!(k)));
}

/// The array under `key`, created (or reset if it holds something else).
fn array_field<'a>(entry: &'a mut Map<String, Value>, key: &str) -> &'a mut Vec<Value> {
    let slot = entry
        .entry(key.to_owned())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just made an array"),
    }
}

/// The object under `key`, created (or reset if it holds something else).
fn object_field<'a>(entry: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = entry
        .entry(key.to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just made an object"),
    }
}
