use crate::shape::is_falsy;
use crate::types::PackId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("unknown payload section: '{0}'")]
    UnknownSection(String),
    #[error("{0} is not an array of entries")]
    NotASequence(Section),
    #[error("{section}[{index}] does not exist")]
    IndexOutOfRange { section: Section, index: usize },
    #[error("{section}[{index}] is not an object")]
    NotAnObject { section: Section, index: usize },
    #[error("failed to serialize entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One named category of payload entries.
///
/// Declaration order is the fixed manifest order; `Ord` follows it so a
/// `BTreeMap<Section, _>` serializes sections in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    AppIcon,
    BackgroundMusic,
    BrowserSounds,
    KeyboardSounds,
    Cursors,
    Fonts,
    MobileImageOverrides,
    SplashScreen,
    Theme,
    Wallpaper,
    PageStyles,
}

impl Section {
    pub const ALL: [Section; 11] = [
        Section::AppIcon,
        Section::BackgroundMusic,
        Section::BrowserSounds,
        Section::KeyboardSounds,
        Section::Cursors,
        Section::Fonts,
        Section::MobileImageOverrides,
        Section::SplashScreen,
        Section::Theme,
        Section::Wallpaper,
        Section::PageStyles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::AppIcon => "app_icon",
            Section::BackgroundMusic => "background_music",
            Section::BrowserSounds => "browser_sounds",
            Section::KeyboardSounds => "keyboard_sounds",
            Section::Cursors => "cursors",
            Section::Fonts => "fonts",
            Section::MobileImageOverrides => "mobile_image_overrides",
            Section::SplashScreen => "splash_screen",
            Section::Theme => "theme",
            Section::Wallpaper => "wallpaper",
            Section::PageStyles => "page_styles",
        }
    }

    /// Folder that attached asset files are registered under, if the
    /// section carries files at all.
    pub fn asset_folder(self) -> Option<&'static str> {
        match self {
            Section::AppIcon => Some("app_icon"),
            Section::BackgroundMusic => Some("music"),
            Section::BrowserSounds => Some("sounds"),
            Section::KeyboardSounds => Some("keyboard"),
            Section::Cursors => Some("cursors"),
            Section::Fonts => Some("font"),
            Section::MobileImageOverrides => Some("mobile"),
            Section::SplashScreen => Some("splash"),
            Section::Theme => None,
            Section::Wallpaper => Some("wallpaper"),
            Section::PageStyles => Some("webmodding"),
        }
    }

    /// Prefix used when generating entry ids for this section.
    pub fn auto_id_prefix(self) -> &'static str {
        match self {
            Section::AppIcon => "app_icon",
            Section::BackgroundMusic => "bgm",
            Section::BrowserSounds => "browser_sounds",
            Section::KeyboardSounds => "keyboard_sounds",
            Section::Cursors => "cursor",
            Section::Fonts => "font",
            Section::MobileImageOverrides => "mobile",
            Section::SplashScreen => "splash",
            Section::Theme => "theme",
            Section::Wallpaper => "wp",
            Section::PageStyles => "page_style",
        }
    }

    pub fn is_sound_pack(self) -> bool {
        matches!(self, Section::BrowserSounds | Section::KeyboardSounds)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| PayloadError::UnknownSection(s.to_owned()))
    }
}

/// The mod's structured content: section name to its entry sequence.
///
/// Values are kept as raw JSON so that legacy shapes (a bare mapping, a list
/// of strings) survive until the normalizer rewrites them. A section whose
/// value becomes empty is removed rather than stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    sections: BTreeMap<Section, Value>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: Section) -> Option<&Value> {
        self.sections.get(&section)
    }

    pub fn contains(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Sections in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &Value)> {
        self.sections.iter().map(|(s, v)| (*s, v))
    }

    /// Bind a section to a value. Empty or falsy values remove the section.
    /// Returns the previous value, if any.
    pub fn set(&mut self, section: Section, value: Value) -> Option<Value> {
        if is_falsy(&value) {
            return self.sections.remove(&section);
        }
        self.sections.insert(section, value)
    }

    pub fn remove(&mut self, section: Section) -> Option<Value> {
        self.sections.remove(&section)
    }

    /// Entries of a section, or an empty slice when the section is absent or
    /// not a sequence.
    pub fn entries(&self, section: Section) -> &[Value] {
        match self.sections.get(&section) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Append one entry, creating the section if needed. Returns its index.
    pub fn push_entry(&mut self, section: Section, entry: Value) -> Result<usize, PayloadError> {
        let slot = self
            .sections
            .entry(section)
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(items) = slot else {
            return Err(PayloadError::NotASequence(section));
        };
        items.push(entry);
        Ok(items.len() - 1)
    }

    /// Serialize a typed entry and append it.
    pub fn push<E: Serialize>(&mut self, section: Section, entry: &E) -> Result<usize, PayloadError> {
        let value = serde_json::to_value(entry)?;
        self.push_entry(section, value)
    }

    /// Remove one entry; the section disappears once its last entry is gone.
    pub fn remove_entry(&mut self, section: Section, index: usize) -> Result<Value, PayloadError> {
        let Some(slot) = self.sections.get_mut(&section) else {
            return Err(PayloadError::IndexOutOfRange { section, index });
        };
        let Value::Array(items) = slot else {
            return Err(PayloadError::NotASequence(section));
        };
        if index >= items.len() {
            return Err(PayloadError::IndexOutOfRange { section, index });
        }
        let removed = items.remove(index);
        if items.is_empty() {
            self.sections.remove(&section);
        }
        Ok(removed)
    }

    /// Mutable access to one object entry.
    pub fn entry_mut(
        &mut self,
        section: Section,
        index: usize,
    ) -> Result<&mut serde_json::Map<String, Value>, PayloadError> {
        let slot = self
            .sections
            .get_mut(&section)
            .ok_or(PayloadError::IndexOutOfRange { section, index })?;
        let Value::Array(items) = slot else {
            return Err(PayloadError::NotASequence(section));
        };
        match items.get_mut(index) {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(PayloadError::NotAnObject { section, index }),
            None => Err(PayloadError::IndexOutOfRange { section, index }),
        }
    }

    /// First `prefix_N` id not already used by an entry of `section`.
    pub fn next_auto_id(&self, section: Section, prefix: &str) -> PackId {
        let used: BTreeSet<String> = self
            .entries(section)
            .iter()
            .filter_map(|entry| entry.get("id"))
            .map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        next_free_id(prefix, &used)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.sections
                .iter()
                .map(|(s, v)| (s.as_str().to_owned(), v.clone()))
                .collect(),
        )
    }
}

pub(crate) fn next_free_id(prefix: &str, used: &BTreeSet<String>) -> PackId {
    let base = prefix.replace(' ', "_");
    let mut i = 0usize;
    loop {
        let candidate = format!("{base}_{i}");
        if !used.contains(&candidate) {
            return PackId::new(candidate);
        }
        i += 1;
    }
}
