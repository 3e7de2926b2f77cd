//! Typed shapes of canonical section entries.
//!
//! The payload itself stores raw JSON; these structs are what the editing
//! operations build and push into it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `app_icon` and `splash_screen` entries: one asset each.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SingleAsset {
    pub id: String,
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MusicPack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<String>,
}

/// Entry shape shared by `browser_sounds` and `keyboard_sounds`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoundPack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sounds: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CursorPack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<CursorItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CursorItem {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontPack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub header: FontFace,
    #[serde(default)]
    pub body: FontFace,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontFace {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<FontVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontVariant {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MobileOverride {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeEntry {
    pub id: String,
    pub name: String,
    pub dark: ThemeMode,
    pub light: ThemeMode,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeMode {
    #[serde(rename = "gx_accent")]
    pub accent: Hsl,
    #[serde(rename = "gx_secondary_base")]
    pub secondary: Hsl,
}

/// Hue in degrees (0-360), saturation and lightness in percent (0-100).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Hsl {
    /// Clamp each channel into its valid range.
    pub fn clamped(h: u16, s: u8, l: u8) -> Self {
        Self {
            h: h.min(360),
            s: s.min(100),
            l: l.min(100),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallpaperEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dark: WallpaperMode,
    #[serde(default)]
    pub light: WallpaperMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallpaperMode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageStyle {
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub matches: Vec<String>,
    #[serde(default)]
    pub name: String,
}
