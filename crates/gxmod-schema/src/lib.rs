//! Payload model, validation, normalization, and manifest building for GX mods.
//!
//! This crate is the pure layer of the builder: the section-keyed `Payload`,
//! shape decoding of legacy section layouts (`SectionShape`), reference
//! collection, the `Validator` rules (`validate`), the idempotent autofix
//! (`normalize`), and deterministic manifest composition (`build_manifest`).
//! Nothing here touches the filesystem.

pub mod assets;
pub mod entries;
pub mod manifest;
pub mod normalize;
pub mod payload;
pub mod preset;
pub mod references;
pub mod shape;
pub mod types;
pub mod validate;

pub use assets::{AssetIndex, ICON_512_KEY, ICON_PREFIX, LICENSE_KEY, MANIFEST_FILE_NAME};
pub use entries::{
    CursorItem, CursorPack, FontFace, FontPack, FontVariant, Hsl, MobileOverride, MusicPack,
    PageStyle, SingleAsset, SoundPack, ThemeEntry, ThemeMode, WallpaperEntry, WallpaperMode,
};
pub use manifest::{
    build_manifest, Developer, Flavor, Icons, ManifestDocument, ModMetadata, ModSection,
    MANIFEST_VERSION, SCHEMA_VERSION,
};
pub use normalize::{normalize, normalize_with_fixes};
pub use payload::{Payload, PayloadError, Section};
pub use preset::{
    is_known_preset, presets_for, BROWSER_EVENT_PRESETS, CURSOR_PRESETS, KEYBOARD_EVENT_PRESETS,
};
pub use references::{
    collect_payload_references, collect_references, unregistered_references, PATH_SEPARATOR,
};
pub use shape::{decode, is_falsy, SectionShape};
pub use types::{FlavorHash, PackId};
pub use validate::{advisories, validate, ValidationReport, MISSING_PREVIEW_LIMIT};
