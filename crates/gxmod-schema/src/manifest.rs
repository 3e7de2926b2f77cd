use crate::assets::{AssetIndex, ICON_512_KEY, LICENSE_KEY};
use crate::payload::{Payload, Section};
use crate::shape::is_falsy;
use crate::types::FlavorHash;
use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: u32 = 3;
pub const SCHEMA_VERSION: u32 = 2;

/// Top-level descriptive fields, as the author typed them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    /// Name of the developer; written as `developer.name`.
    pub developer: String,
    pub update_url: String,
}

impl ModMetadata {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: version.to_owned(),
            ..Self::default()
        }
    }
}

/// The sparse `manifest.json` document.
///
/// Optional fields are only present when they carry a non-blank value;
/// `manifest_version` and `mod.schema_version` are always written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<Developer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Icons>,
    pub manifest_version: u32,
    #[serde(rename = "mod")]
    pub mod_section: ModSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Developer {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Icons {
    #[serde(rename = "512")]
    pub size_512: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModSection {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Stamped at export time, never by the builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<Flavor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flavor {
    pub hash: FlavorHash,
    pub parent_hash: FlavorHash,
}

impl ManifestDocument {
    pub fn payload(&self) -> Option<&Payload> {
        self.mod_section.payload.as_ref()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Compose metadata, payload and registered-file state into a manifest.
///
/// Deterministic; the flavor block is left unset for the exporter to stamp.
pub fn build_manifest(
    meta: &ModMetadata,
    payload: &Payload,
    assets: &(impl AssetIndex + ?Sized),
    key: Option<&str>,
) -> ManifestDocument {
    let mut sections = Payload::new();
    for section in Section::ALL {
        if let Some(value) = payload.get(section) {
            if !is_falsy(value) {
                sections.set(section, value.clone());
            }
        }
    }

    ManifestDocument {
        name: non_blank(&meta.name),
        version: non_blank(&meta.version),
        author: non_blank(&meta.author),
        description: non_blank(&meta.description),
        developer: non_blank(&meta.developer).map(|name| Developer { name }),
        update_url: non_blank(&meta.update_url),
        icons: assets.contains_asset(ICON_512_KEY).then(|| Icons {
            size_512: ICON_512_KEY.to_owned(),
        }),
        manifest_version: MANIFEST_VERSION,
        mod_section: ModSection {
            schema_version: SCHEMA_VERSION,
            payload: (!sections.is_empty()).then_some(sections),
            license: assets
                .contains_asset(LICENSE_KEY)
                .then(|| LICENSE_KEY.to_owned()),
            key: key.and_then(non_blank),
            flavor: None,
        },
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
