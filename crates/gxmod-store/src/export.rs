use crate::files::FileMap;
use crate::hash::{flavor_fingerprint, EMPTY_DIGEST};
use crate::sink::{open_sink, ArchiveFormat, BundleSink};
use crate::{is_safe_relative, StoreError};
use gxmod_schema::{unregistered_references, Flavor, FlavorHash, ManifestDocument, MANIFEST_FILE_NAME};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where an export lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Directory(PathBuf),
    Archive { path: PathBuf, format: ArchiveFormat },
}

impl ExportTarget {
    /// Archive target whose format follows the file extension, else `fallback`.
    pub fn archive(path: impl Into<PathBuf>, fallback: ArchiveFormat) -> Self {
        let path = path.into();
        let format = ArchiveFormat::from_path(&path).unwrap_or(fallback);
        Self::Archive { path, format }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Archive { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SkipReason {
    /// The source could not be read at export time.
    Unreadable(String),
    /// The key is absolute or climbs out of the bundle root.
    UnsafePath,
    /// The key collides with the manifest written at the bundle root.
    Reserved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub rel: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub flavor_hash: FlavorHash,
    pub written: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
    /// Referenced paths that were not registered but the caller accepted.
    pub missing: Vec<String>,
    pub manifest: ManifestDocument,
}

#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// The confirm callback declined; nothing was written.
    Aborted { missing: Vec<String> },
    Completed(ExportReport),
}

/// Export `doc` and every registered file to `target`.
///
/// `confirm` is asked once, and only when referenced paths are unregistered.
pub fn export(
    doc: ManifestDocument,
    files: &FileMap,
    target: &ExportTarget,
    confirm: impl FnOnce(&[String]) -> bool,
) -> Result<ExportOutcome, StoreError> {
    export_with(doc, files, || open_sink(target), confirm)
}

/// Sink-agnostic export. `open` runs only after confirmation.
pub fn export_with(
    mut doc: ManifestDocument,
    files: &FileMap,
    open: impl FnOnce() -> Result<Box<dyn BundleSink>, StoreError>,
    confirm: impl FnOnce(&[String]) -> bool,
) -> Result<ExportOutcome, StoreError> {
    let missing = doc
        .payload()
        .map(|payload| unregistered_references(payload, files))
        .unwrap_or_default();
    if !missing.is_empty() {
        warn!("{} referenced file(s) not registered", missing.len());
        if !confirm(&missing) {
            info!("export aborted");
            return Ok(ExportOutcome::Aborted { missing });
        }
    }

    let flavor_hash = flavor_fingerprint(files);
    doc.mod_section.flavor = Some(Flavor {
        hash: flavor_hash.clone(),
        parent_hash: FlavorHash::new(EMPTY_DIGEST),
    });
    debug!("flavor hash {flavor_hash}");

    let mut sink = open()?;
    let mut written = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();

    for (rel, source) in files {
        let reason = if !is_safe_relative(rel) {
            Some(SkipReason::UnsafePath)
        } else if rel == MANIFEST_FILE_NAME {
            Some(SkipReason::Reserved)
        } else {
            None
        };
        if let Some(reason) = reason {
            warn!("skipping {rel}: {reason:?}");
            skipped.push(SkippedEntry {
                rel: rel.clone(),
                reason,
            });
            continue;
        }

        let bytes = match source.read() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("skipping {rel}: {e}");
                skipped.push(SkippedEntry {
                    rel: rel.clone(),
                    reason: SkipReason::Unreadable(e.to_string()),
                });
                continue;
            }
        };
        sink.add_file(rel, &bytes)?;
        written.push(rel.clone());
    }

    let manifest = doc.to_json_pretty()?;
    sink.add_file(MANIFEST_FILE_NAME, manifest.as_bytes())?;
    sink.finish()?;

    info!(
        "exported {} file(s), {} skipped, flavor {}",
        written.len(),
        skipped.len(),
        &flavor_hash.as_str()[..12]
    );

    Ok(ExportOutcome::Completed(ExportReport {
        flavor_hash,
        written,
        skipped,
        missing,
        manifest: doc,
    }))
}
