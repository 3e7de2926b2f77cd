use crate::session::Session;
use crate::CoreError;
use gxmod_schema::unregistered_references;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScanReport {
    /// Relative key to the file found for it.
    pub registered: BTreeMap<String, PathBuf>,
    /// References still unregistered after the scan.
    pub unmatched: Vec<String>,
}

/// Register files under `folder` for every referenced but unregistered path.
///
/// Matching is by file name only; the walk is sorted and the first file found
/// for a name wins. Several references sharing one file name all map to it.
pub fn auto_register(session: &mut Session, folder: &Path) -> Result<ScanReport, CoreError> {
    let wanted = unregistered_references(&session.payload, &session.files);
    let mut report = ScanReport::default();
    if wanted.is_empty() {
        return Ok(report);
    }

    let names: BTreeSet<&str> = wanted.iter().filter_map(|rel| file_name(rel)).collect();
    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
    walk(folder, &mut |path| {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        if names.contains(name) && !found.contains_key(name) {
            found.insert(name.to_owned(), path.to_path_buf());
        }
    })?;

    for rel in wanted {
        match file_name(&rel).and_then(|name| found.get(name)) {
            Some(path) => {
                debug!("auto-registered {rel} -> {}", path.display());
                session.files.insert_file(rel.clone(), path);
                report.registered.insert(rel, path.clone());
            }
            None => report.unmatched.push(rel),
        }
    }
    info!(
        "scan of {} registered {} file(s), {} still missing",
        folder.display(),
        report.registered.len(),
        report.unmatched.len()
    );
    Ok(report)
}

fn file_name(rel: &str) -> Option<&str> {
    rel.rsplit('/').next().filter(|n| !n.is_empty())
}

/// Depth-first walk over regular files, entries visited in sorted order.
fn walk(dir: &Path, visit: &mut dyn FnMut(&Path)) -> Result<(), CoreError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .collect();
    entries.sort();

    for path in entries {
        let meta = match path.symlink_metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("skipping {}: metadata error: {e}", path.display());
                continue;
            }
        };
        if meta.is_dir() {
            walk(&path, visit)?;
        } else if meta.is_file() {
            visit(&path);
        }
    }
    Ok(())
}
