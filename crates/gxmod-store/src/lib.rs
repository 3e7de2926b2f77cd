//! Registered-file inventory, content fingerprinting, and bundle export for GX mods.
//!
//! This crate owns every byte the builder touches: `FileMap` maps relative
//! destination keys to lazily read `ByteSource`s, `fingerprint` computes the
//! blake3 flavor hash over it, and `export` materializes a manifest plus its
//! registered files through a `BundleSink` (directory, zip, or tar).

pub mod export;
pub mod files;
pub mod hash;
pub mod sink;

pub use export::{
    export, export_with, ExportOutcome, ExportReport, ExportTarget, SkipReason, SkippedEntry,
};
pub use files::{ByteSource, FileMap};
pub use hash::{fingerprint, flavor_fingerprint, EMPTY_DIGEST};
pub use sink::{open_sink, ArchiveFormat, BundleSink, DirSink, TarSink, ZipSink};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read source for '{rel}': {source}")]
    Unreadable {
        rel: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write bundle at {}: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unsafe relative path: '{0}'")]
    UnsafePath(String),
}

impl StoreError {
    pub(crate) fn sink(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Sink {
            path: path.into(),
            source,
        }
    }
}

/// True when `rel` stays inside the bundle root once joined onto it.
pub fn is_safe_relative(rel: &str) -> bool {
    if rel.is_empty() || rel.starts_with('/') || rel.starts_with('\\') {
        return false;
    }
    if rel.len() >= 2 && rel.as_bytes()[1] == b':' {
        return false;
    }
    rel.split(['/', '\\'])
        .all(|part| !part.is_empty() && part != "..")
}

/// True when an export writes `rel` into the bundle: a safe relative key
/// other than the manifest itself.
pub fn is_bundle_key(rel: &str) -> bool {
    is_safe_relative(rel) && rel != gxmod_schema::MANIFEST_FILE_NAME
}
