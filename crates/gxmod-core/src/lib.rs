//! Builder session and the operations that mutate it.
//!
//! A `Session` is the explicit (metadata, payload, file map, key) state of one
//! mod under construction. This crate provides its JSON persistence, the
//! editing operations (`add_pack`, `attach`, theme and wallpaper setters),
//! `ImportMerger` for pulling an existing `manifest.json` back into a session,
//! folder auto-scan for unregistered references, and `BuilderConfig`.

pub mod config;
pub mod edit;
pub mod import;
pub mod scan;
pub mod session;

pub use config::BuilderConfig;
pub use edit::{ColorScheme, SILENT_FILLER};
pub use import::{import_manifest_file, import_manifest_str, merge, resolve_asset, ImportReport};
pub use scan::{auto_register, ScanReport};
pub use session::Session;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("payload error: {0}")]
    Payload(#[from] gxmod_schema::PayloadError),
    #[error("store error: {0}")]
    Store(#[from] gxmod_store::StoreError),
    #[error("cannot import {origin}: {message}")]
    ImportParse { origin: String, message: String },
    #[error("no session at {}; run 'gxmod new' first", .0.display())]
    SessionNotFound(PathBuf),
    #[error("session already exists at {}", .0.display())]
    SessionExists(PathBuf),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_parse_error_names_origin() {
        let e = CoreError::ImportParse {
            origin: "mod/manifest.json".to_owned(),
            message: "expected value at line 1".to_owned(),
        };
        let msg = e.to_string();
        assert!(msg.contains("mod/manifest.json"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn missing_session_suggests_new() {
        let e = CoreError::SessionNotFound(PathBuf::from("s.json"));
        assert!(e.to_string().contains("gxmod new"));
    }
}
