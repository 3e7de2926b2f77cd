use crate::StoreError;
use gxmod_schema::AssetIndex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the bytes of one registered file come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteSource {
    /// A file on disk, read lazily at hash or export time.
    External(PathBuf),
    /// Bytes held in memory, such as a generated placeholder.
    Inline(Vec<u8>),
}

impl ByteSource {
    pub fn external(path: impl Into<PathBuf>) -> Self {
        Self::External(path.into())
    }

    pub fn read(&self) -> Result<Cow<'_, [u8]>, std::io::Error> {
        match self {
            Self::External(path) => fs::read(path).map(Cow::Owned),
            Self::Inline(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }

    pub fn external_path(&self) -> Option<&Path> {
        match self {
            Self::External(path) => Some(path),
            Self::Inline(_) => None,
        }
    }
}

/// Registered asset inventory: relative destination key to byte source.
///
/// Keys are unique; inserting an existing key replaces its source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap {
    entries: BTreeMap<String, ByteSource>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under `rel`, returning the source it replaced.
    pub fn insert(&mut self, rel: impl Into<String>, source: ByteSource) -> Option<ByteSource> {
        let rel = rel.into();
        debug!("register {rel}");
        self.entries.insert(rel, source)
    }

    pub fn insert_file(&mut self, rel: impl Into<String>, path: impl Into<PathBuf>) -> Option<ByteSource> {
        self.insert(rel, ByteSource::External(path.into()))
    }

    pub fn insert_inline(&mut self, rel: impl Into<String>, bytes: Vec<u8>) -> Option<ByteSource> {
        self.insert(rel, ByteSource::Inline(bytes))
    }

    pub fn remove(&mut self, rel: &str) -> Option<ByteSource> {
        self.entries.remove(rel)
    }

    pub fn get(&self, rel: &str) -> Option<&ByteSource> {
        self.entries.get(rel)
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.entries.contains_key(rel)
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ByteSource> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the bytes registered under `rel`.
    pub fn read(&self, rel: &str) -> Result<Cow<'_, [u8]>, StoreError> {
        let source = self.entries.get(rel).ok_or_else(|| StoreError::Unreadable {
            rel: rel.to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not registered"),
        })?;
        source.read().map_err(|source| StoreError::Unreadable {
            rel: rel.to_owned(),
            source,
        })
    }

    /// Byte-source resolver: `None` means unknown or unreadable, never an error.
    pub fn resolve(&self, rel: &str) -> Option<Cow<'_, [u8]>> {
        self.read(rel).ok()
    }
}

impl AssetIndex for FileMap {
    fn contains_asset(&self, rel: &str) -> bool {
        self.contains(rel)
    }
}

impl<'a> IntoIterator for &'a FileMap {
    type Item = (&'a String, &'a ByteSource);
    type IntoIter = btree_map::Iter<'a, String, ByteSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
