//! Destinations a bundle can be written to.

use crate::export::ExportTarget;
use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::debug;

const FILE_MODE: u32 = 0o644;

/// Receives bundle entries one at a time. Any error is fatal for the export.
pub trait BundleSink {
    fn add_file(&mut self, rel: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn finish(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    #[default]
    Zip,
    Tar,
}

impl ArchiveFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
        }
    }

    /// Guess the format from a file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(std::ffi::OsStr::to_str)
            .and_then(|e| e.parse().ok())
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            other => Err(format!("unknown archive format '{other}' (expected zip or tar)")),
        }
    }
}

/// Open the sink for a target. Creates the destination on disk.
pub fn open_sink(target: &ExportTarget) -> Result<Box<dyn BundleSink>, StoreError> {
    match target {
        ExportTarget::Directory(root) => Ok(Box::new(DirSink::create(root)?)),
        ExportTarget::Archive { path, format } => match format {
            ArchiveFormat::Zip => Ok(Box::new(ZipSink::create(path)?)),
            ArchiveFormat::Tar => Ok(Box::new(TarSink::create(path)?)),
        },
    }
}

/// Writes entries as files under a root directory, each one atomically.
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    pub fn create(root: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(root).map_err(|e| StoreError::sink(root, e))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BundleSink for DirSink {
    fn add_file(&mut self, rel: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let dest = self.root.join(rel);
        let dir = dest.parent().unwrap_or(&self.root).to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::sink(&dir, e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::sink(&dir, e))?;
        tmp.write_all(bytes).map_err(|e| StoreError::sink(&dest, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::sink(&dest, e))?;
        tmp.persist(&dest)
            .map_err(|e| StoreError::sink(&dest, e.error))?;
        debug!("wrote {}", dest.display());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn create_archive_file(path: &Path) -> Result<File, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::sink(parent, e))?;
    }
    File::create(path).map_err(|e| StoreError::sink(path, e))
}

/// Deflate-compressed zip archive with fixed entry timestamps.
pub struct ZipSink {
    path: PathBuf,
    writer: Option<zip::ZipWriter<File>>,
}

impl ZipSink {
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        let file = create_archive_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(zip::ZipWriter::new(file)),
        })
    }
}

impl BundleSink for ZipSink {
    fn add_file(&mut self, rel: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(FILE_MODE);
        let Self { path, writer } = self;
        let writer = writer.as_mut().ok_or_else(|| {
            StoreError::sink(path.as_path(), std::io::Error::other("archive already finished"))
        })?;
        writer.start_file(rel, options)?;
        writer.write_all(bytes).map_err(|e| StoreError::sink(path.as_path(), e))
    }

    fn finish(&mut self) -> Result<(), StoreError> {
        if let Some(writer) = self.writer.take() {
            let file = writer.finish()?;
            file.sync_all().map_err(|e| StoreError::sink(&self.path, e))?;
        }
        Ok(())
    }
}

/// Plain tar archive with deterministic headers (mtime 0, uid/gid 0).
pub struct TarSink {
    path: PathBuf,
    builder: tar::Builder<File>,
}

impl TarSink {
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        let file = create_archive_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            builder: tar::Builder::new(file),
        })
    }
}

impl BundleSink for TarSink {
    fn add_file(&mut self, rel: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_mode(FILE_MODE);
        header.set_size(bytes.len() as u64);
        header.set_cksum();
        self.builder
            .append_data(&mut header, rel, bytes)
            .map_err(|e| StoreError::sink(&self.path, e))
    }

    fn finish(&mut self) -> Result<(), StoreError> {
        self.builder
            .finish()
            .map_err(|e| StoreError::sink(&self.path, e))?;
        self.builder
            .get_ref()
            .sync_all()
            .map_err(|e| StoreError::sink(&self.path, e))
    }
}
