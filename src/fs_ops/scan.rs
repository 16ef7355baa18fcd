//! Directory listing.
//! Only the direct children of the target directory are considered, in file
//! name order, and symlinks are never followed.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::errors::{DatenameError, Result};

/// A regular file directly inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: OsString,
    /// Size at listing time; used to skip hashing files with a unique size.
    pub len: u64,
}

/// Precondition: `dir` exists and is a directory.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DatenameError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(DatenameError::DirectoryNotFound(dir.to_path_buf()))
        }
        Err(e) => Err(DatenameError::io("stat", dir, e)),
    }
}

fn walk(dir: &Path) -> impl Iterator<Item = Result<walkdir::DirEntry>> + '_ {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(move |res| {
            res.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                DatenameError::io("list", path, io::Error::from(e))
            })
        })
}

/// Regular files directly under `dir`, sorted by file name.
pub fn list_files(dir: &Path) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();
    for entry in walk(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            trace!(path = %entry.path().display(), "skipping non-regular entry");
            continue;
        }
        let len = entry
            .metadata()
            .map_err(|e| DatenameError::io("stat", entry.path(), io::Error::from(e)))?
            .len();
        files.push(FileEntry {
            name: entry.file_name().to_os_string(),
            path: entry.into_path(),
            len,
        });
    }
    debug!(dir = %dir.display(), count = files.len(), "listed regular files");
    Ok(files)
}

/// Every entry name directly under `dir` (files, directories, links, ...).
pub fn list_names(dir: &Path) -> Result<Vec<OsString>> {
    walk(dir)
        .map(|entry| entry.map(|e| e.file_name().to_os_string()))
        .collect()
}
