//! Duplicate detection and removal.
//!
//! Files are compared by content only. Within each group of identical files the
//! first one in processing order (file name order) is kept; the others are
//! reported as duplicates of it. Only files sharing a size are hashed.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::fingerprint::ContentFingerprint;
use super::scan::FileEntry;
use crate::errors::{DatenameError, Result};
use crate::shutdown;

/// A file whose content is identical to an earlier file (`original`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub entry: FileEntry,
    pub original: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicatePlan {
    /// One file per content class, in input order.
    pub survivors: Vec<FileEntry>,
    pub duplicates: Vec<Duplicate>,
}

impl DuplicatePlan {
    /// Survivors plus duplicates, back in file name order. Used when the
    /// duplicates are kept instead of deleted.
    pub fn into_all_files(self) -> Vec<FileEntry> {
        let mut all = self.survivors;
        all.extend(self.duplicates.into_iter().map(|d| d.entry));
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

/// Partition `entries` (already in processing order) into survivors and duplicates.
///
/// Reads file contents but never modifies anything; a read failure aborts
/// before any deletion can happen.
pub fn find_duplicates(entries: Vec<FileEntry>) -> Result<DuplicatePlan> {
    let mut size_counts: HashMap<u64, usize> = HashMap::new();
    for e in &entries {
        *size_counts.entry(e.len).or_default() += 1;
    }

    let mut seen: HashMap<(u64, ContentFingerprint), PathBuf> = HashMap::new();
    let mut plan = DuplicatePlan::default();

    for entry in entries {
        if size_counts.get(&entry.len).copied().unwrap_or(0) < 2 {
            plan.survivors.push(entry);
            continue;
        }
        shutdown::check()?;
        let fp = ContentFingerprint::of_file(&entry.path)
            .map_err(|e| DatenameError::io("read", &entry.path, e))?;
        match seen.get(&(entry.len, fp)) {
            Some(original) => {
                debug!(path = %entry.path.display(), original = %original.display(), fingerprint = %fp, "duplicate content");
                plan.duplicates.push(Duplicate {
                    original: original.clone(),
                    entry,
                });
            }
            None => {
                seen.insert((entry.len, fp), entry.path.clone());
                plan.survivors.push(entry);
            }
        }
    }

    info!(
        survivors = plan.survivors.len(),
        duplicates = plan.duplicates.len(),
        "duplicate scan complete"
    );
    Ok(plan)
}

/// Delete every duplicate, in order. Returns the deleted paths.
///
/// Before each deletion the kept original must still exist; otherwise (or on
/// any I/O failure) the pass stops with `DedupAborted` listing what was already
/// deleted. With `dry_run` nothing is touched and the would-be deletions are
/// returned.
pub fn delete_duplicates(duplicates: &[Duplicate], dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut deleted = Vec::with_capacity(duplicates.len());
    for dup in duplicates {
        let path = &dup.entry.path;
        if dry_run {
            info!(path = %path.display(), original = %dup.original.display(), "dry-run: would delete duplicate");
            deleted.push(path.clone());
            continue;
        }
        if shutdown::is_requested() {
            warn!(deleted = deleted.len(), remaining = duplicates.len() - deleted.len(), "interrupted during duplicate removal");
            return Err(DatenameError::Interrupted.after_deletions(deleted));
        }
        let result = fs::symlink_metadata(&dup.original).and_then(|_| fs::remove_file(path));
        if let Err(source) = result {
            return Err(DatenameError::DedupAborted {
                path: path.clone(),
                deleted,
                source,
            });
        }
        info!(path = %path.display(), original = %dup.original.display(), "deleted duplicate");
        deleted.push(path.clone());
    }
    Ok(deleted)
}
