//! Rename planning and execution.
//!
//! Planning is deterministic: files are visited in the order given (file name
//! order), files whose name already has the assigned form for their timestamp
//! keep it, and every other file gets the first free name from the registry.
//! Execution moves files within the directory in plan order and never
//! overwrites an existing entry.

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::naming::{NameRegistry, is_assigned_form};
use super::scan::FileEntry;
use crate::errors::{DatenameError, Result};
use crate::shutdown;
use crate::timestamp::CanonicalTimestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
    pub timestamp: CanonicalTimestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    pub renames: Vec<PlannedRename>,
    /// Files already carrying their assigned name.
    pub unchanged: Vec<PathBuf>,
}

/// Compute target names for `stamped` files.
///
/// `registry` should already hold the names present in the directory; the
/// current names of `stamped` are claimed here as well, so a planned target
/// never points at an existing file.
pub fn plan_renames(
    stamped: &[(FileEntry, CanonicalTimestamp)],
    registry: &mut NameRegistry,
) -> RenamePlan {
    for (entry, _) in stamped {
        registry.claim(entry.name.clone());
    }

    let mut plan = RenamePlan::default();
    let mut pending = Vec::new();

    // Settled files first, so they hold their names against newcomers.
    for (entry, ts) in stamped {
        if is_assigned_form(&entry.name, &ts.stem(), entry.path.extension()) {
            debug!(path = %entry.path.display(), "name already matches timestamp");
            plan.unchanged.push(entry.path.clone());
        } else {
            pending.push((entry, ts));
        }
    }

    for (entry, ts) in pending {
        let name = registry.assign(&ts.stem(), entry.path.extension());
        let to = entry.path.with_file_name(&name);
        debug!(from = %entry.path.display(), to = %to.display(), timestamp = %ts, "planned rename");
        plan.renames.push(PlannedRename {
            from: entry.path.clone(),
            to,
            timestamp: *ts,
        });
    }

    plan
}

/// Perform the planned renames in order. Returns the completed (from, to) pairs.
///
/// Any failure, including a target that appeared after planning, stops the
/// batch with `RenameAborted` carrying the pairs already renamed and the files
/// still pending (the failing one included). With `dry_run` nothing is touched.
pub fn apply_renames(plan: &RenamePlan, dry_run: bool) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut done: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(plan.renames.len());
    for (i, r) in plan.renames.iter().enumerate() {
        if dry_run {
            info!(from = %r.from.display(), to = %r.to.display(), "dry-run: would rename");
            done.push((r.from.clone(), r.to.clone()));
            continue;
        }
        if shutdown::is_requested() {
            warn!(renamed = done.len(), remaining = plan.renames.len() - i, "interrupted during rename pass");
            return Err(DatenameError::Interrupted);
        }

        let result = match fs::symlink_metadata(&r.to) {
            Ok(_) => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "target appeared after planning",
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => fs::rename(&r.from, &r.to),
            Err(e) => Err(e),
        };

        if let Err(source) = result {
            let pending = plan.renames[i..].iter().map(|p| p.from.clone()).collect();
            return Err(DatenameError::RenameAborted {
                from: r.from.clone(),
                to: r.to.clone(),
                renamed: done,
                pending,
                source,
            });
        }
        info!(from = %r.from.display(), to = %r.to.display(), "renamed");
        done.push((r.from.clone(), r.to.clone()));
    }
    Ok(done)
}
