//! One full run over one directory: preconditions, duplicate removal,
//! timestamp resolution, rename planning and renaming.
//!
//! Precondition failures (missing directory, unavailable metadata tool) are
//! reported before anything is modified. Later failures abort the run and
//! carry the partial progress in the error; once duplicates have been deleted
//! that includes the deleted paths.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{Config, Zone};
use crate::errors::Result;
use crate::fs_ops::{
    Duplicate, FileEntry, NameRegistry, apply_renames, delete_duplicates, ensure_directory,
    find_duplicates, list_files, list_names, plan_renames,
};
use crate::shutdown;
use crate::timestamp::{CreationDateSource, TimestampResolver};

/// Knobs for a run, usually derived from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub zone: Zone,
    pub delete_duplicates: bool,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            zone: Zone::Local,
            delete_duplicates: true,
            dry_run: false,
        }
    }
}

impl From<&Config> for RunOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            zone: cfg.zone,
            delete_duplicates: cfg.delete_duplicates,
            dry_run: cfg.dry_run,
        }
    }
}

/// What a run did (or, with `dry_run`, would do).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub dry_run: bool,
    /// Every duplicate found, deleted or not.
    pub duplicates: Vec<Duplicate>,
    pub deleted: Vec<PathBuf>,
    pub renamed: Vec<(PathBuf, PathBuf)>,
    pub unchanged: Vec<PathBuf>,
}

impl RunSummary {
    pub fn kept_duplicates(&self) -> bool {
        !self.duplicates.is_empty() && self.deleted.is_empty()
    }
}

/// Deduplicate and rename the regular files directly inside `dir`.
///
/// `approve` is asked once, with the full duplicate list, before anything is
/// deleted; returning false keeps the duplicates and renames them along with
/// the other files. It is not called when there are no duplicates or when
/// deletion is disabled in `opts`.
pub fn organize_directory<S, F>(
    dir: &Path,
    source: S,
    opts: &RunOptions,
    approve: F,
) -> Result<RunSummary>
where
    S: CreationDateSource,
    F: FnOnce(&[Duplicate]) -> bool,
{
    ensure_directory(dir)?;
    source.check_available()?;
    info!(dir = %dir.display(), dry_run = opts.dry_run, zone = %opts.zone, "organizing directory");

    let mut summary = RunSummary {
        dry_run: opts.dry_run,
        ..Default::default()
    };

    // 1) Duplicates
    let plan = find_duplicates(list_files(dir)?)?;
    let delete = !plan.duplicates.is_empty() && opts.delete_duplicates && approve(&plan.duplicates);
    let survivors = if delete {
        summary.deleted = delete_duplicates(&plan.duplicates, opts.dry_run)?;
        summary.duplicates = plan.duplicates;
        plan.survivors
    } else {
        if !plan.duplicates.is_empty() {
            info!(count = plan.duplicates.len(), "keeping duplicates");
        }
        summary.duplicates = plan.duplicates.clone();
        plan.into_all_files()
    };

    let (unchanged, renamed) = match rename_survivors(dir, source, opts, survivors, &summary.deleted) {
        Ok(done) => done,
        Err(e) if opts.dry_run => return Err(e),
        Err(e) => return Err(e.after_deletions(summary.deleted)),
    };
    summary.unchanged = unchanged;
    summary.renamed = renamed;

    info!(
        deleted = summary.deleted.len(),
        renamed = summary.renamed.len(),
        unchanged = summary.unchanged.len(),
        "run complete"
    );
    Ok(summary)
}

/// Timestamp, plan and rename `survivors`. Returns the unchanged paths and
/// the applied renames.
fn rename_survivors<S: CreationDateSource>(
    dir: &Path,
    source: S,
    opts: &RunOptions,
    survivors: Vec<FileEntry>,
    deleted: &[PathBuf],
) -> Result<(Vec<PathBuf>, Vec<(PathBuf, PathBuf)>)> {
    // 2) Registry: everything still in the directory. In a dry run the
    // duplicates are still on disk, so release them by name.
    let mut registry = NameRegistry::from_names(list_names(dir)?);
    for name in deleted.iter().filter_map(|p| p.file_name()) {
        registry.release(name);
    }
    debug!(taken = registry.len(), "name registry seeded");

    // 3) Timestamps, in processing order
    let resolver = TimestampResolver::new(source, opts.zone);
    let mut stamped = Vec::with_capacity(survivors.len());
    for entry in survivors {
        shutdown::check()?;
        let ts = resolver.resolve(&entry)?;
        stamped.push((entry, ts));
    }

    // 4) Names
    let plan = plan_renames(&stamped, &mut registry);
    let renamed = apply_renames(&plan, opts.dry_run)?;
    Ok((plan.unchanged, renamed))
}
