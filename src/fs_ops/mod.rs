//! Filesystem operations over a single directory: listing, duplicate
//! detection and removal, name assignment and renaming.

mod dedup;
mod fingerprint;
mod naming;
mod rename;
mod scan;

pub use dedup::{Duplicate, DuplicatePlan, delete_duplicates, find_duplicates};
pub use fingerprint::ContentFingerprint;
pub use naming::{NameRegistry, is_assigned_form, name_with_suffix};
pub use rename::{PlannedRename, RenamePlan, apply_renames, plan_renames};
pub use scan::{FileEntry, ensure_directory, list_files, list_names};
