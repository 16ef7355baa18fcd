//! Typed error definitions for datename.
//! Provides a small set of well-known failure modes for better logs and tests.
//!
//! Batch errors (`DedupAborted`, `RenameAborted`) carry the partial progress made
//! before the failure; nothing is rolled back. Any failure after duplicates were
//! deleted is wrapped in `RunAborted` so the deletions are not lost.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatenameError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Metadata tool '{tool}' is unavailable: {reason}. Make sure exiftool is installed")]
    ToolUnavailable { tool: PathBuf, reason: String },

    #[error("Could not parse metadata for {path}: unexpected output {output:?}")]
    MetadataParse { path: PathBuf, output: String },

    #[error("I/O error during {op} on {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete duplicate {path}: {source} ({} duplicate(s) already deleted)", deleted.len())]
    DedupAborted {
        path: PathBuf,
        deleted: Vec<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rename {from} -> {to}: {source} ({} renamed, {} pending)", renamed.len(), pending.len())]
    RenameAborted {
        from: PathBuf,
        to: PathBuf,
        renamed: Vec<(PathBuf, PathBuf)>,
        pending: Vec<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("{source} ({} duplicate(s) already deleted)", deleted.len())]
    RunAborted {
        deleted: Vec<PathBuf>,
        #[source]
        source: Box<DatenameError>,
    },
}

impl DatenameError {
    /// Stable numeric code per failure kind, logged alongside the message.
    pub fn code(&self) -> u16 {
        match self {
            DatenameError::DirectoryNotFound(_) => 10,
            DatenameError::NotADirectory(_) => 11,
            DatenameError::ToolUnavailable { .. } => 20,
            DatenameError::MetadataParse { .. } => 21,
            DatenameError::Io { .. } => 30,
            DatenameError::DedupAborted { .. } => 31,
            DatenameError::RenameAborted { .. } => 32,
            DatenameError::Interrupted => 130,
            DatenameError::RunAborted { source, .. } => source.code(),
        }
    }

    /// Short machine-friendly kind name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DatenameError::DirectoryNotFound(_) => "directory_not_found",
            DatenameError::NotADirectory(_) => "not_a_directory",
            DatenameError::ToolUnavailable { .. } => "tool_unavailable",
            DatenameError::MetadataParse { .. } => "metadata_parse",
            DatenameError::Io { .. } => "io",
            DatenameError::DedupAborted { .. } => "dedup_aborted",
            DatenameError::RenameAborted { .. } => "rename_aborted",
            DatenameError::Interrupted => "interrupted",
            DatenameError::RunAborted { source, .. } => source.kind(),
        }
    }

    /// The underlying failure, with any `RunAborted` wrapping removed.
    pub fn root_cause(&self) -> &DatenameError {
        match self {
            DatenameError::RunAborted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Attach the duplicates deleted so far. Returns `self` unchanged when
    /// nothing was deleted.
    pub(crate) fn after_deletions(self, deleted: Vec<PathBuf>) -> Self {
        if deleted.is_empty() {
            return self;
        }
        DatenameError::RunAborted {
            deleted,
            source: Box::new(self),
        }
    }

    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        DatenameError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = DatenameError> = std::result::Result<T, E>;
