//! Canonical timestamps.
//!
//! A file's canonical timestamp is the earlier of its creation date and its
//! modification time, compared as absolute instants and rendered in the
//! configured zone as `YYYYMMDD HHMMSS ±ZZZZ`.
//!
//! The creation date comes from a [`CreationDateSource`] (normally exiftool).
//! If the source has no date, or its output cannot be parsed, the filesystem's
//! creation time is used, and where the platform has none, the modification
//! time.

pub mod exiftool;

use chrono::{DateTime, FixedOffset, Local, Utc};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::config::Zone;
use crate::errors::{DatenameError, Result};
use crate::fs_ops::FileEntry;

pub use exiftool::ExifTool;

/// chrono format of the name stem.
pub const NAME_FORMAT: &str = "%Y%m%d %H%M%S %z";

/// Resolves the creation date of a file from an external source.
pub trait CreationDateSource {
    /// Fail early if the source cannot work at all. Called once before any
    /// file is touched.
    fn check_available(&self) -> Result<()> {
        Ok(())
    }

    /// `Ok(None)` when the file simply has no creation date.
    /// `Err(MetadataParse)` is recoverable; any other error is fatal.
    fn creation_date(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>>;
}

impl<S: CreationDateSource + ?Sized> CreationDateSource for &S {
    fn check_available(&self) -> Result<()> {
        (**self).check_available()
    }

    fn creation_date(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>> {
        (**self).creation_date(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTimestamp(DateTime<FixedOffset>);

impl CanonicalTimestamp {
    /// The earlier of the two instants, expressed in `zone`.
    pub fn earliest(creation: DateTime<Utc>, modified: DateTime<Utc>, zone: Zone) -> Self {
        Self::in_zone(creation.min(modified), zone)
    }

    pub fn in_zone(instant: DateTime<Utc>, zone: Zone) -> Self {
        let local = match zone {
            Zone::Local => instant.with_timezone(&Local).fixed_offset(),
            Zone::Utc => instant.fixed_offset(),
        };
        Self(local)
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// `YYYYMMDD HHMMSS ±ZZZZ`, seconds truncated.
    pub fn stem(&self) -> String {
        self.0.format(NAME_FORMAT).to_string()
    }
}

impl fmt::Display for CanonicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(NAME_FORMAT))
    }
}

/// Combines a creation-date source with filesystem metadata.
#[derive(Debug, Clone)]
pub struct TimestampResolver<S> {
    source: S,
    zone: Zone,
}

impl<S: CreationDateSource> TimestampResolver<S> {
    pub fn new(source: S, zone: Zone) -> Self {
        Self { source, zone }
    }

    pub fn resolve(&self, entry: &FileEntry) -> Result<CanonicalTimestamp> {
        let path = entry.path.as_path();
        let meta = fs::metadata(path).map_err(|e| DatenameError::io("stat", path, e))?;
        let modified = meta
            .modified()
            .map(to_utc)
            .map_err(|e| DatenameError::io("read mtime", path, e))?;

        let from_source = match self.source.creation_date(path) {
            Ok(date) => date.map(|d| d.with_timezone(&Utc)),
            Err(e @ DatenameError::MetadataParse { .. }) => {
                warn!(path = %path.display(), error = %e, "unusable creation date; falling back to filesystem times");
                None
            }
            Err(e) => return Err(e),
        };

        let creation = match from_source {
            Some(date) => date,
            None => meta.created().map(to_utc).unwrap_or(modified),
        };

        let ts = CanonicalTimestamp::earliest(creation, modified, self.zone);
        debug!(
            path = %path.display(),
            creation = %creation,
            modified = %modified,
            canonical = %ts,
            from_metadata_tool = from_source.is_some(),
            "resolved timestamp"
        );
        Ok(ts)
    }
}

fn to_utc(t: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(t)
}
