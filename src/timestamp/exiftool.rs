//! exiftool-backed creation dates.
//!
//! One blocking `exiftool -s -s -s -<Tag> -- <file>` call per file. With `-s`
//! given three times exiftool prints the bare value, e.g. `2008:05:30 15:56:01`,
//! optionally with sub-seconds and a UTC offset.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use thiserror::Error;
use tracing::{debug, trace};

use super::CreationDateSource;
use crate::config::{DEFAULT_DATE_TAG, DEFAULT_EXIFTOOL, Zone};
use crate::errors::{DatenameError, Result};

const EXIF_NAIVE: &str = "%Y:%m:%d %H:%M:%S%.f";
const EXIF_WITH_OFFSET: &str = "%Y:%m:%d %H:%M:%S%.f%:z";

#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
    tag: String,
    zone: Zone,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new(DEFAULT_EXIFTOOL, DEFAULT_DATE_TAG, Zone::default())
    }
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>, tag: impl Into<String>, zone: Zone) -> Self {
        Self {
            program: program.into(),
            tag: tag.into(),
            zone,
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> DatenameError {
        DatenameError::ToolUnavailable {
            tool: self.program.clone(),
            reason: reason.into(),
        }
    }

    fn run<I, A>(&self, args: I) -> io::Result<Output>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
    }
}

impl CreationDateSource for ExifTool {
    /// Runs `exiftool -ver`; a spawn failure or non-zero exit means the tool
    /// is missing or broken.
    fn check_available(&self) -> Result<()> {
        let out = self
            .run(["-ver"])
            .map_err(|e| self.unavailable(e.to_string()))?;
        if !out.status.success() {
            return Err(self.unavailable(format!("`-ver` exited with {}", out.status)));
        }
        debug!(
            tool = %self.program.display(),
            version = %String::from_utf8_lossy(&out.stdout).trim(),
            "metadata tool available"
        );
        Ok(())
    }

    fn creation_date(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>> {
        let tag_arg = format!("-{}", self.tag);
        let out = self
            .run([
                OsStr::new("-s"),
                OsStr::new("-s"),
                OsStr::new("-s"),
                OsStr::new(&tag_arg),
                OsStr::new("--"),
                path.as_os_str(),
            ])
            .map_err(|e| self.unavailable(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        if !out.status.success() && stdout.trim().is_empty() {
            debug!(
                path = %path.display(),
                status = %out.status,
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "metadata tool reported no value"
            );
            return Ok(None);
        }
        trace!(path = %path.display(), raw = %stdout.trim(), "metadata tool output");

        parse_exif_date(&stdout, self.zone).map_err(|e| DatenameError::MetadataParse {
            path: path.to_path_buf(),
            output: e.0,
        })
    }
}

/// Output that is neither empty nor a date; holds the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an exif date: {0:?}")]
pub struct InvalidExifDate(pub String);

/// Parse an exiftool date value.
///
/// - empty output or the `0000:00:00 00:00:00` placeholder: `Ok(None)`
/// - `YYYY:MM:DD HH:MM:SS[.fff][±HH:MM|Z]`: offset used as given, otherwise the
///   naive time is placed in `zone` (earliest mapping if ambiguous)
/// - anything else, including a local time that does not exist: `InvalidExifDate`
pub fn parse_exif_date(
    raw: &str,
    zone: Zone,
) -> Result<Option<DateTime<FixedOffset>>, InvalidExifDate> {
    let s = raw.trim();
    if s.is_empty() || s.starts_with("0000:00:00") {
        return Ok(None);
    }

    let with_offset = match s.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_str(&with_offset, EXIF_WITH_OFFSET) {
        return Ok(Some(dt));
    }

    let invalid = || InvalidExifDate(s.to_string());
    let naive = NaiveDateTime::parse_from_str(s, EXIF_NAIVE).map_err(|_| invalid())?;
    let placed = match zone {
        Zone::Utc => Some(Utc.from_utc_datetime(&naive).fixed_offset()),
        Zone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|d| d.fixed_offset()),
    };
    placed.map(Some).ok_or_else(invalid)
}
