//! Configuration types: `Config` (one run's settings), `LogLevel`, `Zone`, and
//! the exif tag check.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DEFAULT_DATE_TAG, DEFAULT_EXIFTOOL};

/// Verbosity as written in config files and on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Time zone in which timestamps are interpreted and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The machine's local zone, offset resolved per instant (DST aware).
    #[default]
    Local,
    Utc,
}

impl Zone {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Zone::Local),
            "utc" | "z" | "gmt" => Some(Zone::Utc),
            _ => None,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Zone::Local => "local",
            Zone::Utc => "utc",
        })
    }
}

impl FromStr for Zone {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid timezone: '{s}' (expected local or utc)"))
    }
}

/// Check an exif tag name before it is passed to the metadata tool as `-<tag>`.
///
/// Accepts `Tag` or `Group:Tag` (groups may be chained and may contain `-`,
/// as in `XMP-xmp:CreateDate`). The tag itself is ASCII letters, digits and
/// `_`. Anything else, `=` in particular, could turn the read into a write.
pub fn validate_tag(s: &str) -> Result<String, String> {
    let s = s.trim();
    let mut parts: Vec<&str> = s.split(':').collect();
    let tag = parts.pop().unwrap_or_default();

    let tag_ok = tag.starts_with(|c: char| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let groups_ok = parts.iter().all(|g| {
        g.starts_with(|c: char| c.is_ascii_alphanumeric())
            && g.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    });
    if tag_ok && groups_ok {
        Ok(s.to_string())
    } else {
        Err(format!("invalid exif tag name '{s}' (expected Tag or Group:Tag)"))
    }
}

/// Runtime configuration for one run over one directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: LogLevel,
    /// Extra log destination, off by default
    pub log_file: Option<PathBuf>,
    /// Metadata tool executable (name looked up on PATH, or a path)
    pub exiftool: PathBuf,
    /// Exif tag carrying the creation date
    pub tag: String,
    /// Zone used for naive exif dates and for rendering names
    pub zone: Zone,
    /// If false, duplicates are reported but kept
    pub delete_duplicates: bool,
    /// Ask on stdin before deleting duplicates
    pub confirm_deletion: bool,
    /// Plan and report only
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Normal,
            log_file: None,
            exiftool: PathBuf::from(DEFAULT_EXIFTOOL),
            tag: DEFAULT_DATE_TAG.to_string(),
            zone: Zone::Local,
            delete_duplicates: true,
            confirm_deletion: false,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_parse_accepts_aliases() {
        assert_eq!(Zone::parse("LOCAL"), Some(Zone::Local));
        assert_eq!(Zone::parse(" utc "), Some(Zone::Utc));
        assert_eq!(Zone::parse("gmt"), Some(Zone::Utc));
        assert!("mars".parse::<Zone>().is_err());
    }

    #[test]
    fn tag_names_with_optional_groups_are_accepted() {
        assert_eq!(validate_tag(" DateTimeOriginal ").as_deref(), Ok("DateTimeOriginal"));
        assert!(validate_tag("EXIF:CreateDate").is_ok());
        assert!(validate_tag("XMP-xmp:CreateDate").is_ok());
        assert!(validate_tag("1IFD0:ModifyDate").is_ok());
    }

    #[test]
    fn tag_names_that_change_the_command_are_rejected() {
        for bad in [
            "",
            "all=",
            "CreateDate=",
            "-overwrite_original",
            "Create Date",
            "EXIF:",
            ":CreateDate",
            "EXIF::CreateDate",
            "-EXIF:CreateDate",
            "Create*",
        ] {
            assert!(validate_tag(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn defaults_target_exiftool_create_date() {
        let cfg = Config::default();
        assert_eq!(cfg.exiftool, PathBuf::from("exiftool"));
        assert_eq!(cfg.tag, "CreateDate");
        assert!(cfg.delete_duplicates);
        assert!(!cfg.dry_run);
    }
}
