//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Flags override values from the XML config file.

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel, Zone, validate_tag};

/// Deduplicate a directory and rename its files after their timestamps.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Remove duplicate files and rename the rest to 'YYYYMMDD HHMMSS +ZZZZ.ext'"
)]
pub struct Args {
    /// Directory to organize (its direct children only).
    #[arg(
        value_name = "DIRECTORY",
        value_hint = ValueHint::DirPath,
        required_unless_present = "print_config"
    )]
    pub directory: Option<PathBuf>,

    #[arg(
        short = 'n',
        long,
        help = "Show what would be done, but do not delete or rename anything"
    )]
    pub dry_run: bool,

    #[arg(long, help = "Report duplicates but do not delete them")]
    pub keep_duplicates: bool,

    #[arg(long, help = "Ask before deleting duplicates")]
    pub confirm: bool,

    #[arg(long, help = "Format names in UTC instead of local time")]
    pub utc: bool,

    /// Metadata tool to run instead of `exiftool` from PATH.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::ExecutablePath)]
    pub exiftool: Option<PathBuf>,

    /// Exif tag holding the creation date (`Tag` or `Group:Tag`).
    #[arg(long, value_name = "TAG", value_parser = validate_tag)]
    pub tag: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where datename looks for its config file (or DATENAME_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by datename and exit")]
    pub print_config: bool,
}

impl Args {
    /// The directory argument with stray shell quoting removed.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory.as_deref().map(sanitize_path)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if let Some(tool) = &self.exiftool {
            cfg.exiftool = tool.clone();
        }
        if let Some(tag) = &self.tag {
            cfg.tag = tag.clone();
        }
        if self.utc {
            cfg.zone = Zone::Utc;
        }
        if self.keep_duplicates {
            cfg.delete_duplicates = false;
        }
        if self.confirm {
            cfg.confirm_deletion = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
    }
}

/// Non-UTF-8 paths are passed through untouched.
fn sanitize_path(p: &Path) -> PathBuf {
    match p.to_str() {
        Some(s) => sanitize_str(s),
        None => p.to_path_buf(),
    }
}

/// Strip surrounding quotes (left behind by PowerShell/CMD or bad escaping)
/// and one trailing separator.
fn sanitize_str(s: &str) -> PathBuf {
    let trimmed = s.trim();
    let mut inner = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
    };

    if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
        inner.pop();
    }
    PathBuf::from(inner)
}

pub fn parse() -> Args {
    Args::parse()
}
