//! Core library for `datename`.
//!
//! Removes duplicate files (by content) from a single directory and renames the
//! remaining files after their canonical timestamp, the earlier of creation
//! date (from exiftool) and modification time, formatted as
//! `YYYYMMDD HHMMSS ±ZZZZ`. Name collisions get ` (1)`, ` (2)`, ... suffixes.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod organize;
pub mod output;
pub mod platform;
pub mod shutdown;
pub mod timestamp;

pub use config::{
    Config, LogLevel, Zone, default_config_path, default_log_path, load_config_from_xml,
    load_config_from_xml_path, path_has_symlink_ancestor,
};
pub use errors::DatenameError;
pub use organize::{RunOptions, RunSummary, organize_directory};
pub use timestamp::{CanonicalTimestamp, CreationDateSource, ExifTool, TimestampResolver};
