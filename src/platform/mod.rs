//! Platform-specific helpers.
//! Only the log file opener differs between Unix and other targets.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open (creating if needed) a log file for appending. New files are
/// created 0600; existing files keep their mode.
#[cfg(unix)]
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
