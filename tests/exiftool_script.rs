//! ExifTool against stand-in shell scripts. Serialized: writing and then
//! exec'ing a script while other tests fork can fail with ETXTBSY.
#![cfg(unix)]

use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use datename::timestamp::exiftool::parse_exif_date;
use datename::{CreationDateSource, DatenameError, ExifTool, Zone};

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-exiftool");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
#[serial]
fn reads_the_printed_date() {
    let td = tempdir().unwrap();
    let script = write_script(
        td.path(),
        r#"if [ "$1" = "-ver" ]; then echo 12.76; exit 0; fi
echo "2008:05:30 15:56:01""#,
    );
    let tool = ExifTool::new(&script, "CreateDate", Zone::Utc);

    tool.check_available().unwrap();
    let d = tool.creation_date(Path::new("whatever.jpg")).unwrap().unwrap();
    assert_eq!(d.format("%Y%m%d %H%M%S %z").to_string(), "20080530 155601 +0000");
}

#[test]
#[serial]
fn passes_tag_and_path_as_arguments() {
    let td = tempdir().unwrap();
    // Echo back the date only when called the way we expect.
    let script = write_script(
        td.path(),
        r#"if [ "$1 $2 $3 $4 $5" = "-s -s -s -DateTimeOriginal --" ] && [ "$6" = "my photo.jpg" ]; then
  echo "2001:02:03 04:05:06+01:00"
fi"#,
    );
    let tool = ExifTool::new(&script, "DateTimeOriginal", Zone::Utc);

    let d = tool.creation_date(Path::new("my photo.jpg")).unwrap().unwrap();
    assert_eq!(d.offset().local_minus_utc(), 3600);
    assert_eq!(d.format("%H:%M:%S").to_string(), "04:05:06");
}

#[test]
#[serial]
fn no_output_means_no_date() {
    let td = tempdir().unwrap();
    let script = write_script(td.path(), "exit 0");
    let tool = ExifTool::new(&script, "CreateDate", Zone::Utc);
    assert_eq!(tool.creation_date(Path::new("a.txt")).unwrap(), None);

    let failing = write_script(td.path(), "echo 'Error: File not found' >&2; exit 1");
    let tool = ExifTool::new(&failing, "CreateDate", Zone::Utc);
    assert_eq!(tool.creation_date(Path::new("a.txt")).unwrap(), None);
}

#[test]
#[serial]
fn garbage_output_is_a_parse_error() {
    let td = tempdir().unwrap();
    let script = write_script(td.path(), "echo 'not a date'");
    let tool = ExifTool::new(&script, "CreateDate", Zone::Utc);

    let err = tool.creation_date(Path::new("a.jpg")).unwrap_err();
    match err {
        DatenameError::MetadataParse { path, output } => {
            assert_eq!(path, PathBuf::from("a.jpg"));
            assert_eq!(output, "not a date");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
#[serial]
fn failing_version_probe_is_unavailable() {
    let td = tempdir().unwrap();
    let script = write_script(td.path(), "exit 3");
    let tool = ExifTool::new(&script, "CreateDate", Zone::Utc);

    let err = tool.check_available().unwrap_err();
    assert!(matches!(err, DatenameError::ToolUnavailable { .. }));
    assert_eq!(err.kind(), "tool_unavailable");
}

#[test]
fn placeholder_date_is_no_date() {
    assert_eq!(parse_exif_date("0000:00:00 00:00:00", Zone::Local), Ok(None));
}
