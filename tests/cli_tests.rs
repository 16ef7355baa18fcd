//! End-to-end runs of the binary. The config location is pointed at a
//! missing file so the user's own config never leaks in. All tests are
//! serialized because some write and exec fake exiftool scripts (ETXTBSY).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;

use datename::config::CONFIG_ENV;
use serial_test::serial;

fn datename(config_dir: &Path) -> Command {
    let me = assert_cmd::cargo::cargo_bin!("datename");
    let mut cmd = Command::new(me);
    cmd.env(CONFIG_ENV, config_dir.join("absent-config.xml"));
    cmd
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
#[serial]
fn print_config_succeeds() {
    let td = tempdir().unwrap();
    let out = datename(td.path()).arg("--print-config").output().unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).contains("absent-config.xml"));
}

#[test]
#[serial]
fn directory_argument_is_required() {
    let td = tempdir().unwrap();
    let out = datename(td.path()).output().unwrap();
    assert!(!out.status.success());
}

#[test]
#[serial]
fn missing_directory_fails() {
    let td = tempdir().unwrap();
    let out = datename(td.path())
        .arg(td.path().join("no-such-dir"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Directory not found"));
}

#[test]
#[serial]
fn missing_tool_changes_nothing() {
    let td = tempdir().unwrap();
    let photos = td.path().join("photos");
    fs::create_dir(&photos).unwrap();
    fs::write(photos.join("a.jpg"), "same").unwrap();
    fs::write(photos.join("b.jpg"), "same").unwrap();

    let out = datename(td.path())
        .args(["--exiftool", "/nonexistent/exiftool"])
        .arg(&photos)
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("exiftool is installed"));
    assert_eq!(listing(&photos), vec!["a.jpg", "b.jpg"]);
}

#[test]
#[serial]
fn malformed_config_fails() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(&cfg, "<config><colour>blue</colour></config>").unwrap();
    let me = assert_cmd::cargo::cargo_bin!("datename");
    let out = Command::new(me)
        .env(CONFIG_ENV, &cfg)
        .arg(td.path())
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("parse config xml"));
}

#[cfg(unix)]
mod with_fake_exiftool {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const STEM: &str = "20200101 100000 +0000";

    /// Answers `-ver` and prints the same CreateDate for every file.
    fn fake_exiftool(dir: &Path) -> PathBuf {
        let path = dir.join("exiftool");
        fs::write(
            &path,
            "#!/bin/sh\nif [ \"$1\" = \"-ver\" ]; then echo 12.76; exit 0; fi\necho \"2020:01:01 10:00:00\"\n",
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    struct Fixture {
        _td: tempfile::TempDir,
        home: PathBuf,
        photos: PathBuf,
        tool: PathBuf,
    }

    fn fixture(files: &[(&str, &str)]) -> Fixture {
        let td = tempdir().unwrap();
        let home = td.path().to_path_buf();
        let photos = home.join("photos");
        fs::create_dir(&photos).unwrap();
        for (name, content) in files {
            fs::write(photos.join(name), content).unwrap();
        }
        let tool = fake_exiftool(&home);
        Fixture {
            _td: td,
            home,
            photos,
            tool,
        }
    }

    fn run(fx: &Fixture, extra: &[&str]) -> Output {
        datename(&fx.home)
            .arg("--exiftool")
            .arg(&fx.tool)
            .arg("--utc")
            .args(extra)
            .arg(&fx.photos)
            .output()
            .unwrap()
    }

    #[test]
    #[serial]
    fn identical_files_collapse_to_one_name() {
        let fx = fixture(&[("a.jpg", "same"), ("b.jpg", "same")]);
        let out = run(&fx, &[]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
        assert_eq!(listing(&fx.photos), vec![format!("{STEM}.jpg")]);
        assert_eq!(fs::read_to_string(fx.photos.join(format!("{STEM}.jpg"))).unwrap(), "same");
    }

    #[test]
    #[serial]
    fn different_files_get_suffixes() {
        let fx = fixture(&[("a.jpg", "one"), ("b.jpg", "two")]);
        let out = run(&fx, &[]);
        assert!(out.status.success());

        let report = stdout(&out);
        assert!(report.contains(&format!("a.jpg -> {STEM}.jpg")), "{report}");
        assert!(report.contains(&format!("b.jpg -> {STEM} (1).jpg")), "{report}");
        assert_eq!(fs::read_to_string(fx.photos.join(format!("{STEM} (1).jpg"))).unwrap(), "two");
    }

    #[test]
    #[serial]
    fn second_run_is_a_no_op() {
        let fx = fixture(&[("a.jpg", "one"), ("b.jpg", "two"), ("c.jpg", "one")]);
        assert!(run(&fx, &[]).status.success());
        let after_first = listing(&fx.photos);
        assert_eq!(after_first.len(), 2);

        let out = run(&fx, &[]);
        assert!(out.status.success());
        assert!(!stdout(&out).contains(" -> "));
        assert_eq!(listing(&fx.photos), after_first);
    }

    #[test]
    #[serial]
    fn dry_run_leaves_directory_untouched() {
        let fx = fixture(&[("a.jpg", "same"), ("b.jpg", "same"), ("c.png", "other")]);
        let out = run(&fx, &["--dry-run"]);
        assert!(out.status.success());
        assert!(stdout(&out).contains(&format!("c.png -> {STEM}.png")));
        assert_eq!(listing(&fx.photos), vec!["a.jpg", "b.jpg", "c.png"]);
        assert_eq!(fs::read_to_string(fx.photos.join("a.jpg")).unwrap(), "same");
    }

    #[test]
    #[serial]
    fn keep_duplicates_renames_them_with_suffixes() {
        let fx = fixture(&[("a.jpg", "same"), ("b.jpg", "same")]);
        let out = run(&fx, &["--keep-duplicates"]);
        assert!(out.status.success());
        assert_eq!(
            listing(&fx.photos),
            vec![format!("{STEM} (1).jpg"), format!("{STEM}.jpg")]
        );
    }

    #[test]
    #[serial]
    fn declined_confirmation_keeps_duplicates() {
        let fx = fixture(&[("a.jpg", "same"), ("b.jpg", "same")]);
        let me = assert_cmd::cargo::cargo_bin!("datename");
        let out = assert_cmd::Command::new(me)
            .env(CONFIG_ENV, fx.home.join("absent-config.xml"))
            .arg("--exiftool")
            .arg(&fx.tool)
            .args(["--utc", "--confirm"])
            .arg(&fx.photos)
            .write_stdin("n\n")
            .output()
            .unwrap();
        assert!(out.status.success());
        assert!(stdout(&out).contains("b.jpg (same as a.jpg)"));
        assert_eq!(listing(&fx.photos).len(), 2);
    }

    #[test]
    #[serial]
    fn accepted_confirmation_deletes_duplicates() {
        let fx = fixture(&[("a.jpg", "same"), ("b.jpg", "same")]);
        let me = assert_cmd::cargo::cargo_bin!("datename");
        let out = assert_cmd::Command::new(me)
            .env(CONFIG_ENV, fx.home.join("absent-config.xml"))
            .arg("--exiftool")
            .arg(&fx.tool)
            .args(["--utc", "--confirm"])
            .arg(&fx.photos)
            .write_stdin("yes\n")
            .output()
            .unwrap();
        assert!(out.status.success());
        assert_eq!(listing(&fx.photos), vec![format!("{STEM}.jpg")]);
    }

    #[test]
    #[serial]
    fn config_file_values_are_used() {
        let fx = fixture(&[("a.jpg", "same"), ("b.jpg", "same")]);
        let cfg = fx.home.join("config.xml");
        fs::write(
            &cfg,
            format!(
                "<config>\n  <exiftool>{}</exiftool>\n  <timezone>utc</timezone>\n  <delete_duplicates>false</delete_duplicates>\n</config>\n",
                fx.tool.display()
            ),
        )
        .unwrap();
        let me = assert_cmd::cargo::cargo_bin!("datename");
        let out = Command::new(me)
            .env(CONFIG_ENV, &cfg)
            .arg(&fx.photos)
            .output()
            .unwrap();
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
        assert_eq!(
            listing(&fx.photos),
            vec![format!("{STEM} (1).jpg"), format!("{STEM}.jpg")]
        );
    }

    #[test]
    #[serial]
    fn log_file_receives_structured_events() {
        let fx = fixture(&[("a.jpg", "one")]);
        // Canonical path: symlinked ancestors (macOS /var) disable file logging.
        let log = fs::canonicalize(&fx.home).unwrap().join("logs").join("datename.log");
        let out = run(&fx, &["--json", "--log-file", log.to_str().unwrap()]);
        assert!(out.status.success());

        let contents = fs::read_to_string(&log).unwrap();
        assert!(contents.contains("run complete"), "{contents}");
        assert!(contents.lines().all(|l| l.starts_with('{')), "{contents}");
    }
}
