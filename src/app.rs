//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler, then
//! runs the organize pipeline and reports what it did.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use datename::cli::Args;
use datename::fs_ops::Duplicate;
use datename::output as out;
use datename::{
    Config, DatenameError, ExifTool, RunOptions, RunSummary, default_config_path,
    load_config_from_xml, organize_directory, shutdown,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let dir = args
        .resolved_directory()
        .context("no directory given")?;

    // Config file values first, then CLI overrides
    let mut cfg = match load_config_from_xml()? {
        Some((_, cfg)) => cfg,
        None => Config::default(),
    };
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)
        .inspect_err(|e| out::print_error(&format!("Failed to initialize logging: {e}")))?;

    // The guard is only dropped early on a forced exit, to flush the log file
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            if on_interrupt(shutdown::request(), &*guard_slot) {
                std::process::exit(130);
            }
        })
        .context("failed to install signal handler")?;
    }

    debug!(?args, ?cfg, "starting datename");

    let result = organize(&dir, &cfg);

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

/// Handle one Ctrl-C. The first one only asks the run to stop, so the log file
/// keeps receiving events. A repeated one flushes the log by dropping the
/// guard and returns true: the caller exits at once.
fn on_interrupt<G>(already_requested: bool, guard_slot: &Mutex<Option<G>>) -> bool {
    if !already_requested {
        out::print_warn("Received interrupt; stopping after the current file (Ctrl-C again to force)");
        return false;
    }
    out::print_warn("Second interrupt; exiting immediately");
    if let Ok(mut g) = guard_slot.lock() {
        drop(g.take());
    }
    true
}

fn print_config_location() {
    if let Some(explicit) = std::env::var_os(datename::config::CONFIG_ENV) {
        out::print_info(&format!(
            "Using DATENAME_CONFIG (explicit):\n  {}",
            Path::new(&explicit).display()
        ));
        out::print_info("To override, unset DATENAME_CONFIG or set it to another file.");
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default datename config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

fn organize(dir: &Path, cfg: &Config) -> Result<()> {
    let tool = ExifTool::new(&cfg.exiftool, &cfg.tag, cfg.zone);
    let opts = RunOptions::from(cfg);
    let confirm = cfg.confirm_deletion && !cfg.dry_run;

    match organize_directory(dir, &tool, &opts, |dups| !confirm || ask_delete(dups)) {
        Ok(summary) => {
            report(&summary);
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            Err(e.into())
        }
    }
}

/// List the duplicates and prompt on stdin. Any read failure counts as "no".
fn ask_delete(dups: &[Duplicate]) -> bool {
    for d in dups {
        out::print_user(&format!(
            "{} (same as {})",
            file_name(&d.entry.path),
            file_name(&d.original)
        ));
    }
    match out::confirm_stdin(&format!("Delete {} duplicate file(s)?", dups.len())) {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "could not read answer; keeping duplicates");
            false
        }
    }
}

fn report(summary: &RunSummary) {
    let prefix = if summary.dry_run { "Dry-run: would delete" } else { "Deleted" };
    for path in &summary.deleted {
        out::print_info(&format!("{prefix} duplicate {}", file_name(path)));
    }
    for (from, to) in &summary.renamed {
        out::print_user(&format!("{} -> {}", file_name(from), file_name(to)));
    }
    if summary.kept_duplicates() {
        out::print_info(&format!(
            "Kept {} duplicate file(s)",
            summary.duplicates.len()
        ));
    }

    let verb = if summary.dry_run { "would be" } else { "were" };
    out::print_success(&format!(
        "{} duplicate(s) {verb} deleted, {} file(s) {verb} renamed, {} already named",
        summary.deleted.len(),
        summary.renamed.len(),
        summary.unchanged.len()
    ));
}

fn report_failure(e: &DatenameError) {
    let code = e.code();
    let kind = e.kind();
    if let DatenameError::RunAborted { deleted, source } = e {
        error!(code, kind, deleted = deleted.len(), "Run aborted after deleting duplicates");
        report_failure(source);
        for p in deleted {
            out::print_info(&format!("Already deleted: {}", file_name(p)));
        }
        return;
    }
    match e {
        DatenameError::DirectoryNotFound(path) | DatenameError::NotADirectory(path) => {
            error!(code, kind, path = %path.display(), "Directory check failed")
        }
        DatenameError::ToolUnavailable { tool, reason } => {
            error!(code, kind, tool = %tool.display(), %reason, "Metadata tool unavailable")
        }
        DatenameError::Io { op, path, source } => {
            error!(code, kind, op, path = %path.display(), error = %source, "I/O failure")
        }
        DatenameError::DedupAborted { path, deleted, source } => {
            error!(code, kind, path = %path.display(), deleted = deleted.len(), error = %source, "Duplicate removal aborted")
        }
        DatenameError::RenameAborted {
            from,
            to,
            renamed,
            pending,
            source,
        } => {
            error!(code, kind, from = %from.display(), to = %to.display(), renamed = renamed.len(), pending = pending.len(), error = %source, "Rename aborted")
        }
        DatenameError::Interrupted => error!(code, kind, "Run aborted by user"),
        DatenameError::MetadataParse { path, .. } => {
            error!(code, kind, path = %path.display(), "Unusable metadata")
        }
        DatenameError::RunAborted { .. } => {}
    }

    out::print_error(&e.to_string());
    match e {
        DatenameError::DedupAborted { deleted, .. } => {
            for p in deleted {
                out::print_info(&format!("Already deleted: {}", file_name(p)));
            }
        }
        DatenameError::RenameAborted {
            renamed, pending, ..
        } => {
            for (from, to) in renamed {
                out::print_user(&format!("{} -> {}", file_name(from), file_name(to)));
            }
            for p in pending {
                out::print_info(&format!("Not renamed: {}", file_name(p)));
            }
        }
        _ => {}
    }
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_interrupt_keeps_the_log_guard() {
        let slot = Mutex::new(Some("guard"));
        assert!(!on_interrupt(false, &slot));
        assert_eq!(*slot.lock().unwrap(), Some("guard"));
    }

    #[test]
    fn second_interrupt_flushes_and_exits() {
        let slot = Mutex::new(Some("guard"));
        assert!(on_interrupt(true, &slot));
        assert_eq!(*slot.lock().unwrap(), None);
    }
}
