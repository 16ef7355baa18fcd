//! User-facing terminal output.
//! Labelled lines (colored only when the target stream is a terminal), plain
//! report lines, and the y/n prompt used before deleting duplicates.

use owo_colors::{OwoColorize, Style};
use std::io::{self, BufRead, Write};

#[derive(Clone, Copy)]
enum Channel {
    Out,
    Err,
}

impl Channel {
    fn is_terminal(self) -> bool {
        match self {
            Channel::Out => atty::is(atty::Stream::Stdout),
            Channel::Err => atty::is(atty::Stream::Stderr),
        }
    }
}

/// `label: msg` on `channel`, with the label styled only on a terminal.
fn labelled(channel: Channel, label: &str, style: Style, msg: &str) {
    let line = if channel.is_terminal() {
        format!("{} {msg}", format!("{label}:").style(style))
    } else {
        format!("{label}: {msg}")
    };
    match channel {
        Channel::Out => println!("{line}"),
        Channel::Err => eprintln!("{line}"),
    }
}

pub fn print_info(msg: &str) {
    labelled(Channel::Out, "info", Style::new().cyan().bold(), msg);
}

pub fn print_warn(msg: &str) {
    labelled(Channel::Err, "warn", Style::new().yellow().bold(), msg);
}

pub fn print_error(msg: &str) {
    labelled(Channel::Err, "error", Style::new().red().bold(), msg);
}

pub fn print_success(msg: &str) {
    labelled(Channel::Out, "ok", Style::new().green().bold(), msg);
}

/// A bare line on stdout, e.g. `IMG_0001.JPG -> 20200101 100000 +0100.JPG`.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// Ask a yes/no question on `output` and read the answer from `input`.
/// Only `y` or `yes` (any case) count as yes; EOF counts as no.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{question} (y/n) ")?;
    output.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// `confirm` wired to the process stdin/stdout.
pub fn confirm_stdin(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    confirm(question, &mut lock, &mut io::stdout())
}
