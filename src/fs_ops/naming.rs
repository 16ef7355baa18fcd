//! Target-name registry and suffix resolution.
//!
//! Policy:
//! - The base name is `<stem>.<ext>` (or just `<stem>` without an extension).
//! - If taken, append " (n)" before the extension for n = 1, 2, ... until free.
//! - A name is taken if it exists in the directory or was assigned earlier in
//!   the same run; the registry never hands out a name twice.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use tracing::trace;

/// Names already in use in the directory being processed.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    taken: HashSet<OsString>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with the names currently present in the directory.
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<OsString>,
    {
        Self {
            taken: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark `name` as used. Returns false if it already was.
    pub fn claim(&mut self, name: impl Into<OsString>) -> bool {
        self.taken.insert(name.into())
    }

    /// Forget `name` (e.g. a file that was deleted before renaming starts).
    pub fn release(&mut self, name: &OsStr) -> bool {
        self.taken.remove(name)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Claim and return the first free name among `stem.ext`, `stem (1).ext`, ...
    pub fn assign(&mut self, stem: &str, ext: Option<&OsStr>) -> OsString {
        let base = name_with_suffix(stem, None, ext);
        if self.claim(base.clone()) {
            return base;
        }
        let mut n: u64 = 1;
        loop {
            let candidate = name_with_suffix(stem, Some(n), ext);
            if self.claim(candidate.clone()) {
                if n >= 3 {
                    trace!(stem, suffix = n, "name: multiple collisions before a free suffix");
                }
                return candidate;
            }
            n = n.saturating_add(1);
        }
    }
}

/// `stem`, optional " (n)", optional "." + ext.
pub fn name_with_suffix(stem: &str, suffix: Option<u64>, ext: Option<&OsStr>) -> OsString {
    let mut name = OsString::from(stem);
    if let Some(n) = suffix {
        name.push(format!(" ({n})"));
    }
    if let Some(e) = ext {
        name.push(".");
        name.push(e);
    }
    name
}

/// True if `current` is `stem.ext` or `stem (n).ext` with n a positive integer
/// written without leading zeros.
pub fn is_assigned_form(current: &OsStr, stem: &str, ext: Option<&OsStr>) -> bool {
    if current == name_with_suffix(stem, None, ext).as_os_str() {
        return true;
    }
    let Some(current) = current.to_str() else {
        // Generated names are UTF-8 apart from the extension; a non-UTF-8 name
        // can only match through the exact comparison above.
        return false;
    };
    let tail = match ext {
        Some(e) => match e.to_str() {
            Some(e) => format!(".{e}"),
            None => return false,
        },
        None => String::new(),
    };
    let Some(rest) = current.strip_prefix(stem).and_then(|r| r.strip_suffix(tail.as_str())) else {
        return false;
    };
    let Some(digits) = rest.strip_prefix(" (").and_then(|r| r.strip_suffix(')')) else {
        return false;
    };
    !digits.is_empty()
        && !digits.starts_with('0')
        && digits.bytes().all(|b| b.is_ascii_digit())
}
