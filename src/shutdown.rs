//! Process-wide interrupt flag.
//!
//! The Ctrl-C handler raises it; the duplicate and rename passes look at it
//! between files and stop with `DatenameError::Interrupted`. Work already done
//! stays done.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{DatenameError, Result};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Raise the flag. Returns true if it was already raised, so a second Ctrl-C
/// can be treated as "stop now".
pub fn request() -> bool {
    SHUTDOWN.swap(true, Ordering::SeqCst)
}

pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

pub(crate) fn check() -> Result<()> {
    if is_requested() {
        return Err(DatenameError::Interrupted);
    }
    Ok(())
}
