//! Builder warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Box construction never fails on malformed input; anything it has to paper
//! over (a missing bidi span, an unknown `content` function, a bad counter
//! argument) is reported here instead.

use std::collections::HashSet;
use std::sync::Mutex;

use owo_colors::OwoColorize;

/// A warning recorded by [`warn_once`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Component that raised the warning, e.g. `"bidi"` or `"content"`.
    pub component: String,
    /// Human readable description.
    pub message: String,
}

#[derive(Default)]
struct WarningLog {
    seen: HashSet<String>,
    pending: Vec<Warning>,
    quiet: bool,
}

/// Global warning state (deduplication set plus undrained warnings)
static WARNINGS: Mutex<Option<WarningLog>> = Mutex::new(None);

/// Warn about a recoverable problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("content", "unknown content function 'foo()'");
/// ```
///
/// # Panics
/// Panics if the global warning mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let mut guard = WARNINGS.lock().unwrap();
    let log = guard.get_or_insert_with(WarningLog::default);

    if !log.seen.insert(key) {
        return;
    }

    log.pending.push(Warning {
        component: component.to_string(),
        message: message.to_string(),
    });

    if !log.quiet {
        eprintln!("{}", format!("[Quire {component}] ⚠ {message}").yellow());
    }
}

/// Drain the warnings recorded since the last call.
///
/// The deduplication set is kept, so a drained warning is not reported again
/// until [`clear_warnings`] is called.
///
/// # Panics
/// Panics if the global warning mutex is poisoned.
#[must_use]
pub fn take_warnings() -> Vec<Warning> {
    let mut guard = WARNINGS.lock().unwrap();
    guard
        .as_mut()
        .map(|log| std::mem::take(&mut log.pending))
        .unwrap_or_default()
}

/// Stop (or resume) echoing warnings to stderr. Warnings are still recorded.
///
/// # Panics
/// Panics if the global warning mutex is poisoned.
pub fn set_quiet(quiet: bool) {
    let mut guard = WARNINGS.lock().unwrap();
    guard.get_or_insert_with(WarningLog::default).quiet = quiet;
}

/// Clear all recorded warnings (call when building a new document)
///
/// # Panics
/// Panics if the global warning mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNINGS.lock().unwrap();
    if let Some(log) = guard.as_mut() {
        log.seen.clear();
        log.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        set_quiet(true);
        warn_once("test-dedup", "same message");
        warn_once("test-dedup", "same message");

        let recorded: Vec<_> = take_warnings()
            .into_iter()
            .filter(|w| w.component == "test-dedup")
            .collect();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].message, "same message");
    }
}
