//! User-visible troubleshooting log for camera and scanner operations.
//!
//! SYSTEM CONTEXT
//! ==============
//! Camera problems on phones are hard to debug remotely, so every attempt
//! and its outcome is written to an on-page panel. The controller writes
//! through [`DiagnosticSink`]; the browser renders one `<div>` per line and
//! tests read lines back from [`DiagnosticLog`].

use std::cell::RefCell;

pub trait DiagnosticSink {
    /// Append one line.
    fn append(&self, line: &str);
    /// Remove every line.
    fn clear(&self);
}

/// In-memory sink.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    lines: RefCell<Vec<String>>,
}

impl DiagnosticLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Whether any line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn append(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_owned());
    }

    fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_appends_in_order_and_clears() {
        let log = DiagnosticLog::new();
        log.append("first");
        log.append("second");
        assert_eq!(log.lines(), vec!["first", "second"]);
        assert!(log.contains("sec"));

        log.clear();
        assert!(log.lines().is_empty());
        assert!(!log.contains("first"));
    }
}
