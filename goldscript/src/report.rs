//! Mismatch diagnostics and the per-script report.

use std::fmt;

/// One recorded comparison failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the script the mismatch occurred in.
    pub script: String,
    /// Raw line number at the time of the comparison.
    pub line: usize,
    /// The expectation line from the script, or a sentinel: `<command>` when
    /// an expectation appeared where a command belongs, `<nothing>` when a
    /// produced line had no expectation to compare against.
    pub expected: String,
    /// The line the runner produced, or the offending script line for
    /// `<command>` violations.
    pub actual: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.script)?;
        writeln!(f, "line: {}", self.line)?;
        writeln!(f, "exp: {}", self.expected)?;
        writeln!(f, "got: {}", self.actual)
    }
}

/// Everything one finished script reports back to the caller.
///
/// A report with no diagnostics is a pass. When statement collection is
/// enabled in the configuration, `statements` carries every executed
/// statement text in script order.
#[derive(Debug, Clone, Default)]
pub struct ScriptReport {
    /// Name of the script this report describes.
    pub script: String,
    /// Recorded mismatches, in occurrence order.
    pub diagnostics: Vec<Diagnostic>,
    /// Executed statement texts, when collection is enabled.
    pub statements: Vec<String>,
}

impl ScriptReport {
    pub(crate) fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            diagnostics: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// True when the script produced no diagnostics.
    pub fn is_pass(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for ScriptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The report renders one four-line block per diagnostic.
    #[test]
    fn report_display_format() {
        let mut report = ScriptReport::new("scripts/select.sql");
        report.diagnostics.push(Diagnostic {
            script: "scripts/select.sql".to_string(),
            line: 12,
            expected: "> ok".to_string(),
            actual: "> update count: 2".to_string(),
        });
        assert_eq!(
            report.to_string(),
            "scripts/select.sql\nline: 12\nexp: > ok\ngot: > update count: 2\n"
        );
        assert!(!report.is_pass());
    }

    /// An empty report is a pass and renders nothing.
    #[test]
    fn empty_report_passes() {
        let report = ScriptReport::new("scripts/empty.sql");
        assert!(report.is_pass());
        assert_eq!(report.to_string(), "");
    }
}
