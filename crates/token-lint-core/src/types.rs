//! Core types for lint diagnostics and results.

use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Position of a token inside its source document.
///
/// Defaults to `{1, 1}` when the document loader supplies no location
/// resolver or the resolver has no answer for a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPos {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl TokenPos {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for TokenPos {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Source location of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Source the diagnostic is attributed to: a linted file, or a
    /// synthetic source such as the configuration file for batch-level
    /// diagnostics.
    pub source: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in the source (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit line/column.
    #[must_use]
    pub fn new(source: PathBuf, line: usize, column: usize) -> Self {
        Self {
            source,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Creates a location from a byte offset into `text`.
    #[must_use]
    pub fn of_offset(source: PathBuf, text: &str, offset: usize) -> Self {
        let clamped = offset.min(text.len());
        let before = &text[..clamped];
        let line = before.matches('\n').count() + 1;
        let column = before.rfind('\n').map_or(clamped + 1, |nl| clamped - nl);
        Self {
            source,
            line,
            column,
            offset: clamped,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A lint diagnostic produced by a rule or by the token tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "DT001").
    pub code: String,
    /// Rule name (e.g., "no-raw-colors").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Where the diagnostic is attributed.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Token metadata attached to the diagnostic (path, deprecation,
    /// extensions), if the diagnostic concerns a specific token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            metadata: None,
        }
    }

    /// Attaches token metadata to this diagnostic.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.source.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.source.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Diagnostic to a miette diagnostic for rich error display.
#[allow(dead_code)] // Public API for miette integration
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct RenderedDiagnostic {
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Diagnostic> for RenderedDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {}", d.code, d.message),
            span: SourceSpan::from((d.location.offset, d.location.length)),
            label_message: d.rule.clone(),
        }
    }
}

/// Result of a lint run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics found.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity >= Severity::Warning)
    }

    /// Checks if any diagnostics meet or exceed the given severity.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Counts diagnostics by severity as (errors, warnings, infos).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for d in &self.diagnostics {
            match d.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }

    /// Sorts diagnostics by source, then line, then column.
    pub fn sort_by_location(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .source
                .cmp(&b.location.source)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }

    /// Prints a summary report to stdout.
    pub fn print_report(&self) {
        let (errors, warnings, infos) = self.count_by_severity();

        for diagnostic in &self.diagnostics {
            println!("{}", diagnostic.format());
        }

        println!(
            "\nFound {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_checked
        );
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::new(
            "DT001",
            "no-raw-colors",
            severity,
            Location::new(PathBuf::from("src/button.css"), 4, 12),
            "raw color `#ff0000`",
        )
    }

    #[test]
    fn display_includes_code_and_location() {
        let d = make_diagnostic(Severity::Error);
        let display = format!("{d}");
        assert!(display.contains("src/button.css:4:12"));
        assert!(display.contains("[DT001]"));
    }

    #[test]
    fn has_diagnostics_at_respects_threshold() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Warning));
        assert!(!result.has_diagnostics_at(Severity::Error));
        assert!(result.has_diagnostics_at(Severity::Warning));
    }

    #[test]
    fn count_by_severity_buckets() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Error));
        result.diagnostics.push(make_diagnostic(Severity::Warning));
        result.diagnostics.push(make_diagnostic(Severity::Warning));
        assert_eq!(result.count_by_severity(), (1, 2, 0));
    }

    #[test]
    fn sort_orders_by_source_then_line() {
        let mut result = LintResult::new();
        let mut a = make_diagnostic(Severity::Error);
        a.location = Location::new(PathBuf::from("b.css"), 1, 1);
        let mut b = make_diagnostic(Severity::Error);
        b.location = Location::new(PathBuf::from("a.css"), 9, 1);
        result.diagnostics.push(a);
        result.diagnostics.push(b);
        result.sort_by_location();
        assert_eq!(result.diagnostics[0].location.source, PathBuf::from("a.css"));
    }

    #[test]
    fn of_offset_computes_line_and_column() {
        let text = "line1\nline2\nline3";
        let loc = Location::of_offset(PathBuf::from("f.css"), text, 8);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 3);

        let start = Location::of_offset(PathBuf::from("f.css"), text, 0);
        assert_eq!((start.line, start.column), (1, 1));
    }

    #[test]
    fn token_pos_defaults_to_one_one() {
        assert_eq!(TokenPos::default(), TokenPos::new(1, 1));
    }
}
