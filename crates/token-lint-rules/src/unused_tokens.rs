//! Rule reporting tokens defined but never used.
//!
//! # Rationale
//!
//! Dead tokens accumulate silently and make the design system harder to
//! reason about. Usage is collected across every linted file by the
//! tracker, so this rule produces nothing per file; its diagnostics surface
//! once at the end of the run via [`UnusedTokens::to_check`].
//!
//! # Configuration
//!
//! - `ignore`: literal token values to exempt (e.g. `["#111"]`); entries
//!   are also tried as glob patterns against token paths
//!   (e.g. `["internal.*"]`)

use token_lint_core::{Diagnostic, LintContext, Rule, Severity, TokenRegistry, UnusedTokenCheck};

/// Rule code for unused-tokens.
pub const CODE: &str = "DT002";

/// Rule name for unused-tokens.
pub const NAME: &str = "unused-tokens";

/// Reports design tokens that no linted file ever referenced.
#[derive(Debug, Clone)]
pub struct UnusedTokens {
    /// Literal values to exempt; also tried as path globs.
    pub ignore: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for UnusedTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl UnusedTokens {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignore: Vec::new(),
            severity: Severity::Warning,
        }
    }

    /// Adds values (or token path globs) to exempt from the report.
    #[must_use]
    pub fn ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Builds the end-of-run check handed to
    /// [`Linter::finish`](token_lint_core::Linter::finish).
    #[must_use]
    pub fn to_check(&self) -> UnusedTokenCheck {
        UnusedTokenCheck {
            code: CODE.to_string(),
            rule: NAME.to_string(),
            severity: self.severity,
            ignore: self.ignore.clone(),
        }
    }
}

impl Rule for UnusedTokens {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports tokens defined in the design system but never used"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    // Per-file usage is observed by the tracker; nothing to report here.
    fn check(&self, _ctx: &LintContext, _registry: &TokenRegistry) -> Vec<Diagnostic> {
        Vec::new()
    }
}
