//! Rule trait for defining lint rules.

use crate::registry::TokenRegistry;
use crate::types::{Diagnostic, Severity};
use std::path::Path;

/// Context about the file currently being linted.
pub struct LintContext<'a> {
    /// Path of the file, relative to the lint root where possible.
    pub path: &'a Path,
    /// Full file text.
    pub text: &'a str,
}

impl<'a> LintContext<'a> {
    /// Creates a new context.
    #[must_use]
    pub fn new(path: &'a Path, text: &'a str) -> Self {
        Self { path, text }
    }
}

/// A per-file lint rule checked against the token registry.
///
/// Rules receive the raw file text plus the fully resolved registry; they
/// never see unresolved token documents.
///
/// # Example
///
/// ```ignore
/// use token_lint_core::{Diagnostic, LintContext, Location, Rule, Severity, TokenRegistry};
///
/// pub struct NoTabs;
///
/// impl Rule for NoTabs {
///     fn name(&self) -> &'static str { "no-tabs" }
///     fn code(&self) -> &'static str { "DT099" }
///
///     fn check(&self, ctx: &LintContext, _registry: &TokenRegistry) -> Vec<Diagnostic> {
///         ctx.text
///             .match_indices('\t')
///             .map(|(offset, _)| Diagnostic::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 Location::of_offset(ctx.path.to_path_buf(), ctx.text, offset),
///                 "tab character",
///             ))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-raw-colors").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "DT001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks a single file and returns any diagnostics found.
    fn check(&self, ctx: &LintContext, registry: &TokenRegistry) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
