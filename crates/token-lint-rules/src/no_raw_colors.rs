//! Rule to forbid raw color literals in styled files.
//!
//! # Rationale
//!
//! Hard-coded colors drift away from the design system. Every color in
//! project files should come from a token; when a literal matches a known
//! token's value the diagnostic names the token to use instead.
//!
//! # Configuration
//!
//! - `allow`: color literals to permit (e.g. `["transparent", "#fff"]`)

use regex::Regex;
use std::sync::OnceLock;
use token_lint_core::{
    Diagnostic, LintContext, Location, Rule, Severity, TokenRegistry, TokenType,
};

/// Rule code for no-raw-colors.
pub const CODE: &str = "DT001";

/// Rule name for no-raw-colors.
pub const NAME: &str = "no-raw-colors";

static COLOR_LITERAL: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)] // pattern is a compile-time constant
fn color_literal() -> &'static Regex {
    COLOR_LITERAL.get_or_init(|| {
        Regex::new(
            r"(?i)#(?:[0-9a-f]{8}|[0-9a-f]{6}|[0-9a-f]{4}|[0-9a-f]{3})\b|\b(?:rgba?|hsla?)\([^)]*\)",
        )
        .expect("static pattern")
    })
}

/// Forbids raw color literals outside token documents.
#[derive(Debug, Clone)]
pub struct NoRawColors {
    /// Literals exempt from the rule, compared case-insensitively.
    pub allow: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoRawColors {
    fn default() -> Self {
        Self::new()
    }
}

impl NoRawColors {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow: Vec::new(),
            severity: Severity::Warning,
        }
    }

    /// Adds exempt literals.
    #[must_use]
    pub fn allow<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow
            .extend(literals.into_iter().map(|s| s.into().to_lowercase()));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoRawColors {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids raw color literals; use design tokens instead"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &LintContext, registry: &TokenRegistry) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for found in color_literal().find_iter(ctx.text) {
            let literal = found.as_str();
            if self.allow.iter().any(|a| a == &literal.to_lowercase()) {
                continue;
            }

            let location = Location::of_offset(ctx.path.to_path_buf(), ctx.text, found.start())
                .with_span(found.start(), found.len());

            let diagnostic = match matching_token(literal, registry) {
                Some((path, metadata)) => Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    location,
                    format!("raw color `{literal}`; use token `{path}` instead"),
                )
                .with_metadata(metadata),
                None => Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    location,
                    format!("raw color `{literal}` has no matching design token"),
                ),
            };
            diagnostics.push(diagnostic);
        }

        diagnostics
    }
}

/// Finds a color token whose resolved value equals the literal.
fn matching_token(
    literal: &str,
    registry: &TokenRegistry,
) -> Option<(String, serde_json::Value)> {
    let lowered = literal.to_lowercase();
    registry
        .tokens(None)
        .into_iter()
        .filter(|t| t.token_type == TokenType::Color)
        .find(|t| {
            t.value
                .as_str()
                .is_some_and(|v| v.to_lowercase() == lowered)
        })
        .map(|t| (t.path.clone(), t.diagnostic_metadata()))
}
