//! Rule to flag uses of deprecated design tokens.
//!
//! # Rationale
//!
//! A token marked `$deprecated` still resolves, but new references to it
//! should be steered toward its replacement. This rule finds references to
//! deprecated tokens in project files and names the replacement when the
//! deprecation declares one.

use token_lint_core::{
    Deprecation, Diagnostic, FlattenedToken, LintContext, Location, Rule, Severity, TokenRegistry,
};

/// Rule code for no-deprecated-tokens.
pub const CODE: &str = "DT003";

/// Rule name for no-deprecated-tokens.
pub const NAME: &str = "no-deprecated-tokens";

/// Flags references to deprecated tokens.
#[derive(Debug, Clone)]
pub struct NoDeprecatedTokens {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoDeprecatedTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl NoDeprecatedTokens {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoDeprecatedTokens {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags references to deprecated design tokens"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &LintContext, registry: &TokenRegistry) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for token in registry.tokens(None) {
            if !token.is_deprecated() {
                continue;
            }
            for (offset, _) in ctx.text.match_indices(&token.path) {
                let location = Location::of_offset(ctx.path.to_path_buf(), ctx.text, offset)
                    .with_span(offset, token.path.len());
                diagnostics.push(
                    Diagnostic::new(CODE, NAME, self.severity, location, message(token))
                        .with_metadata(token.diagnostic_metadata()),
                );
            }
        }

        diagnostics
    }
}

fn message(token: &FlattenedToken) -> String {
    match &token.metadata.deprecated {
        Some(Deprecation::Reason(reason)) => {
            format!("token `{}` is deprecated: {reason}", token.path)
        }
        Some(Deprecation::Replacement { replacement }) => format!(
            "token `{}` is deprecated; use {replacement} instead",
            token.path
        ),
        _ => format!("token `{}` is deprecated", token.path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use token_lint_core::{flatten_document, FlattenOptions, NameTransform};

    fn registry() -> TokenRegistry {
        let tokens = flatten_document(
            &json!({
                "Color": {
                    "Old": {
                        "$type": "color",
                        "$value": "#111",
                        "$deprecated": {"$ref": "#/Color/New"}
                    },
                    "New": {"$type": "color", "$value": "#222"},
                    "Sunset": {
                        "$type": "color",
                        "$value": "#333",
                        "$deprecated": "migrating to the brand palette"
                    },
                    "Kept": {
                        "$type": "color",
                        "$value": "#444",
                        "$deprecated": false
                    }
                }
            }),
            &FlattenOptions::new().with_transform(NameTransform::KebabCase),
        )
        .expect("flatten");
        let mut registry = TokenRegistry::new(NameTransform::KebabCase);
        registry.add_theme("default", tokens);
        registry
    }

    fn check(text: &str) -> Vec<Diagnostic> {
        let rule = NoDeprecatedTokens::new();
        let path = Path::new("a.css");
        rule.check(&LintContext::new(path, text), &registry())
    }

    #[test]
    fn flags_deprecated_token_references() {
        let found = check(".a { color: var(--color.old); }");
        assert_eq!(found.len(), 1);
        insta::assert_snapshot!(
            found[0].message,
            @"token `color.old` is deprecated; use #/Color/New instead"
        );
    }

    #[test]
    fn reason_is_included() {
        let found = check(".a { color: var(--color.sunset); }");
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("migrating to the brand palette"));
    }

    #[test]
    fn false_flag_is_not_deprecated() {
        assert!(check(".a { color: var(--color.kept); }").is_empty());
    }

    #[test]
    fn untouched_files_are_clean() {
        assert!(check(".a { color: var(--color.new); }").is_empty());
    }

    #[test]
    fn metadata_carries_the_deprecation() {
        let found = check("var(--color.old)");
        let metadata = found[0].metadata.as_ref().expect("metadata");
        assert_eq!(metadata["deprecated"]["$ref"], json!("#/Color/New"));
    }
}
