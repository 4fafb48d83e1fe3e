//! Cross-file token usage tracking.
//!
//! The tracker is primed with every token worth watching, observes each
//! linted file's text, and reports the tokens that never appeared once the
//! run is over. The seen-set only grows, so scanning is order-independent
//! and safe to share across threads.

use crate::registry::TokenRegistry;
use crate::token::FlattenedToken;
use crate::types::{Diagnostic, Location, Severity};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// How a token's usage is detected in file text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// The token's path spelled as a CSS custom property, `--a.b.c`.
    CustomProperty,
    /// Case-insensitive hex color literal match.
    HexColor,
    /// Number match guarded by word boundaries, so `16` does not match
    /// inside `160` or `1.6`.
    Numeric,
    /// Plain substring match.
    Substring,
}

/// One primed token and its compiled matchers.
#[derive(Debug)]
struct TrackedToken {
    path: String,
    /// The resolved value as written, for messages and ignore lists.
    value: String,
    strategy: MatchStrategy,
    /// Needle for the value match; lowercase for hex colors.
    needle: String,
    /// Compiled boundary pattern for numeric needles.
    pattern: Option<Regex>,
    metadata: Value,
}

impl TrackedToken {
    fn matches(&self, text: &str, lowered: &str) -> bool {
        // The custom-property spelling counts as usage for every strategy.
        if text.contains(&format!("--{}", self.path)) {
            return true;
        }
        match self.strategy {
            MatchStrategy::CustomProperty => false,
            MatchStrategy::HexColor => lowered.contains(&self.needle),
            MatchStrategy::Numeric => match &self.pattern {
                Some(pattern) => pattern.is_match(text),
                None => text.contains(&self.needle),
            },
            MatchStrategy::Substring => text.contains(&self.needle),
        }
    }
}

/// Settings for the unused-token report produced by [`TokenTracker::flush`].
#[derive(Debug, Clone)]
pub struct UnusedTokenCheck {
    /// Diagnostic code, e.g. `DT002`.
    pub code: String,
    /// Rule name attached to the diagnostics.
    pub rule: String,
    /// Severity of each unused-token diagnostic.
    pub severity: Severity,
    /// Literal token values to exempt (e.g. `#111`). Entries are also
    /// tried as glob patterns against token paths.
    pub ignore: Vec<String>,
}

/// Accumulates token usage across every scanned file.
#[derive(Debug)]
pub struct TokenTracker {
    tracked: Vec<TrackedToken>,
    seen: Mutex<HashSet<String>>,
    /// Where unused-token diagnostics point, since no single file is at
    /// fault.
    config_source: PathBuf,
}

impl TokenTracker {
    /// Primes a tracker with every trackable token in the registry.
    ///
    /// Only string- and number-valued tokens are tracked; composite values
    /// (shadows, gradients, typography) have no stable textual needle.
    #[must_use]
    pub fn from_registry(registry: &TokenRegistry, config_source: impl Into<PathBuf>) -> Self {
        let mut tracked = Vec::new();
        for token in registry.tokens(None) {
            if let Some(entry) = track_token(token) {
                tracked.push(entry);
            }
        }
        Self {
            tracked,
            seen: Mutex::new(HashSet::new()),
            config_source: config_source.into(),
        }
    }

    /// Number of tokens being watched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Returns true if nothing is being watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Scans one file's text, marking every matched token as seen.
    pub fn scan(&self, text: &str) {
        let lowered = text.to_lowercase();
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        for entry in &self.tracked {
            if seen.contains(&entry.path) {
                continue;
            }
            if entry.matches(text, &lowered) {
                seen.insert(entry.path.clone());
            }
        }
    }

    /// Returns true if the named token has been seen so far.
    #[must_use]
    pub fn was_seen(&self, path: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
    }

    /// Reports every still-unseen token as a diagnostic.
    ///
    /// Diagnostics point at the configuration source rather than any
    /// scanned file. The seen-set is left intact, so flushing twice after
    /// more scans never resurrects a token already marked used.
    #[must_use]
    pub fn flush(&self, check: &UnusedTokenCheck) -> Vec<Diagnostic> {
        let path_globs: Vec<glob::Pattern> = check
            .ignore
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();
        let seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);

        self.tracked
            .iter()
            .filter(|entry| !seen.contains(&entry.path))
            .filter(|entry| {
                !check
                    .ignore
                    .iter()
                    .any(|v| v.eq_ignore_ascii_case(&entry.value))
                    && !path_globs.iter().any(|p| p.matches(&entry.path))
            })
            .map(|entry| {
                Diagnostic::new(
                    check.code.clone(),
                    check.rule.clone(),
                    check.severity,
                    Location::new(self.config_source.clone(), 1, 1),
                    format!(
                        "token `{}` with value `{}` is defined but never used",
                        entry.path, entry.value
                    ),
                )
                .with_metadata(entry.metadata.clone())
            })
            .collect()
    }
}

fn track_token(token: &FlattenedToken) -> Option<TrackedToken> {
    match &token.value {
        Value::String(text) => {
            if is_hex_color(text) {
                Some(TrackedToken {
                    path: token.path.clone(),
                    value: text.clone(),
                    strategy: MatchStrategy::HexColor,
                    needle: text.to_lowercase(),
                    pattern: None,
                    metadata: token.diagnostic_metadata(),
                })
            } else if text.is_empty() {
                // An empty needle would match everything.
                Some(TrackedToken {
                    path: token.path.clone(),
                    value: String::new(),
                    strategy: MatchStrategy::CustomProperty,
                    needle: String::new(),
                    pattern: None,
                    metadata: token.diagnostic_metadata(),
                })
            } else {
                Some(TrackedToken {
                    path: token.path.clone(),
                    value: text.clone(),
                    strategy: MatchStrategy::Substring,
                    needle: text.clone(),
                    pattern: None,
                    metadata: token.diagnostic_metadata(),
                })
            }
        }
        Value::Number(number) => {
            let needle = number.to_string();
            // Digit/dot boundaries: `16` matches in `16px` but not inside
            // `160` or `2.16`.
            let boundary = format!(
                r"(?:^|[^\d.]){}(?:$|[^\d.])",
                regex::escape(&needle)
            );
            Some(TrackedToken {
                path: token.path.clone(),
                value: needle.clone(),
                strategy: MatchStrategy::Numeric,
                pattern: Regex::new(&boundary).ok(),
                needle,
                metadata: token.diagnostic_metadata(),
            })
        }
        _ => None,
    }
}

fn is_hex_color(text: &str) -> bool {
    text.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::flatten_document;
    use crate::transform::NameTransform;
    use crate::walker::FlattenOptions;
    use serde_json::json;

    fn tracker() -> TokenTracker {
        let tokens = flatten_document(
            &json!({
                "Color": {
                    "Primary": {"$type": "color", "$value": "#336699"},
                    "Name": {"$type": "fontFamily", "$value": "Inter"}
                },
                "Spacing": {
                    "Base": {"$type": "number", "$value": 16}
                },
                "Shadow": {
                    "Card": {"$type": "shadow", "$value": {
                        "color": "#0003",
                        "offsetX": {"value": 0, "unit": "px"},
                        "offsetY": {"value": 2, "unit": "px"},
                        "blur": {"value": 4, "unit": "px"},
                        "spread": {"value": 0, "unit": "px"}
                    }}
                }
            }),
            &FlattenOptions::new().with_transform(NameTransform::KebabCase),
        )
        .unwrap();

        let mut registry = TokenRegistry::new(NameTransform::KebabCase);
        registry.add_theme("default", tokens);
        TokenTracker::from_registry(&registry, "tokens.toml")
    }

    fn check() -> UnusedTokenCheck {
        UnusedTokenCheck {
            code: "DT002".to_string(),
            rule: "unused-tokens".to_string(),
            severity: Severity::Warning,
            ignore: Vec::new(),
        }
    }

    #[test]
    fn composite_values_are_not_tracked() {
        // shadow token has no textual needle
        assert_eq!(tracker().len(), 3);
    }

    #[test]
    fn hex_match_is_case_insensitive() {
        let tracker = tracker();
        tracker.scan(".btn { color: #336699; }");
        tracker.scan("h1 { background: #FF0000; }");
        assert!(tracker.was_seen("color.primary"));

        let unused = tracker.flush(&check());
        assert_eq!(unused.len(), 2);
    }

    #[test]
    fn numeric_match_respects_word_boundaries() {
        let tracker = tracker();
        tracker.scan("padding: 160px; scale: 1.6;");
        assert!(!tracker.was_seen("spacing.base"));

        tracker.scan("margin: 16px;");
        assert!(tracker.was_seen("spacing.base"));
    }

    #[test]
    fn custom_property_spelling_counts_for_any_strategy() {
        let tracker = tracker();
        tracker.scan("color: var(--color.primary);");
        assert!(tracker.was_seen("color.primary"));
    }

    #[test]
    fn substring_match_for_plain_strings() {
        let tracker = tracker();
        tracker.scan("font-family: Inter, sans-serif;");
        assert!(tracker.was_seen("color.name"));
    }

    #[test]
    fn seen_set_is_monotonic_across_flushes() {
        let tracker = tracker();
        tracker.scan("margin: 16px;");
        assert_eq!(tracker.flush(&check()).len(), 2);

        tracker.scan("font: Inter;");
        let unused = tracker.flush(&check());
        assert_eq!(unused.len(), 1);
        assert!(unused[0].message.contains("color.primary"));
    }

    #[test]
    fn flush_points_at_the_config_source() {
        let unused = tracker().flush(&check());
        assert!(unused
            .iter()
            .all(|d| d.location.source == PathBuf::from("tokens.toml")));
        assert!(unused.iter().all(|d| d.location.line == 1));
    }

    #[test]
    fn ignore_globs_suppress_tokens() {
        let tracker = tracker();
        let mut check = check();
        check.ignore.push("spacing.*".to_string());
        let unused = tracker.flush(&check);
        assert!(unused.iter().all(|d| !d.message.contains("spacing.base")));
    }

    #[test]
    fn ignore_list_of_literal_values_suppresses_tokens() {
        let tokens = flatten_document(
            &json!({
                "a": {"$type": "color", "$value": "#000"},
                "b": {"$type": "color", "$value": "#111"}
            }),
            &FlattenOptions::new(),
        )
        .unwrap();
        let mut registry = TokenRegistry::new(NameTransform::Identity);
        registry.add_theme("default", tokens);
        let tracker = TokenTracker::from_registry(&registry, "tokens.toml");

        tracker.scan(".a { color: #000; }");
        let mut check = check();
        check.ignore.push("#111".to_string());
        assert!(tracker.flush(&check).is_empty());
    }

    #[test]
    fn unused_diagnostics_carry_value_and_metadata() {
        let tokens = flatten_document(
            &json!({
                "Color": {
                    "Old": {
                        "$type": "color",
                        "$value": "#abcdef",
                        "$deprecated": true
                    }
                }
            }),
            &FlattenOptions::new().with_transform(NameTransform::KebabCase),
        )
        .unwrap();
        let mut registry = TokenRegistry::new(NameTransform::KebabCase);
        registry.add_theme("default", tokens);
        let tracker = TokenTracker::from_registry(&registry, "tokens.toml");

        let unused = tracker.flush(&check());
        assert_eq!(unused.len(), 1);
        assert!(unused[0].message.contains("#abcdef"));

        let metadata = unused[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["path"], json!("color.old"));
        assert_eq!(metadata["deprecated"], json!(true));
    }
}
