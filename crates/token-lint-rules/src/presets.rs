//! Rule presets for common configurations.

use crate::{NoDeprecatedTokens, NoRawColors, UnusedTokens};
use token_lint_core::{RuleBox, Severity};

/// Preset configurations for token-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Strict rules for mature design systems.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Parses a preset name as it appears in configuration.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `no-raw-colors` (DT001) - Forbids raw color literals
/// - `unused-tokens` (DT002) - Reports never-used tokens
/// - `no-deprecated-tokens` (DT003) - Flags deprecated token references
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoRawColors::new()),
        Box::new(UnusedTokens::new()),
        Box::new(NoDeprecatedTokens::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Same rules as recommended, but raw colors and deprecated references are
/// errors instead of warnings.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoRawColors::new().severity(Severity::Error)),
        Box::new(UnusedTokens::new()),
        Box::new(NoDeprecatedTokens::new().severity(Severity::Error)),
    ]
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only flags raw colors.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![Box::new(NoRawColors::new())]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    recommended_rules()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rules() {
        assert!(!Preset::Recommended.rules().is_empty());
        assert!(!Preset::Strict.rules().is_empty());
        assert!(!Preset::Minimal.rules().is_empty());
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_name("strict"), Some(Preset::Strict));
        assert_eq!(Preset::from_name("nope"), None);
    }
}
